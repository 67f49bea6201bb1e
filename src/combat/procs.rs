//! On-hit proc gate
//!
//! A tier's on-hit effects fire on a chance roll, at most once per the tier's
//! effect cooldown per attacker. The teleport perk goes through the same store
//! with its own timestamp.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::rarity::{RarityTier, TierId, TierTable};
use crate::rolls::RollSource;
use super::cooldowns::{ActorId, CooldownKind, CooldownStore};
use super::status::{proc_duration_ms, EffectSpec, EFFECT_DURATION_SECS};
use super::Millis;

/// Actors idle for this many times the longest tier cooldown get swept
pub const SWEEP_FACTOR: u64 = 5;

/// What the host should apply after a proc fired
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcFired {
    pub tier: TierId,
    /// Effects for the struck target
    pub effects: Vec<EffectSpec>,
    pub particle: Option<String>,
    pub sound: Option<String>,
}

/// How long an actor's state must sit untouched before a sweep drops it
///
/// Never shorter than the ability or teleport cooldown, so a sweep can't
/// hand out an early retrigger.
pub fn sweep_horizon(table: &TierTable, ability_cooldown_ms: Millis, teleport_cooldown_ms: Millis) -> Millis {
    SWEEP_FACTOR
        .saturating_mul(table.max_effect_cooldown_ms())
        .max(ability_cooldown_ms)
        .max(teleport_cooldown_ms)
}

/// Chance-and-cooldown gate for on-hit effects
#[derive(Debug, Clone)]
pub struct ProcEffectGate {
    store: Arc<CooldownStore>,
    durations_secs: Vec<u64>,
}

impl ProcEffectGate {
    pub fn new(store: Arc<CooldownStore>) -> Self {
        Self {
            store,
            durations_secs: EFFECT_DURATION_SECS.to_vec(),
        }
    }

    /// Replace the per-rank duration table; an empty table keeps the built-in one
    pub fn with_durations(mut self, secs: &[u64]) -> Self {
        if !secs.is_empty() {
            self.durations_secs = secs.to_vec();
        }
        self
    }

    pub fn store(&self) -> &Arc<CooldownStore> {
        &self.store
    }

    /// Effect duration for a tier, longer for higher ranks
    pub fn duration_for(&self, tier: &RarityTier) -> Millis {
        proc_duration_ms(&self.durations_secs, tier.tier_index as usize)
    }

    /// Try to fire `tier`'s on-hit effects for `actor`
    ///
    /// Returns `None` without drawing when the tier has no effects or the
    /// actor is still cooling down. The cooldown is stamped only on a fire.
    pub fn try_trigger(
        &self,
        actor: ActorId,
        tier: &RarityTier,
        now: Millis,
        rolls: &mut impl RollSource,
    ) -> Option<ProcFired> {
        if tier.on_hit_effects.is_empty() {
            return None;
        }
        let duration_ms = self.duration_for(tier);
        let fired = self.store.claim(
            actor,
            CooldownKind::HitEffect,
            tier.effect_cooldown_ms,
            now,
            || {
                let roll = rolls.roll_percent();
                if roll > tier.effect_chance {
                    return None;
                }
                Some(ProcFired {
                    tier: tier.id.clone(),
                    effects: tier
                        .on_hit_effects
                        .iter()
                        .map(|(effect, amplifier)| EffectSpec::new(*effect, *amplifier, duration_ms))
                        .collect(),
                    particle: tier.particle.clone(),
                    sound: tier.sound.clone(),
                })
            },
        );
        if let Some(event) = &fired {
            log::debug!("{} proc fired for {} ({} effects)", event.tier, actor, event.effects.len());
        }
        fired
    }

    /// Whether the teleport perk is off cooldown; does not stamp
    pub fn can_teleport(&self, actor: ActorId, cooldown_ms: Millis, now: Millis) -> bool {
        self.store.is_ready(actor, CooldownKind::Teleport, cooldown_ms, now)
    }

    /// Milliseconds until `actor` may teleport again
    pub fn teleport_remaining(&self, actor: ActorId, cooldown_ms: Millis, now: Millis) -> Millis {
        self.store.remaining(actor, CooldownKind::Teleport, cooldown_ms, now)
    }

    /// Record a teleport the host actually performed
    pub fn confirm_teleport(&self, actor: ActorId, now: Millis) {
        self.store.stamp(actor, CooldownKind::Teleport, now);
    }

    /// Drop state for actors idle past `horizon_ms`
    pub fn sweep(&self, now: Millis, horizon_ms: Millis) -> usize {
        let removed = self.store.sweep(now, horizon_ms);
        if removed > 0 {
            log::debug!("Swept proc state for {} idle actors", removed);
        }
        removed
    }
}
