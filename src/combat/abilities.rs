//! Weapon and projectile abilities
//!
//! Melee abilities share one cooldown per attacker. Ranged abilities are
//! stamped onto the projectile at launch as [`ArrowTags`] and read back on
//! damage and impact, so a reload between shot and hit can't change them.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::items::catalog::ItemFamily;
use crate::rarity::{AbilityTable, BowAbility, RarityTier, Vortex};
use crate::rolls::RollSource;
use super::cooldowns::{ActorId, CooldownKind, CooldownStore};
use super::status::{EffectSpec, StatusEffect};
use super::Millis;

/// Default explosion strength of an explosive arrow
pub const EXPLOSIVE_ARROW_POWER: f64 = 2.0;

/// A melee ability that went off
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WeaponProc {
    /// Multiply this hit's damage
    Crit { multiplier: f64 },
    /// Axe effects on the target
    Cripple { effects: Vec<EffectSpec>, halt_target: bool },
    Trident {
        effects: Vec<EffectSpec>,
        lightning_strikes: u8,
        vortex: Option<Vortex>,
    },
}

impl WeaponProc {
    /// Scale a hit's damage
    pub fn apply_damage(&self, damage: f64) -> f64 {
        match self {
            WeaponProc::Crit { multiplier } => damage * multiplier,
            _ => damage,
        }
    }
}

/// Melee abilities behind the shared ability cooldown
#[derive(Debug, Clone)]
pub struct WeaponAbilities {
    store: Arc<CooldownStore>,
    cooldown_ms: Millis,
    crit_multiplier: f64,
}

impl WeaponAbilities {
    pub fn new(store: Arc<CooldownStore>, cooldown_ms: Millis, crit_multiplier: f64) -> Self {
        Self {
            store,
            cooldown_ms,
            crit_multiplier,
        }
    }

    /// Resolve the ability of a weapon of `family` at `tier`
    ///
    /// Swords only start the cooldown when the crit lands; axes and tridents
    /// start it on every hit that finds an ability.
    pub fn on_hit(
        &self,
        actor: ActorId,
        family: ItemFamily,
        tier: &RarityTier,
        table: &AbilityTable,
        now: Millis,
        rolls: &mut impl RollSource,
    ) -> Option<WeaponProc> {
        let index = tier.tier_index;
        let fired = match family {
            ItemFamily::Sword => {
                let sword = table.sword(index)?;
                let multiplier = self.crit_multiplier;
                self.store.claim(actor, CooldownKind::Ability, self.cooldown_ms, now, || {
                    (rolls.roll_percent() < sword.crit_chance).then_some(WeaponProc::Crit { multiplier })
                })
            }
            ItemFamily::Axe => {
                let axe = table.axe(index)?;
                self.store.claim(actor, CooldownKind::Ability, self.cooldown_ms, now, || {
                    Some(WeaponProc::Cripple {
                        effects: axe.effects.iter().map(|e| e.spec()).collect(),
                        halt_target: axe.halt_target,
                    })
                })
            }
            ItemFamily::Trident => {
                let trident = table.trident(index)?;
                self.store.claim(actor, CooldownKind::Ability, self.cooldown_ms, now, || {
                    Some(WeaponProc::Trident {
                        effects: trident.effects.iter().map(|e| e.spec()).collect(),
                        lightning_strikes: trident.lightning_strikes,
                        vortex: trident.vortex,
                    })
                })
            }
            _ => None,
        };
        if let Some(event) = &fired {
            log::debug!("{} ability for {}: {:?}", tier.id, actor, event);
        }
        fired
    }
}

/// Markers stored on a launched projectile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrowTags {
    pub damage_multiplier: f64,
    pub velocity_multiplier: f64,
    pub fire_ticks: u32,
    pub explosive: bool,
    pub divine: bool,
}

impl ArrowTags {
    /// Tags for a shot from a bow or crossbow at `tier`; `None` if nothing changes
    pub fn for_launch(family: ItemFamily, tier: &RarityTier, table: &AbilityTable) -> Option<Self> {
        if !family.is_ranged() {
            return None;
        }
        let bow = table.ranged(tier.tier_index, family)?;
        let tags = Self::from(*bow);
        (!tags.is_plain()).then_some(tags)
    }

    /// Nothing differs from an ordinary arrow
    pub fn is_plain(&self) -> bool {
        self.damage_multiplier <= 1.0
            && self.velocity_multiplier == 1.0
            && self.fire_ticks == 0
            && !self.explosive
            && !self.divine
    }

    /// Damage after the stored multiplier; multipliers at or below 1 are ignored
    pub fn scale_damage(&self, damage: f64) -> f64 {
        if self.damage_multiplier > 1.0 {
            damage * self.damage_multiplier
        } else {
            damage
        }
    }

    /// What happens where the projectile lands
    pub fn impacts(&self, explosion_power: f64) -> Vec<ProjectileImpact> {
        let mut out = Vec::new();
        if self.explosive {
            out.push(ProjectileImpact::Explosion {
                power: explosion_power,
                fire: false,
                break_blocks: false,
            });
        }
        if self.divine {
            out.push(ProjectileImpact::ShooterEffect(EffectSpec::new(
                StatusEffect::Regeneration,
                1,
                5000,
            )));
            out.push(ProjectileImpact::TargetEffect(EffectSpec::new(StatusEffect::Glowing, 0, 10_000)));
            out.push(ProjectileImpact::TargetEffect(EffectSpec::new(StatusEffect::Slowness, 1, 3000)));
        }
        out
    }
}

impl From<BowAbility> for ArrowTags {
    fn from(bow: BowAbility) -> Self {
        Self {
            damage_multiplier: bow.damage_multiplier,
            velocity_multiplier: bow.velocity_multiplier,
            fire_ticks: bow.fire_ticks,
            explosive: bow.explosive,
            divine: bow.divine,
        }
    }
}

/// One consequence of a tagged projectile landing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProjectileImpact {
    Explosion { power: f64, fire: bool, break_blocks: bool },
    ShooterEffect(EffectSpec),
    /// Only applies when the projectile hit a living entity
    TargetEffect(EffectSpec),
}
