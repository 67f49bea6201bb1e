//! Status effects
//!
//! The host owns the actual effect implementation. This module only names the
//! effects and describes what should be applied, for how long and how hard.

use serde::{Deserialize, Serialize};

use super::Millis;

/// On-hit proc durations in seconds, indexed by tier rank
///
/// Ranks past the end of the table use the last entry.
pub const EFFECT_DURATION_SECS: [u64; 8] = [3, 4, 6, 8, 10, 12, 15, 20];

/// Longest proc duration a config may ask for
pub const MAX_EFFECT_DURATION_SECS: u64 = 3600;

/// Effects a tier can apply to a target or grant to a wearer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatusEffect {
    // Debuffs
    Slowness,
    Weakness,
    Poison,
    Wither,
    Blindness,
    Nausea,
    Hunger,
    MiningFatigue,
    Levitation,
    Glowing,
    // Buffs
    Speed,
    Strength,
    JumpBoost,
    Regeneration,
    Resistance,
    FireResistance,
    WaterBreathing,
    NightVision,
    SlowFalling,
    Absorption,
}

impl StatusEffect {
    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            StatusEffect::Slowness => "Slowness",
            StatusEffect::Weakness => "Weakness",
            StatusEffect::Poison => "Poison",
            StatusEffect::Wither => "Wither",
            StatusEffect::Blindness => "Blindness",
            StatusEffect::Nausea => "Nausea",
            StatusEffect::Hunger => "Hunger",
            StatusEffect::MiningFatigue => "Mining Fatigue",
            StatusEffect::Levitation => "Levitation",
            StatusEffect::Glowing => "Glowing",
            StatusEffect::Speed => "Speed",
            StatusEffect::Strength => "Strength",
            StatusEffect::JumpBoost => "Jump Boost",
            StatusEffect::Regeneration => "Regeneration",
            StatusEffect::Resistance => "Resistance",
            StatusEffect::FireResistance => "Fire Resistance",
            StatusEffect::WaterBreathing => "Water Breathing",
            StatusEffect::NightVision => "Night Vision",
            StatusEffect::SlowFalling => "Slow Falling",
            StatusEffect::Absorption => "Absorption",
        }
    }

    /// Whether this effect hurts whoever receives it
    pub fn is_harmful(&self) -> bool {
        matches!(
            self,
            StatusEffect::Slowness
                | StatusEffect::Weakness
                | StatusEffect::Poison
                | StatusEffect::Wither
                | StatusEffect::Blindness
                | StatusEffect::Nausea
                | StatusEffect::Hunger
                | StatusEffect::MiningFatigue
                | StatusEffect::Levitation
        )
    }
}

/// A concrete effect application for the host to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectSpec {
    pub effect: StatusEffect,
    /// Zero-based amplifier (0 = level I)
    pub amplifier: u8,
    pub duration_ms: Millis,
}

impl EffectSpec {
    pub fn new(effect: StatusEffect, amplifier: u8, duration_ms: Millis) -> Self {
        Self {
            effect,
            amplifier,
            duration_ms,
        }
    }

    /// Duration in game ticks (20 per second)
    pub fn duration_ticks(&self) -> u64 {
        self.duration_ms / 50
    }
}

/// Proc duration for a tier rank, in milliseconds
pub fn proc_duration_ms(table: &[u64], rank: usize) -> Millis {
    let secs = match table.get(rank) {
        Some(secs) => *secs,
        None => table.last().copied().unwrap_or(EFFECT_DURATION_SECS[0]),
    };
    secs.saturating_mul(1000)
}
