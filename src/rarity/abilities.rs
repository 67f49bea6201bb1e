//! Per-family special abilities
//!
//! Each equipment family gets a closed, typed configuration block. A tier only
//! lists the families it actually enhances; the registry flattens these into an
//! [`AbilityTable`] keyed by `(tier_index, family)` so lookups never match on
//! tier names.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::combat::status::{EffectSpec, StatusEffect};
use crate::combat::Millis;
use crate::items::catalog::ItemFamily;

/// Swords: chance to land a critical strike
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwordAbility {
    /// Percent chance per hit
    pub crit_chance: f64,
}

/// A timed effect with a fixed duration, independent of tier rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedEffect {
    pub effect: StatusEffect,
    #[serde(default)]
    pub amplifier: u8,
    pub duration_ms: Millis,
}

impl TimedEffect {
    pub fn new(effect: StatusEffect, amplifier: u8, duration_ms: Millis) -> Self {
        Self {
            effect,
            amplifier,
            duration_ms,
        }
    }

    pub fn spec(&self) -> EffectSpec {
        EffectSpec::new(self.effect, self.amplifier, self.duration_ms)
    }
}

/// Axes: crippling effects on the target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxeAbility {
    pub effects: Vec<TimedEffect>,
    /// Zero the target's velocity on hit
    #[serde(default)]
    pub halt_target: bool,
}

/// Pull nearby entities toward the struck target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vortex {
    pub radius: f64,
    pub strength: f64,
}

/// Tridents: effects, lightning or a vortex
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TridentAbility {
    pub effects: Vec<TimedEffect>,
    pub lightning_strikes: u8,
    pub vortex: Option<Vortex>,
}

/// Bows and crossbows: arrow modifiers stamped at launch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BowAbility {
    pub damage_multiplier: f64,
    pub velocity_multiplier: f64,
    /// Fire ticks set on the arrow, 0 for none
    pub fire_ticks: u32,
    pub explosive: bool,
    pub divine: bool,
}

impl Default for BowAbility {
    fn default() -> Self {
        Self {
            damage_multiplier: 1.0,
            velocity_multiplier: 1.0,
            fire_ticks: 0,
            explosive: false,
            divine: false,
        }
    }
}

/// A refreshed passive effect granted while the piece is worn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassiveEffect {
    pub effect: StatusEffect,
    #[serde(default)]
    pub amplifier: u8,
}

impl PassiveEffect {
    pub fn new(effect: StatusEffect, amplifier: u8) -> Self {
        Self { effect, amplifier }
    }
}

/// Helmet, chestplate and leggings passives
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmorPassive {
    pub effects: Vec<PassiveEffect>,
    /// Effects stripped from the wearer on every refresh
    pub cleanse: Vec<StatusEffect>,
}

/// Turn water below the wearer into ice
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrostWalk {
    /// 0 freezes only the block underfoot
    pub radius: u8,
    /// Revert the ice after this long; `None` leaves it to melt on its own
    #[serde(default)]
    pub revert_ms: Option<Millis>,
}

/// Ignite entities near the wearer while walking on solid ground
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FireTrail {
    pub radius: f64,
    pub ignite_ms: Millis,
}

/// Harden lava below the wearer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LavaWalk {
    pub revert_ms: Millis,
}

/// Blink forward on sneak + interact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeleportAbility {
    /// Blocks travelled along the look direction
    pub distance: f64,
}

/// Boots movement perks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootsAbility {
    pub frost_walk: Option<FrostWalk>,
    pub fire_trail: Option<FireTrail>,
    pub lava_walk: Option<LavaWalk>,
    pub fire_immunity: bool,
    pub teleport: Option<TeleportAbility>,
}

/// Every ability a tier grants, by family
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialAbilities {
    pub sword: Option<SwordAbility>,
    pub axe: Option<AxeAbility>,
    pub trident: Option<TridentAbility>,
    /// Shared by bows and crossbows
    pub bow: Option<BowAbility>,
    pub helmet: Option<ArmorPassive>,
    pub chestplate: Option<ArmorPassive>,
    pub leggings: Option<ArmorPassive>,
    pub boots: Option<BootsAbility>,
}

impl SpecialAbilities {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Flatten into `(family, ability)` pairs
    pub fn entries(&self) -> Vec<(ItemFamily, FamilyAbility)> {
        let mut out = Vec::new();
        if let Some(a) = self.sword {
            out.push((ItemFamily::Sword, FamilyAbility::Sword(a)));
        }
        if let Some(a) = &self.axe {
            out.push((ItemFamily::Axe, FamilyAbility::Axe(a.clone())));
        }
        if let Some(a) = &self.trident {
            out.push((ItemFamily::Trident, FamilyAbility::Trident(a.clone())));
        }
        if let Some(a) = self.bow {
            out.push((ItemFamily::Bow, FamilyAbility::Ranged(a)));
            out.push((ItemFamily::Crossbow, FamilyAbility::Ranged(a)));
        }
        if let Some(a) = &self.helmet {
            out.push((ItemFamily::Helmet, FamilyAbility::Passive(a.clone())));
        }
        if let Some(a) = &self.chestplate {
            out.push((ItemFamily::Chestplate, FamilyAbility::Passive(a.clone())));
        }
        if let Some(a) = &self.leggings {
            out.push((ItemFamily::Leggings, FamilyAbility::Passive(a.clone())));
        }
        if let Some(a) = &self.boots {
            out.push((ItemFamily::Boots, FamilyAbility::Boots(a.clone())));
        }
        out
    }
}

/// One family's ability at one tier
#[derive(Debug, Clone, PartialEq)]
pub enum FamilyAbility {
    Sword(SwordAbility),
    Axe(AxeAbility),
    Trident(TridentAbility),
    Ranged(BowAbility),
    Passive(ArmorPassive),
    Boots(BootsAbility),
}

impl FamilyAbility {
    /// Short label for tooltips and logs
    pub fn label(&self) -> &'static str {
        match self {
            FamilyAbility::Sword(_) => "Critical Strike",
            FamilyAbility::Axe(_) => "Crippling Blow",
            FamilyAbility::Trident(t) if t.lightning_strikes > 0 => "Storm Call",
            FamilyAbility::Trident(t) if t.vortex.is_some() => "Maelstrom",
            FamilyAbility::Trident(_) => "Undertow",
            FamilyAbility::Ranged(b) if b.divine => "Divine Arrows",
            FamilyAbility::Ranged(b) if b.explosive => "Explosive Arrows",
            FamilyAbility::Ranged(b) if b.fire_ticks > 0 => "Flaming Arrows",
            FamilyAbility::Ranged(_) => "Empowered Shots",
            FamilyAbility::Passive(_) => "Blessing",
            FamilyAbility::Boots(b) if b.teleport.is_some() => "Blink",
            FamilyAbility::Boots(b) if b.lava_walk.is_some() => "Lava Walker",
            FamilyAbility::Boots(b) if b.fire_trail.is_some() => "Fire Trail",
            FamilyAbility::Boots(_) => "Frost Step",
        }
    }
}

/// Ability lookup keyed by `(tier_index, family)`
#[derive(Debug, Clone, Default)]
pub struct AbilityTable {
    entries: HashMap<(u32, ItemFamily), FamilyAbility>,
}

impl AbilityTable {
    pub fn insert(&mut self, tier_index: u32, family: ItemFamily, ability: FamilyAbility) {
        self.entries.insert((tier_index, family), ability);
    }

    pub fn get(&self, tier_index: u32, family: ItemFamily) -> Option<&FamilyAbility> {
        self.entries.get(&(tier_index, family))
    }

    pub fn sword(&self, tier_index: u32) -> Option<&SwordAbility> {
        match self.get(tier_index, ItemFamily::Sword) {
            Some(FamilyAbility::Sword(a)) => Some(a),
            _ => None,
        }
    }

    pub fn axe(&self, tier_index: u32) -> Option<&AxeAbility> {
        match self.get(tier_index, ItemFamily::Axe) {
            Some(FamilyAbility::Axe(a)) => Some(a),
            _ => None,
        }
    }

    pub fn trident(&self, tier_index: u32) -> Option<&TridentAbility> {
        match self.get(tier_index, ItemFamily::Trident) {
            Some(FamilyAbility::Trident(a)) => Some(a),
            _ => None,
        }
    }

    pub fn ranged(&self, tier_index: u32, family: ItemFamily) -> Option<&BowAbility> {
        match self.get(tier_index, family) {
            Some(FamilyAbility::Ranged(a)) => Some(a),
            _ => None,
        }
    }

    pub fn passive(&self, tier_index: u32, family: ItemFamily) -> Option<&ArmorPassive> {
        match self.get(tier_index, family) {
            Some(FamilyAbility::Passive(a)) => Some(a),
            _ => None,
        }
    }

    pub fn boots(&self, tier_index: u32) -> Option<&BootsAbility> {
        match self.get(tier_index, ItemFamily::Boots) {
            Some(FamilyAbility::Boots(a)) => Some(a),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
