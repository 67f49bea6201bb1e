//! Rarity tier definitions

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::combat::status::StatusEffect;
use crate::items::item::Attribute;
use super::abilities::SpecialAbilities;

/// Unique key of a tier, also the value stored in an item's rarity tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierId(String);

impl TierId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TierId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TierId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for TierId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Flat stat bonuses a tier adds on top of an item's base values
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeSet {
    pub damage: f64,
    pub armor: f64,
    pub toughness: f64,
    pub attack_speed: f64,
    pub health: f64,
    /// Fraction of base movement speed (0.1 = +10%)
    pub speed: f64,
    pub luck: f64,
}

impl AttributeSet {
    /// Bonus for a single attribute
    pub fn get(&self, attribute: Attribute) -> f64 {
        match attribute {
            Attribute::AttackDamage => self.damage,
            Attribute::AttackSpeed => self.attack_speed,
            Attribute::Armor => self.armor,
            Attribute::ArmorToughness => self.toughness,
            Attribute::MaxHealth => self.health,
            Attribute::MovementSpeed => self.speed,
            Attribute::Luck => self.luck,
        }
    }

    pub fn is_zero(&self) -> bool {
        Attribute::ALL.iter().all(|a| self.get(*a) == 0.0)
    }
}

fn default_effect_cooldown() -> u64 {
    5000
}

fn default_effect_chance() -> f64 {
    100.0
}

/// A named rarity level
///
/// Tiers are immutable once loaded into a registry; all sharing happens
/// through `Arc<RarityTier>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RarityTier {
    pub id: TierId,
    pub display_name: String,
    /// Presentation color token, e.g. `gold` or `#ff55ff`
    pub color: String,
    /// Position in the progression, 0 for the base tier
    pub tier_index: u32,
    #[serde(default)]
    pub bonuses: AttributeSet,
    /// Effects applied to a struck target, mapped to their amplifier
    #[serde(default)]
    pub on_hit_effects: BTreeMap<StatusEffect, u8>,
    #[serde(default = "default_effect_cooldown")]
    pub effect_cooldown_ms: u64,
    #[serde(default = "default_effect_chance")]
    pub effect_chance: f64,
    /// Selection threshold at craft time; smaller is rarer
    #[serde(default)]
    pub craft_chance: f64,
    /// Next tier in the upgrade chain, absent on the maximal tier
    #[serde(default)]
    pub upgrade_target: Option<TierId>,
    /// Presentation hints passed through to hit events
    #[serde(default)]
    pub particle: Option<String>,
    #[serde(default)]
    pub sound: Option<String>,
    #[serde(default)]
    pub special: SpecialAbilities,
}

impl RarityTier {
    /// Create a tier with no bonuses, effects or abilities
    pub fn new(id: impl Into<TierId>, display_name: impl Into<String>, tier_index: u32) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            color: "white".to_string(),
            tier_index,
            bonuses: AttributeSet::default(),
            on_hit_effects: BTreeMap::new(),
            effect_cooldown_ms: default_effect_cooldown(),
            effect_chance: default_effect_chance(),
            craft_chance: 0.0,
            upgrade_target: None,
            particle: None,
            sound: None,
            special: SpecialAbilities::default(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_craft_chance(mut self, chance: f64) -> Self {
        self.craft_chance = chance;
        self
    }

    pub fn with_bonuses(mut self, bonuses: AttributeSet) -> Self {
        self.bonuses = bonuses;
        self
    }

    pub fn with_upgrade_target(mut self, target: impl Into<TierId>) -> Self {
        self.upgrade_target = Some(target.into());
        self
    }

    pub fn with_on_hit(mut self, effect: StatusEffect, amplifier: u8) -> Self {
        self.on_hit_effects.insert(effect, amplifier);
        self
    }

    pub fn with_effect_gate(mut self, cooldown_ms: u64, chance: f64) -> Self {
        self.effect_cooldown_ms = cooldown_ms;
        self.effect_chance = chance;
        self
    }

    pub fn with_special(mut self, special: SpecialAbilities) -> Self {
        self.special = special;
        self
    }

    pub fn is_maximal(&self) -> bool {
        self.upgrade_target.is_none()
    }

    /// Star string shown next to the name, one star per rank
    pub fn stars(&self) -> String {
        "✦".repeat(self.tier_index as usize + 1)
    }

    /// Legendary and above in the default progression
    pub fn is_very_rare(&self) -> bool {
        self.tier_index >= 4
    }

    /// Divine and above in the default progression
    pub fn is_extremely_rare(&self) -> bool {
        self.tier_index >= 6
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_lookup() {
        let set = AttributeSet {
            damage: 2.0,
            speed: 0.05,
            ..Default::default()
        };
        assert_eq!(set.get(Attribute::AttackDamage), 2.0);
        assert_eq!(set.get(Attribute::MovementSpeed), 0.05);
        assert_eq!(set.get(Attribute::Armor), 0.0);
        assert!(!set.is_zero());
        assert!(AttributeSet::default().is_zero());
    }

    #[test]
    fn test_tier_defaults_from_ron() {
        let tier: RarityTier = ron::from_str(
            r#"(id: "rare", display_name: "Rare", color: "blue", tier_index: 2, craft_chance: 4.0)"#,
        )
        .unwrap();
        assert_eq!(tier.effect_cooldown_ms, 5000);
        assert_eq!(tier.effect_chance, 100.0);
        assert!(tier.is_maximal());
        assert_eq!(tier.stars(), "✦✦✦");
    }
}
