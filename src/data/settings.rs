//! Configuration sections
//!
//! Every section deserializes from RON with per-field defaults, so a config
//! file only needs to mention what it changes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::combat::abilities::EXPLOSIVE_ARROW_POWER;
use crate::combat::status::EFFECT_DURATION_SECS;
use crate::combat::Millis;
use crate::items::item::{ItemKind, ItemStack};
use crate::rarity::{RarityTier, TierId};
use super::defaults::default_tiers;

/// Top-level configuration document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RarityConfig {
    pub settings: GeneralSettings,
    pub compatibility: CompatibilitySettings,
    pub tiers: Vec<RarityTier>,
    pub upgrades: UpgradeSettings,
    pub abilities: AbilitySettings,
    pub dungeon_loot: DungeonLootSettings,
}

impl Default for RarityConfig {
    fn default() -> Self {
        Self {
            settings: GeneralSettings::default(),
            compatibility: CompatibilitySettings::default(),
            tiers: default_tiers(),
            upgrades: UpgradeSettings::default(),
            abilities: AbilitySettings::default(),
            dungeon_loot: DungeonLootSettings::default(),
        }
    }
}

/// Global switches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    pub enabled: bool,
    /// Treat hoes as weapons
    pub include_hoes: bool,
    /// Log every roll at info level instead of debug
    pub debug: bool,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            include_hoes: false,
            debug: false,
        }
    }
}

/// Which crafted items are left alone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompatibilitySettings {
    /// Skip items that already carry attribute modifiers
    pub ignore_items_with_attributes: bool,
    /// Skip items with a custom name
    pub ignore_items_with_custom_names: bool,
    pub ignored_kinds: Vec<ItemKind>,
    /// Case-insensitive substrings matched against custom names
    pub ignored_item_names: Vec<String>,
}

impl Default for CompatibilitySettings {
    fn default() -> Self {
        Self {
            ignore_items_with_attributes: true,
            ignore_items_with_custom_names: false,
            ignored_kinds: Vec::new(),
            ignored_item_names: Vec::new(),
        }
    }
}

impl CompatibilitySettings {
    /// Whether the craft hook should leave this item untouched
    pub fn ignores(&self, item: &ItemStack) -> bool {
        if self.ignore_items_with_attributes && item.has_modifiers() {
            return true;
        }
        if self.ignore_items_with_custom_names && item.custom_name.is_some() {
            return true;
        }
        if self.ignored_kinds.contains(&item.kind) {
            return true;
        }
        match &item.custom_name {
            Some(name) => {
                let name = name.to_lowercase();
                self.ignored_item_names
                    .iter()
                    .any(|ignored| name.contains(&ignored.to_lowercase()))
            }
            None => false,
        }
    }
}

/// Combination requirements, chances and consequences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeSettings {
    pub enabled: bool,
    /// Used for tiers missing from `success_chances`
    pub default_success_chance: f64,
    /// Keyed by the tier being combined, not the target
    pub success_chances: BTreeMap<TierId, f64>,
    pub requirements: RequirementSettings,
    pub failure: FailureSettings,
    pub ingredients: IngredientSettings,
}

impl Default for UpgradeSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            default_success_chance: 100.0,
            success_chances: BTreeMap::new(),
            requirements: RequirementSettings::default(),
            failure: FailureSettings::default(),
            ingredients: IngredientSettings::default(),
        }
    }
}

impl UpgradeSettings {
    pub fn success_chance(&self, current: &TierId) -> f64 {
        self.success_chances
            .get(current)
            .copied()
            .unwrap_or(self.default_success_chance)
    }
}

/// Gates checked before any roll, keyed by target tier where per-tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequirementSettings {
    pub min_durability_percent: f64,
    pub min_enchantments: BTreeMap<TierId, u32>,
    /// Substrings the item kind must contain, e.g. `DIAMOND`
    pub allowed_kinds: BTreeMap<TierId, Vec<String>>,
}

impl Default for RequirementSettings {
    fn default() -> Self {
        Self {
            min_durability_percent: 80.0,
            min_enchantments: BTreeMap::new(),
            allowed_kinds: BTreeMap::new(),
        }
    }
}

/// What happens when the success roll fails
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FailureSettings {
    pub critical_failure_chance: f64,
    pub downgrade_chance: f64,
    pub destroy_one_item: bool,
}

impl Default for FailureSettings {
    fn default() -> Self {
        Self {
            critical_failure_chance: 10.0,
            downgrade_chance: 30.0,
            destroy_one_item: true,
        }
    }
}

/// Extra items required next to the pair, keyed by target tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngredientSettings {
    pub enabled: bool,
    pub requirements: BTreeMap<TierId, BTreeMap<ItemKind, u32>>,
}

impl Default for IngredientSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            requirements: BTreeMap::new(),
        }
    }
}

/// Shared ability timings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilitySettings {
    /// Cooldown shared by sword, axe and trident abilities
    pub ability_cooldown_ms: Millis,
    pub teleport_cooldown_ms: Millis,
    pub crit_multiplier: f64,
    /// How long refreshed armor passives last
    pub passive_duration_ms: Millis,
    /// How often the host should call the periodic tick
    pub passive_refresh_ms: Millis,
    /// On-hit proc durations per tier rank, in seconds
    pub effect_duration_secs: Vec<u64>,
    /// Explosion power of explosive arrows
    pub explosive_arrow_power: f64,
}

impl Default for AbilitySettings {
    fn default() -> Self {
        Self {
            ability_cooldown_ms: 3000,
            teleport_cooldown_ms: 10_000,
            crit_multiplier: 2.0,
            passive_duration_ms: 6000,
            passive_refresh_ms: 5000,
            effect_duration_secs: EFFECT_DURATION_SECS.to_vec(),
            explosive_arrow_power: EXPLOSIVE_ARROW_POWER,
        }
    }
}

/// One candidate tier inside a loot bracket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootPick {
    pub tier: TierId,
    /// Percent chance, tested with its own roll; the last pick always wins
    #[serde(default = "always")]
    pub chance: f64,
}

fn always() -> f64 {
    100.0
}

impl LootPick {
    pub fn new(tier: impl Into<TierId>, chance: f64) -> Self {
        Self {
            tier: tier.into(),
            chance,
        }
    }
}

/// A slice of the bracket roll: `roll < below` lands here
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootBracket {
    pub below: f64,
    pub picks: Vec<LootPick>,
}

/// Rarity for loot found underground
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonLootSettings {
    pub enabled: bool,
    /// Loot generated at or above this height is left alone
    pub max_depth_y: i32,
    /// Checked in order; first bracket with `roll < below` wins
    pub brackets: Vec<LootBracket>,
}

impl Default for DungeonLootSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_depth_y: 50,
            brackets: vec![
                LootBracket {
                    below: 1.0,
                    picks: vec![
                        LootPick::new("mythic", 30.0),
                        LootPick::new("legendary", 60.0),
                        LootPick::new("epic", 100.0),
                    ],
                },
                LootBracket {
                    below: 5.0,
                    picks: vec![LootPick::new("epic", 50.0), LootPick::new("rare", 100.0)],
                },
                LootBracket {
                    below: 15.0,
                    picks: vec![LootPick::new("rare", 30.0), LootPick::new("uncommon", 100.0)],
                },
                LootBracket {
                    below: 40.0,
                    picks: vec![LootPick::new("common", 100.0)],
                },
            ],
        }
    }
}
