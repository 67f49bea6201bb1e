//! Configuration data
//!
//! This module handles loading the rarity config from an external RON file,
//! with built-in defaults for everything it leaves out.

pub mod settings;
pub mod defaults;
pub mod loader;
pub mod validate;

pub use settings::{
    AbilitySettings, CompatibilitySettings, DungeonLootSettings, FailureSettings, GeneralSettings,
    IngredientSettings, LootBracket, LootPick, RarityConfig, RequirementSettings, UpgradeSettings,
};
pub use defaults::{default_tiers, DEFAULT_CHAIN};
pub use loader::{default_config_path, export_default_config, load_config, load_or_default, read_config_file};
pub use validate::validate;
