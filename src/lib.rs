//! Rareforge - rarity tiers for equipment
//!
//! Rolls a rarity onto crafted and looted gear, composes the tier's stat
//! bonuses onto the item, runs two-item upgrades along the tier chain and
//! gates on-hit procs and equipment abilities behind per-actor cooldowns.

pub mod error;
pub mod rolls;
pub mod rarity;
pub mod items;
pub mod combat;
pub mod data;
pub mod engine;

// Re-export commonly used types
pub use engine::RarityEngine;
pub use error::{ConfigError, LoadError, ValidationReport};
pub use rarity::{RarityTier, TierId, TierRegistry, TierTable};
pub use items::{ItemStack, UpgradeOutcome};
pub use data::RarityConfig;
pub use rolls::{RollSource, ScriptedRolls};
