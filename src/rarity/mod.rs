//! Rarity tiers
//!
//! Tier definitions, their typed special abilities and the live registry.

pub mod tier;
pub mod abilities;
pub mod chain;
pub mod registry;

pub use tier::{RarityTier, TierId, AttributeSet};
pub use abilities::{
    AbilityTable, ArmorPassive, AxeAbility, BootsAbility, BowAbility, FamilyAbility, FireTrail,
    FrostWalk, LavaWalk, PassiveEffect, SpecialAbilities, SwordAbility, TeleportAbility,
    TimedEffect, TridentAbility, Vortex,
};
pub use registry::{TierRegistry, TierTable};
