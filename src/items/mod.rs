//! Item system
//!
//! Item records, the kind catalog, attribute composition, tier selection,
//! upgrades and worn-equipment perks.

pub mod item;
pub mod catalog;
pub mod attributes;
pub mod loot;
pub mod requirements;
pub mod upgrade;
pub mod equipment;

pub use item::{Attribute, AttributeModifier, EquipSlot, ItemKind, ItemStack, Operation, RARITY_TAG_KEY};
pub use catalog::{CatalogEntry, ItemCatalog, ItemClass, ItemFamily};
pub use attributes::AttributeCompositor;
pub use loot::{effective_chances, pick_by_roll, DungeonLootRoller, WeightedTierSelector};
pub use requirements::Rejection;
pub use upgrade::{Preparation, PreparedUpgrade, UpgradeAttempt, UpgradeOutcome, UpgradeStateMachine};
pub use equipment::{movement_perks, passive_grants, teleport_ability, MovementPerk, PassiveGrant, WornArmor};
