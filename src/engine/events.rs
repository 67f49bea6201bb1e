//! Descriptors handed back to the host
//!
//! The engine never touches the world. Everything it wants done comes back as
//! one of these values for the host (or a presentation layer) to act on.

use serde::{Deserialize, Serialize};

use crate::combat::{Millis, ProcFired, WeaponProc};
use crate::items::requirements::Rejection;
use crate::items::upgrade::UpgradeOutcome;
use crate::items::{Attribute, ItemKind, ItemStack};
use crate::rarity::TierId;

/// Result of one melee hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitOutcome {
    /// Damage after abilities
    pub damage: f64,
    /// On-hit effects to apply to the target
    pub proc_fired: Option<ProcFired>,
    pub ability: Option<WeaponProc>,
}

impl HitOutcome {
    /// A hit nothing reacted to
    pub fn plain(damage: f64) -> Self {
        Self {
            damage,
            proc_fired: None,
            ability: None,
        }
    }

    pub fn is_plain(&self) -> bool {
        self.proc_fired.is_none() && self.ability.is_none()
    }
}

/// Permission to blink forward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeleportGrant {
    /// Blocks along the look direction
    pub distance: f64,
    pub cooldown_ms: Millis,
}

/// Check-phase view of a crafting grid; nothing is consumed
#[derive(Debug, Clone, PartialEq)]
pub enum CombinePreview {
    /// No combinable pair
    Idle,
    Rejected(Rejection),
    Ready {
        from: TierId,
        to: TierId,
        /// Percent chance the upgrade succeeds
        success_chance: f64,
    },
}

/// Presentation-level summary of an upgrade outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UpgradeNotice {
    Nothing,
    Rejected(String),
    Success { from: TierId, to: TierId },
    Failure { destroyed_one: bool },
    Downgraded { to: TierId },
    CriticalFailure { tier: TierId },
}

impl From<&UpgradeOutcome> for UpgradeNotice {
    fn from(outcome: &UpgradeOutcome) -> Self {
        match outcome {
            UpgradeOutcome::NoPair { .. } => UpgradeNotice::Nothing,
            UpgradeOutcome::Rejected { reason, .. } => UpgradeNotice::Rejected(reason.to_string()),
            UpgradeOutcome::Success { from, to, .. } => UpgradeNotice::Success {
                from: from.clone(),
                to: to.clone(),
            },
            UpgradeOutcome::Failure {
                downgraded_to: Some(to),
                ..
            } => UpgradeNotice::Downgraded { to: to.clone() },
            UpgradeOutcome::Failure { destroyed_one, .. } => UpgradeNotice::Failure {
                destroyed_one: *destroyed_one,
            },
            UpgradeOutcome::CriticalFailure { tier, .. } => UpgradeNotice::CriticalFailure { tier: tier.clone() },
        }
    }
}

/// Everything `inspect` reports about an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemInspection {
    pub kind: ItemKind,
    /// Live tier; a stale tag shows up as `None` with `stale_tag` set
    pub tier: Option<TierId>,
    pub stale_tag: Option<TierId>,
    pub display_name: Option<String>,
    pub stars: String,
    pub totals: Vec<(Attribute, f64)>,
    pub next: Option<TierId>,
    pub previous: Option<TierId>,
    /// Ability labels for the item's family at this tier
    pub abilities: Vec<String>,
}

impl ItemInspection {
    /// Inspection of an item with no live tier
    pub fn plain(item: &ItemStack, totals: Vec<(Attribute, f64)>) -> Self {
        Self {
            kind: item.kind.clone(),
            tier: None,
            stale_tag: item.rarity_tag.clone(),
            display_name: None,
            stars: String::new(),
            totals,
            next: None,
            previous: None,
            abilities: Vec::new(),
        }
    }
}
