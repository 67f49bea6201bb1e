//! Tier selection for new items
//!
//! Crafted items go through [`WeightedTierSelector`]; structure loot below the
//! dungeon depth goes through [`DungeonLootRoller`].

use std::sync::Arc;

use crate::data::settings::DungeonLootSettings;
use crate::rarity::{RarityTier, TierId, TierTable};
use crate::rolls::RollSource;

/// Pick a tier for a roll in `[0, 100)`
///
/// Tiers are tested rarest first and the first one whose craft chance is at
/// least the roll wins. Chances are thresholds, not slices: a tier only gets
/// the part of its range that no rarer tier already covered.
pub fn pick_by_roll(table: &TierTable, roll: f64) -> Option<&Arc<RarityTier>> {
    table
        .ascending_by_rarity()
        .iter()
        .find(|tier| roll <= tier.craft_chance)
}

/// Probability (in percent) that each tier is picked for a uniform roll
///
/// Follows directly from the first-match rule in [`pick_by_roll`].
pub fn effective_chances(table: &TierTable) -> Vec<(TierId, f64)> {
    let mut covered = 0.0_f64;
    table
        .ascending_by_rarity()
        .iter()
        .map(|tier| {
            let upper = tier.craft_chance.clamp(0.0, 100.0);
            let share = (upper - covered).max(0.0);
            covered = covered.max(upper);
            (tier.id.clone(), share)
        })
        .collect()
}

/// Chooses a tier when an item is created
#[derive(Debug, Clone, Copy)]
pub struct WeightedTierSelector<'t> {
    table: &'t TierTable,
}

impl<'t> WeightedTierSelector<'t> {
    pub fn new(table: &'t TierTable) -> Self {
        Self { table }
    }

    /// Draw a tier, or `None` for a plain item
    ///
    /// Ineligible items never consume a roll.
    pub fn select(&self, eligible: bool, rolls: &mut impl RollSource) -> Option<&'t Arc<RarityTier>> {
        if !eligible || self.table.is_empty() {
            return None;
        }
        let roll = rolls.roll_percent();
        let picked = pick_by_roll(self.table, roll);
        log::debug!(
            "Rarity roll {:.2} -> {}",
            roll,
            picked.map(|t| t.id.as_str()).unwrap_or("none")
        );
        picked
    }
}

/// Rolls rarity for loot generated in underground structures
#[derive(Debug, Clone, Copy)]
pub struct DungeonLootRoller<'a> {
    table: &'a TierTable,
    settings: &'a DungeonLootSettings,
}

impl<'a> DungeonLootRoller<'a> {
    pub fn new(table: &'a TierTable, settings: &'a DungeonLootSettings) -> Self {
        Self { table, settings }
    }

    /// Whether loot generated at height `y` is eligible at all
    pub fn applies_at(&self, y: Option<i32>) -> bool {
        if !self.settings.enabled {
            return false;
        }
        // Without a location every container counts
        y.map_or(true, |y| y < self.settings.max_depth_y)
    }

    /// One bracket roll, then fresh rolls inside the bracket
    ///
    /// A picked tier that no longer exists leaves the item plain.
    pub fn roll(&self, y: Option<i32>, rolls: &mut impl RollSource) -> Option<&'a Arc<RarityTier>> {
        if !self.applies_at(y) {
            return None;
        }
        let roll = rolls.roll_percent();
        let bracket = self.settings.brackets.iter().find(|b| roll < b.below)?;

        let mut picked = None;
        for (i, pick) in bracket.picks.iter().enumerate() {
            let last = i + 1 == bracket.picks.len();
            if last || rolls.roll_percent() < pick.chance {
                picked = Some(&pick.tier);
                break;
            }
        }
        let tier = picked.and_then(|id| self.table.by_id(id.as_str()));
        log::debug!(
            "Dungeon loot roll {:.2} -> {}",
            roll,
            tier.map(|t| t.id.as_str()).unwrap_or("none")
        );
        tier
    }
}
