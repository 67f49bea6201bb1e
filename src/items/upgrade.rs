//! Two-item rarity upgrades
//!
//! Combining runs in two phases. [`UpgradeStateMachine::prepare`] finds a pair
//! and checks every requirement without rolling anything; the resulting
//! [`PreparedUpgrade`] can still be cancelled with no effect. Once
//! [`PreparedUpgrade::resolve`] starts rolling, it always reaches a terminal
//! [`UpgradeOutcome`].

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::data::settings::UpgradeSettings;
use crate::rarity::{RarityTier, TierId, TierTable};
use crate::rolls::RollSource;
use super::attributes::AttributeCompositor;
use super::item::{ItemKind, ItemStack};
use super::requirements::{check_all, Rejection};

/// A pair that passed pair-finding, bound to one registry snapshot
#[derive(Debug, Clone)]
pub struct UpgradeAttempt<'t> {
    pub item_a: ItemStack,
    pub item_b: ItemStack,
    pub current: &'t Arc<RarityTier>,
    pub target: &'t Arc<RarityTier>,
    /// Everything else that was in the grid
    pub auxiliary: Vec<ItemStack>,
}

impl UpgradeAttempt<'_> {
    fn into_items(self) -> Vec<ItemStack> {
        let mut items = vec![self.item_a, self.item_b];
        items.extend(self.auxiliary);
        items
    }
}

/// Result of the check phase
#[derive(Debug)]
pub enum Preparation<'t> {
    /// No combinable pair; items handed back untouched
    Idle(Vec<ItemStack>),
    /// A gate failed; nothing was rolled
    Rejected { reason: Rejection, items: Vec<ItemStack> },
    Ready(PreparedUpgrade<'t>),
}

/// Final state of one combination
#[derive(Debug, Clone, PartialEq)]
pub enum UpgradeOutcome {
    /// No pair was found
    NoPair { items: Vec<ItemStack> },
    Rejected { reason: Rejection, items: Vec<ItemStack> },
    Success {
        result: ItemStack,
        from: TierId,
        to: TierId,
        /// Auxiliary items left after consuming ingredients
        leftover: Vec<ItemStack>,
    },
    Failure {
        /// Items the player keeps, the survivor first
        returned: Vec<ItemStack>,
        destroyed_one: bool,
        downgraded_to: Option<TierId>,
        leftover: Vec<ItemStack>,
    },
    /// Both items of the pair are gone
    CriticalFailure { tier: TierId, leftover: Vec<ItemStack> },
}

impl UpgradeOutcome {
    /// Whether dice were rolled and ingredients spent
    pub fn was_rolled(&self) -> bool {
        matches!(
            self,
            UpgradeOutcome::Success { .. } | UpgradeOutcome::Failure { .. } | UpgradeOutcome::CriticalFailure { .. }
        )
    }

    pub fn is_success(&self) -> bool {
        matches!(self, UpgradeOutcome::Success { .. })
    }

    /// Every item the player ends up holding
    pub fn into_items(self) -> Vec<ItemStack> {
        match self {
            UpgradeOutcome::NoPair { items } | UpgradeOutcome::Rejected { items, .. } => items,
            UpgradeOutcome::Success { result, leftover, .. } => {
                let mut items = vec![result];
                items.extend(leftover);
                items
            }
            UpgradeOutcome::Failure { mut returned, leftover, .. } => {
                returned.extend(leftover);
                returned
            }
            UpgradeOutcome::CriticalFailure { leftover, .. } => leftover,
        }
    }
}

/// Combines two same-tier items into the next tier
#[derive(Debug, Clone, Copy)]
pub struct UpgradeStateMachine<'a> {
    table: &'a TierTable,
    compositor: &'a AttributeCompositor,
    settings: &'a UpgradeSettings,
}

impl<'a> UpgradeStateMachine<'a> {
    pub fn new(table: &'a TierTable, compositor: &'a AttributeCompositor, settings: &'a UpgradeSettings) -> Self {
        Self {
            table,
            compositor,
            settings,
        }
    }

    /// First two items of one kind sharing a live tier, in grid order
    fn find_pair(&self, items: &[ItemStack]) -> Option<(usize, usize, &'a Arc<RarityTier>)> {
        for (i, a) in items.iter().enumerate() {
            let Some(tier) = self.table.resolve(a.rarity_tag.as_ref()) else {
                continue;
            };
            for (j, b) in items.iter().enumerate().skip(i + 1) {
                let same_tier = self
                    .table
                    .resolve(b.rarity_tag.as_ref())
                    .is_some_and(|other| other.id == tier.id);
                if b.kind == a.kind && same_tier {
                    return Some((i, j, tier));
                }
            }
        }
        None
    }

    /// Pair finding and requirement checks; never rolls
    pub fn prepare(&self, mut items: Vec<ItemStack>) -> Preparation<'a> {
        if !self.settings.enabled {
            return Preparation::Idle(items);
        }
        let Some((i, j, current)) = self.find_pair(&items) else {
            return Preparation::Idle(items);
        };

        let Some(target) = self.table.chain_next(current.id.as_str()) else {
            log::debug!("{} is already maximal, nothing to combine into", current.id);
            return Preparation::Rejected {
                reason: Rejection::AlreadyMaximal {
                    tier: current.id.clone(),
                },
                items,
            };
        };

        let pair = [&items[i], &items[j]];
        if let Err(reason) = check_all(pair, &items_except(&items, i, j), &target.id, self.settings, self.compositor.catalog()) {
            log::debug!("Upgrade {} -> {} rejected: {}", current.id, target.id, reason);
            return Preparation::Rejected { reason, items };
        }

        let item_b = items.remove(j);
        let item_a = items.remove(i);
        Preparation::Ready(PreparedUpgrade {
            machine: *self,
            attempt: UpgradeAttempt {
                item_a,
                item_b,
                current,
                target,
                auxiliary: items,
            },
        })
    }

    /// Prepare and resolve in one go
    pub fn combine(&self, items: Vec<ItemStack>, rolls: &mut impl RollSource) -> UpgradeOutcome {
        match self.prepare(items) {
            Preparation::Idle(items) => UpgradeOutcome::NoPair { items },
            Preparation::Rejected { reason, items } => UpgradeOutcome::Rejected { reason, items },
            Preparation::Ready(prepared) => prepared.resolve(rolls),
        }
    }

    fn merged(&self, a: &ItemStack, b: &ItemStack) -> ItemStack {
        let mut enchantments: BTreeMap<String, u32> = a.enchantments.clone();
        for (name, level) in &b.enchantments {
            let slot = enchantments.entry(name.clone()).or_insert(0);
            *slot = (*slot).max(*level);
        }
        let mut merged = ItemStack::new(a.kind.clone());
        merged.damage = a.damage.min(b.damage);
        merged.enchantments = enchantments;
        if a.attributes.is_none() {
            merged.attributes = None;
        }
        merged
    }
}

fn items_except(items: &[ItemStack], i: usize, j: usize) -> Vec<ItemStack> {
    items
        .iter()
        .enumerate()
        .filter(|(k, _)| *k != i && *k != j)
        .map(|(_, item)| item.clone())
        .collect()
}

/// Take the required ingredient counts out of the auxiliary stacks
fn consume_ingredients(mut auxiliary: Vec<ItemStack>, required: Option<&BTreeMap<ItemKind, u32>>) -> Vec<ItemStack> {
    let Some(required) = required else {
        return auxiliary;
    };
    for (kind, count) in required {
        let mut left = *count;
        for stack in auxiliary.iter_mut().filter(|s| &s.kind == kind) {
            if left == 0 {
                break;
            }
            let taken = left.min(stack.amount);
            stack.amount -= taken;
            left -= taken;
        }
    }
    auxiliary.retain(|s| s.amount > 0);
    auxiliary
}

/// A checked attempt waiting for its rolls
#[derive(Debug)]
pub struct PreparedUpgrade<'a> {
    machine: UpgradeStateMachine<'a>,
    attempt: UpgradeAttempt<'a>,
}

impl<'a> PreparedUpgrade<'a> {
    pub fn attempt(&self) -> &UpgradeAttempt<'a> {
        &self.attempt
    }

    /// Abandon the attempt; every item comes back unchanged
    pub fn cancel(self) -> Vec<ItemStack> {
        self.attempt.into_items()
    }

    /// Roll success, critical failure and downgrade as needed
    pub fn resolve(self, rolls: &mut impl RollSource) -> UpgradeOutcome {
        let PreparedUpgrade { machine, attempt } = self;
        let settings = machine.settings;
        let UpgradeAttempt {
            item_a,
            item_b,
            current,
            target,
            auxiliary,
        } = attempt;

        let ingredients = if settings.ingredients.enabled {
            settings.ingredients.requirements.get(&target.id)
        } else {
            None
        };
        let leftover = consume_ingredients(auxiliary, ingredients);

        let chance = settings.success_chance(&current.id);
        let success = chance >= 100.0 || rolls.roll_percent() <= chance;

        if success {
            let result = machine.compositor.apply(machine.merged(&item_a, &item_b), target);
            log::info!("Upgraded {} from {} to {}", result.kind, current.id, target.id);
            return UpgradeOutcome::Success {
                result,
                from: current.id.clone(),
                to: target.id.clone(),
                leftover,
            };
        }

        let failure = &settings.failure;
        if rolls.roll_percent() < failure.critical_failure_chance {
            log::info!("Critical failure combining {} {}, both destroyed", current.id, item_a.kind);
            return UpgradeOutcome::CriticalFailure {
                tier: current.id.clone(),
                leftover,
            };
        }

        let mut survivor = item_a;
        let mut downgraded_to = None;
        if rolls.roll_percent() < failure.downgrade_chance {
            if let Some(previous) = machine.table.chain_previous(current.id.as_str()) {
                survivor = machine.compositor.apply(survivor, previous);
                downgraded_to = Some(previous.id.clone());
            }
        }

        let mut returned = vec![survivor];
        if !failure.destroy_one_item {
            returned.push(item_b);
        }
        log::info!(
            "Failed combining {} {}{}{}",
            current.id,
            returned[0].kind,
            if failure.destroy_one_item { ", one item lost" } else { "" },
            match &downgraded_to {
                Some(id) => format!(", downgraded to {}", id),
                None => String::new(),
            }
        );
        UpgradeOutcome::Failure {
            returned,
            destroyed_one: failure.destroy_one_item,
            downgraded_to,
            leftover,
        }
    }
}
