//! Upgrade chain validation
//!
//! Tiers must form exactly one linear chain through `upgrade_target`: one base
//! tier, one maximal tier, no branches and no cycles.

use std::collections::{HashMap, HashSet};

use crate::error::ConfigError;
use super::tier::{RarityTier, TierId};

/// Highest tier index a config may use
pub const MAX_TIER_INDEX: u32 = 255;

/// Longest cooldown a config may ask for, one hour
pub const MAX_COOLDOWN_MS: u64 = 3_600_000;

/// Check field ranges that do not depend on other tiers
pub fn check_tier_fields(tier: &RarityTier) -> Result<(), ConfigError> {
    if tier.id.as_str().trim().is_empty() {
        return Err(ConfigError::EmptyField {
            tier: tier.id.to_string(),
            field: "id",
        });
    }
    if tier.display_name.trim().is_empty() {
        return Err(ConfigError::EmptyField {
            tier: tier.id.to_string(),
            field: "display_name",
        });
    }
    let context = format!("tier `{}`", tier.id);
    check_percent(&context, "craft_chance", tier.craft_chance)?;
    check_percent(&context, "effect_chance", tier.effect_chance)?;
    check_at_most(&context, "tier_index", u64::from(tier.tier_index), u64::from(MAX_TIER_INDEX))?;
    check_at_most(&context, "effect_cooldown_ms", tier.effect_cooldown_ms, MAX_COOLDOWN_MS)?;
    Ok(())
}

/// Reject counts and durations past `max`
pub fn check_at_most(context: &str, field: &'static str, value: u64, max: u64) -> Result<(), ConfigError> {
    if value <= max {
        Ok(())
    } else {
        Err(ConfigError::TooLarge {
            context: context.to_string(),
            field,
            value,
            max,
        })
    }
}

/// Reject values outside `0..=100`, including NaN
pub fn check_percent(context: &str, field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::PercentOutOfRange {
            context: context.to_string(),
            field,
            value,
        })
    }
}

/// Validate the tiers and return their ids in chain order, base first
pub fn resolve_chain(tiers: &[RarityTier]) -> Result<Vec<TierId>, ConfigError> {
    if tiers.is_empty() {
        return Err(ConfigError::NoTiers);
    }

    let mut next: HashMap<&TierId, Option<&TierId>> = HashMap::new();
    for tier in tiers {
        check_tier_fields(tier)?;
        if next.insert(&tier.id, tier.upgrade_target.as_ref()).is_some() {
            return Err(ConfigError::DuplicateTier(tier.id.to_string()));
        }
    }

    let mut sources: HashMap<&TierId, Vec<&TierId>> = HashMap::new();
    for tier in tiers {
        if let Some(target) = &tier.upgrade_target {
            if !next.contains_key(target) {
                return Err(ConfigError::DanglingUpgradeTarget {
                    tier: tier.id.to_string(),
                    target: target.to_string(),
                });
            }
            if *target == tier.id {
                return Err(ConfigError::ChainCycle(tier.id.to_string()));
            }
            sources.entry(target).or_default().push(&tier.id);
        }
    }

    // Walking from every tier finds cycles that sit apart from the main chain
    for tier in tiers {
        let mut seen = HashSet::new();
        let mut cursor = Some(&tier.id);
        while let Some(id) = cursor {
            if !seen.insert(id) {
                return Err(ConfigError::ChainCycle(id.to_string()));
            }
            cursor = next.get(id).copied().flatten();
        }
    }

    if let Some((target, from)) = sources.iter().find(|(_, from)| from.len() > 1) {
        let mut names: Vec<String> = from.iter().map(|id| id.to_string()).collect();
        names.sort();
        return Err(ConfigError::BranchingChain {
            target: target.to_string(),
            sources: names,
        });
    }

    let maximal: Vec<&RarityTier> = tiers.iter().filter(|t| t.upgrade_target.is_none()).collect();
    if maximal.len() > 1 {
        return Err(ConfigError::MultipleMaximalTiers(
            maximal.iter().map(|t| t.id.to_string()).collect(),
        ));
    }

    let base = tiers
        .iter()
        .find(|t| !sources.contains_key(&t.id))
        .ok_or_else(|| ConfigError::ChainCycle(tiers[0].id.to_string()))?;

    let mut chain = Vec::with_capacity(tiers.len());
    let mut cursor = Some(&base.id);
    while let Some(id) = cursor {
        chain.push(id.clone());
        cursor = next.get(id).copied().flatten();
    }

    if chain.len() != tiers.len() {
        let on_chain: HashSet<&TierId> = chain.iter().collect();
        let stray = tiers
            .iter()
            .find(|t| !on_chain.contains(&t.id))
            .map(|t| t.id.to_string())
            .unwrap_or_default();
        return Err(ConfigError::Disconnected(stray));
    }

    Ok(chain)
}
