//! Upgrade requirement gates
//!
//! Checked in a fixed order before any roll. The first gate that fails decides
//! the rejection reason.

use std::collections::BTreeMap;
use std::fmt;

use crate::data::settings::UpgradeSettings;
use crate::rarity::TierId;
use super::catalog::ItemCatalog;
use super::item::{ItemKind, ItemStack};

/// Why a combination was refused
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// The pair is already at the top of the chain
    AlreadyMaximal { tier: TierId },
    /// `which` is 0 for the first item of the pair, 1 for the second
    TooWorn { which: usize, percent: f64, required: f64 },
    TooFewEnchantments { required: u32, found: usize },
    KindNotAllowed { kind: ItemKind, allowed: Vec<String> },
    MissingIngredient { kind: ItemKind, required: u32, found: u32 },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::AlreadyMaximal { tier } => write!(f, "{} is already the highest rarity", tier),
            Rejection::TooWorn { which, percent, required } => write!(
                f,
                "item {} is too worn ({:.0}% durability, {:.0}% required)",
                which + 1,
                percent,
                required
            ),
            Rejection::TooFewEnchantments { required, found } => write!(
                f,
                "each item needs at least {} enchantments (found {})",
                required, found
            ),
            Rejection::KindNotAllowed { kind, allowed } => {
                write!(f, "{} cannot reach this rarity, allowed: {}", kind, allowed.join(", "))
            }
            Rejection::MissingIngredient { kind, required, found } => {
                write!(f, "needs {} x {} (found {})", required, kind, found)
            }
        }
    }
}

/// Both items must keep at least the configured share of durability
pub fn check_durability(
    pair: [&ItemStack; 2],
    catalog: &ItemCatalog,
    min_percent: f64,
) -> Result<(), Rejection> {
    for (which, item) in pair.iter().enumerate() {
        let percent = item.durability_percent(catalog.max_durability(&item.kind));
        if percent < min_percent {
            return Err(Rejection::TooWorn {
                which,
                percent,
                required: min_percent,
            });
        }
    }
    Ok(())
}

/// Both items need the target tier's minimum enchantment count
pub fn check_enchantments(pair: [&ItemStack; 2], required: u32) -> Result<(), Rejection> {
    if required == 0 {
        return Ok(());
    }
    let found = pair.iter().map(|i| i.enchantment_count()).min().unwrap_or(0);
    if found < required as usize {
        return Err(Rejection::TooFewEnchantments { required, found });
    }
    Ok(())
}

/// The kind must contain one of the allowed substrings, if any are listed
pub fn check_kind(kind: &ItemKind, allowed: &[String]) -> Result<(), Rejection> {
    if allowed.is_empty() {
        return Ok(());
    }
    let name = kind.as_str();
    if allowed.iter().any(|a| name.contains(a.to_ascii_uppercase().as_str())) {
        Ok(())
    } else {
        Err(Rejection::KindNotAllowed {
            kind: kind.clone(),
            allowed: allowed.to_vec(),
        })
    }
}

/// Count available auxiliary items by kind
pub fn tally(items: &[ItemStack]) -> BTreeMap<ItemKind, u32> {
    let mut counts = BTreeMap::new();
    for item in items {
        *counts.entry(item.kind.clone()).or_insert(0) += item.amount;
    }
    counts
}

/// Every required ingredient must be present in sufficient amount
pub fn check_ingredients(
    auxiliary: &[ItemStack],
    required: &BTreeMap<ItemKind, u32>,
) -> Result<(), Rejection> {
    let available = tally(auxiliary);
    for (kind, count) in required {
        let found = available.get(kind).copied().unwrap_or(0);
        if found < *count {
            return Err(Rejection::MissingIngredient {
                kind: kind.clone(),
                required: *count,
                found,
            });
        }
    }
    Ok(())
}

/// Run every gate for a pair heading to `target`
pub fn check_all(
    pair: [&ItemStack; 2],
    auxiliary: &[ItemStack],
    target: &TierId,
    settings: &UpgradeSettings,
    catalog: &ItemCatalog,
) -> Result<(), Rejection> {
    let req = &settings.requirements;
    check_durability(pair, catalog, req.min_durability_percent)?;
    check_enchantments(pair, req.min_enchantments.get(target).copied().unwrap_or(0))?;
    if let Some(allowed) = req.allowed_kinds.get(target) {
        check_kind(&pair[0].kind, allowed)?;
    }
    if settings.ingredients.enabled {
        if let Some(required) = settings.ingredients.requirements.get(target) {
            check_ingredients(auxiliary, required)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_durability_gate() {
        let catalog = ItemCatalog::vanilla(false);
        let fresh = ItemStack::new("IRON_SWORD");
        let worn = ItemStack::new("IRON_SWORD").with_damage(100);
        assert!(check_durability([&fresh, &fresh], &catalog, 80.0).is_ok());
        assert!(matches!(
            check_durability([&fresh, &worn], &catalog, 80.0),
            Err(Rejection::TooWorn { which: 1, .. })
        ));
        // Exactly at the limit passes
        let edge = ItemStack::new("IRON_SWORD").with_damage(50);
        assert!(check_durability([&edge, &edge], &catalog, 80.0).is_ok());
    }

    #[test]
    fn test_enchantment_gate() {
        let plain = ItemStack::new("IRON_SWORD");
        let one = ItemStack::new("IRON_SWORD").with_enchantment("sharpness", 3);
        assert!(check_enchantments([&plain, &plain], 0).is_ok());
        assert_eq!(
            check_enchantments([&one, &plain], 1),
            Err(Rejection::TooFewEnchantments { required: 1, found: 0 })
        );
    }

    #[test]
    fn test_kind_gate_is_substring() {
        let allowed = vec!["diamond".to_string(), "NETHERITE".to_string()];
        assert!(check_kind(&"DIAMOND_SWORD".into(), &allowed).is_ok());
        assert!(check_kind(&"IRON_SWORD".into(), &allowed).is_err());
        assert!(check_kind(&"IRON_SWORD".into(), &[]).is_ok());
    }

    #[test]
    fn test_ingredient_gate_sums_stacks() {
        let mut required = BTreeMap::new();
        required.insert(ItemKind::new("NETHER_STAR"), 2);
        let aux = vec![
            ItemStack::new("NETHER_STAR"),
            ItemStack::new("DIRT").with_amount(5),
            ItemStack::new("NETHER_STAR"),
        ];
        assert!(check_ingredients(&aux, &required).is_ok());
        assert_eq!(
            check_ingredients(&aux[..2], &required),
            Err(Rejection::MissingIngredient {
                kind: ItemKind::new("NETHER_STAR"),
                required: 2,
                found: 1
            })
        );
    }
}
