//! Config validation
//!
//! Errors make a config unusable and block a reload. Warnings flag values
//! that work but are probably mistakes.

use std::collections::HashSet;

use crate::error::{ConfigError, ValidationReport};
use crate::combat::status::MAX_EFFECT_DURATION_SECS;
use crate::rarity::chain::{check_at_most, check_percent, resolve_chain, MAX_COOLDOWN_MS};
use crate::rarity::{RarityTier, TierId};
use super::settings::RarityConfig;

/// Recommended bonus ranges; values outside only warn
const ATTRIBUTE_RANGES: [(&str, f64); 5] = [
    ("damage", 100.0),
    ("armor", 100.0),
    ("toughness", 100.0),
    ("health", 100.0),
    ("luck", 100.0),
];

fn check_non_negative(context: &str, field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NegativeValue {
            context: context.to_string(),
            field,
            value,
        })
    }
}

fn push_err(report: &mut ValidationReport, result: Result<(), ConfigError>) {
    if let Err(e) = result {
        report.errors.push(e);
    }
}

fn bonus_value(tier: &RarityTier, name: &str) -> f64 {
    match name {
        "damage" => tier.bonuses.damage,
        "armor" => tier.bonuses.armor,
        "toughness" => tier.bonuses.toughness,
        "health" => tier.bonuses.health,
        _ => tier.bonuses.luck,
    }
}

fn check_tier_warnings(report: &mut ValidationReport, tier: &RarityTier) {
    for (name, max) in ATTRIBUTE_RANGES {
        let value = bonus_value(tier, name);
        if !(0.0..=max).contains(&value) {
            report.warn(format!(
                "tier `{}`: {} bonus {} is outside the recommended 0..{}",
                tier.id, name, value, max
            ));
        }
    }
    if !(0.0..=1.0).contains(&tier.bonuses.speed) {
        report.warn(format!(
            "tier `{}`: speed bonus {} is outside the recommended 0..1",
            tier.id, tier.bonuses.speed
        ));
    }
}

fn check_abilities(report: &mut ValidationReport, tier: &RarityTier) {
    let context = format!("tier `{}`", tier.id);
    let special = &tier.special;
    if let Some(sword) = special.sword {
        push_err(report, check_percent(&context, "sword.crit_chance", sword.crit_chance));
    }
    if let Some(bow) = special.bow {
        push_err(report, check_non_negative(&context, "bow.damage_multiplier", bow.damage_multiplier));
        push_err(report, check_non_negative(&context, "bow.velocity_multiplier", bow.velocity_multiplier));
    }
    if let Some(vortex) = special.trident.as_ref().and_then(|t| t.vortex) {
        push_err(report, check_non_negative(&context, "trident.vortex.radius", vortex.radius));
    }
    if let Some(boots) = &special.boots {
        if let Some(trail) = boots.fire_trail {
            push_err(report, check_non_negative(&context, "boots.fire_trail.radius", trail.radius));
        }
        if let Some(teleport) = boots.teleport {
            push_err(report, check_non_negative(&context, "boots.teleport.distance", teleport.distance));
        }
    }
}

fn unknown_tier(report: &mut ValidationReport, known: &HashSet<&TierId>, context: &str, tier: &TierId) {
    if !known.contains(tier) {
        let reference = ConfigError::UnknownTierReference {
            context: context.to_string(),
            tier: tier.to_string(),
        };
        report.warn(reference.to_string());
    }
}

/// Check a whole config
///
/// Chain problems come first in `errors`, so [`ValidationReport::into_result`]
/// reports the most fundamental issue.
pub fn validate(config: &RarityConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    let chain = match resolve_chain(&config.tiers) {
        Ok(chain) => Some(chain),
        Err(e) => {
            report.errors.push(e);
            None
        }
    };

    let known: HashSet<&TierId> = config.tiers.iter().map(|t| &t.id).collect();

    for tier in &config.tiers {
        check_tier_warnings(&mut report, tier);
        check_abilities(&mut report, tier);
    }

    let craft_total: f64 = config.tiers.iter().map(|t| t.craft_chance).sum();
    if craft_total > 100.0 {
        report.warn(format!(
            "craft chances sum to {:.2}%; rarer tiers shadow the rest",
            craft_total
        ));
    }

    if let Some(chain) = &chain {
        let indexes: Vec<u32> = chain
            .iter()
            .filter_map(|id| config.tiers.iter().find(|t| &t.id == id))
            .map(|t| t.tier_index)
            .collect();
        if indexes.windows(2).any(|w| w[1] <= w[0]) {
            report.warn("tier indexes do not increase along the upgrade chain");
        }
    }

    // Upgrades
    let upgrades = &config.upgrades;
    push_err(
        &mut report,
        check_percent("upgrades", "default_success_chance", upgrades.default_success_chance),
    );
    for (tier, chance) in &upgrades.success_chances {
        push_err(
            &mut report,
            check_percent(&format!("upgrades.success_chances[{}]", tier), "chance", *chance),
        );
        unknown_tier(&mut report, &known, "upgrades.success_chances", tier);
    }
    push_err(
        &mut report,
        check_percent(
            "upgrades.requirements",
            "min_durability_percent",
            upgrades.requirements.min_durability_percent,
        ),
    );
    for tier in upgrades.requirements.min_enchantments.keys() {
        unknown_tier(&mut report, &known, "upgrades.requirements.min_enchantments", tier);
    }
    for tier in upgrades.requirements.allowed_kinds.keys() {
        unknown_tier(&mut report, &known, "upgrades.requirements.allowed_kinds", tier);
    }
    let failure = &upgrades.failure;
    push_err(
        &mut report,
        check_percent("upgrades.failure", "critical_failure_chance", failure.critical_failure_chance),
    );
    push_err(
        &mut report,
        check_percent("upgrades.failure", "downgrade_chance", failure.downgrade_chance),
    );
    for tier in upgrades.ingredients.requirements.keys() {
        unknown_tier(&mut report, &known, "upgrades.ingredients", tier);
    }

    // Abilities
    let abilities = &config.abilities;
    push_err(
        &mut report,
        check_non_negative("abilities", "crit_multiplier", abilities.crit_multiplier),
    );
    push_err(
        &mut report,
        check_non_negative("abilities", "explosive_arrow_power", abilities.explosive_arrow_power),
    );
    push_err(
        &mut report,
        check_at_most("abilities", "ability_cooldown_ms", abilities.ability_cooldown_ms, MAX_COOLDOWN_MS),
    );
    push_err(
        &mut report,
        check_at_most("abilities", "teleport_cooldown_ms", abilities.teleport_cooldown_ms, MAX_COOLDOWN_MS),
    );
    for secs in &abilities.effect_duration_secs {
        push_err(
            &mut report,
            check_at_most("abilities", "effect_duration_secs", *secs, MAX_EFFECT_DURATION_SECS),
        );
    }
    if !(1.0..=5.0).contains(&abilities.crit_multiplier) {
        report.warn(format!(
            "crit multiplier {} is outside the recommended 1..5",
            abilities.crit_multiplier
        ));
    }
    if abilities.teleport_cooldown_ms < 1000 {
        report.warn(format!(
            "teleport cooldown of {} ms is under one second",
            abilities.teleport_cooldown_ms
        ));
    }
    if abilities.effect_duration_secs.is_empty() {
        report.warn("effect_duration_secs is empty; the built-in durations are used");
    }

    // Dungeon loot
    for (i, bracket) in config.dungeon_loot.brackets.iter().enumerate() {
        let context = format!("dungeon_loot.brackets[{}]", i);
        push_err(&mut report, check_percent(&context, "below", bracket.below));
        for pick in &bracket.picks {
            push_err(&mut report, check_percent(&context, "chance", pick.chance));
            unknown_tier(&mut report, &known, &context, &pick.tier);
        }
    }

    for warning in &report.warnings {
        log::debug!("config warning: {}", warning);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rarity::AttributeSet;

    #[test]
    fn test_defaults_are_clean() {
        let report = validate(&RarityConfig::default());
        assert!(report.is_valid(), "{:?}", report.errors);
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    }

    #[test]
    fn test_chain_error_reported_first() {
        let mut config = RarityConfig::default();
        config.tiers[7].upgrade_target = Some(TierId::from("common"));
        config.upgrades.failure.downgrade_chance = 140.0;
        let report = validate(&config);
        assert_eq!(report.errors.len(), 2);
        assert!(matches!(report.into_result(), Err(ConfigError::ChainCycle(_))));
    }

    #[test]
    fn test_out_of_range_percent() {
        let mut config = RarityConfig::default();
        config.upgrades.success_chances.insert(TierId::from("rare"), -5.0);
        let report = validate(&config);
        assert!(matches!(
            report.errors.as_slice(),
            [ConfigError::PercentOutOfRange { field: "chance", .. }]
        ));
    }

    #[test]
    fn test_unknown_references_only_warn() {
        let mut config = RarityConfig::default();
        config.upgrades.requirements.min_enchantments.insert(TierId::from("ancient"), 3);
        let report = validate(&config);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("ancient"));
    }

    #[test]
    fn test_range_warnings() {
        let mut config = RarityConfig::default();
        config.tiers[0].bonuses = AttributeSet {
            speed: 2.0,
            ..Default::default()
        };
        config.tiers[1].craft_chance = 90.0;
        config.abilities.crit_multiplier = 8.0;
        config.abilities.teleport_cooldown_ms = 200;
        let report = validate(&config);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 4);
    }

    #[test]
    fn test_oversized_timings_are_errors() {
        let mut config = RarityConfig::default();
        config.tiers[2].effect_cooldown_ms = u64::MAX / 4;
        assert!(matches!(
            validate(&config).into_result(),
            Err(ConfigError::TooLarge { field: "effect_cooldown_ms", .. })
        ));

        let mut config = RarityConfig::default();
        config.abilities.effect_duration_secs = vec![u64::MAX / 10; 8];
        config.abilities.teleport_cooldown_ms = u64::MAX;
        let report = validate(&config);
        assert_eq!(report.errors.len(), 9);
        assert!(matches!(
            report.errors[0],
            ConfigError::TooLarge { field: "teleport_cooldown_ms", .. }
        ));
    }

    #[test]
    fn test_non_increasing_indexes_warn() {
        let mut config = RarityConfig::default();
        config.tiers[3].tier_index = 1;
        let report = validate(&config);
        assert!(report
            .warnings
            .iter()
            .any(|w| w.contains("tier indexes")));
    }
}
