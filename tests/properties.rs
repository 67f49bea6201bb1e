//! Property-based tests using proptest
//!
//! Invariants that must hold for all inputs:
//! - Selection: a roll lands on the rarest tier whose chance covers it
//! - Compositor: applying a tier is idempotent and re-tagging leaves no residue
//! - Chain: any accepted config has a terminating upgrade walk
//! - Upgrades: rejected attempts never roll; critical failure is decided by rolls alone
//! - Cooldowns: proc fires are spaced by the cooldown; sweeps keep recent actors

use std::sync::Arc;

use proptest::prelude::*;

use rareforge::combat::{ActorId, CooldownKind, CooldownStore, ProcEffectGate};
use rareforge::data::{default_tiers, UpgradeSettings};
use rareforge::items::{pick_by_roll, AttributeCompositor, ItemCatalog, ItemStack, Rejection, UpgradeOutcome, UpgradeStateMachine};
use rareforge::{RarityTier, ScriptedRolls, TierTable};

const KINDS: [&str; 8] = [
    "IRON_SWORD",
    "DIAMOND_AXE",
    "NETHERITE_CHESTPLATE",
    "GOLDEN_BOOTS",
    "TRIDENT",
    "BOW",
    "STONE_SHOVEL",
    "STICK",
];

const TIER_IDS: [&str; 8] = [
    "common",
    "uncommon",
    "rare",
    "epic",
    "legendary",
    "mythic",
    "divine",
    "celestial",
];

fn default_table() -> TierTable {
    TierTable::build(default_tiers()).unwrap()
}

fn compositor() -> AttributeCompositor {
    AttributeCompositor::new(Arc::new(ItemCatalog::vanilla(false)))
}

// ============================================================
// Selection
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_roll_picks_rarest_covering_tier(roll in 0.0f64..100.0) {
        let table = default_table();
        let picked = pick_by_roll(&table, roll);
        let ascending = table.ascending_by_rarity();

        match picked {
            Some(tier) => {
                prop_assert!(roll <= tier.craft_chance);
                // Every tier tested before the winner missed the roll
                for earlier in ascending.iter().take_while(|t| t.id != tier.id) {
                    prop_assert!(roll > earlier.craft_chance, "{} should have won {}", earlier.id, roll);
                }
            }
            None => {
                for tier in ascending {
                    prop_assert!(roll > tier.craft_chance);
                }
            }
        }
    }

    #[test]
    fn prop_custom_chances_still_pick_first_match(
        chances in prop::collection::vec(0.0f64..100.0, 2..6),
        roll in 0.0f64..100.0,
    ) {
        let n = chances.len();
        let tiers: Vec<RarityTier> = chances
            .iter()
            .enumerate()
            .map(|(i, chance)| {
                let tier = RarityTier::new(format!("t{i}"), format!("Tier {i}"), i as u32).with_craft_chance(*chance);
                if i + 1 < n {
                    tier.with_upgrade_target(format!("t{}", i + 1))
                } else {
                    tier
                }
            })
            .collect();
        let table = TierTable::build(tiers).unwrap();

        // The winner has the smallest chance among the tiers that cover the roll
        let smallest_cover = chances
            .iter()
            .copied()
            .filter(|chance| roll <= *chance)
            .min_by(|a, b| a.total_cmp(b));
        prop_assert_eq!(pick_by_roll(&table, roll).map(|t| t.craft_chance), smallest_cover);
    }
}

// ============================================================
// Compositor
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_apply_is_idempotent(kind in 0usize..KINDS.len(), tier in 0usize..TIER_IDS.len()) {
        let table = default_table();
        let compositor = compositor();
        let tier = table.by_id(TIER_IDS[tier]).unwrap();

        let once = compositor.apply(ItemStack::new(KINDS[kind]), tier);
        let twice = compositor.apply(once.clone(), tier);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_retag_matches_fresh_apply(
        kind in 0usize..KINDS.len(),
        first in 0usize..TIER_IDS.len(),
        second in 0usize..TIER_IDS.len(),
    ) {
        let table = default_table();
        let compositor = compositor();
        let first = table.by_id(TIER_IDS[first]).unwrap();
        let second = table.by_id(TIER_IDS[second]).unwrap();

        let retagged = compositor.apply(compositor.apply(ItemStack::new(KINDS[kind]), first), second);
        let fresh = compositor.apply(ItemStack::new(KINDS[kind]), second);
        prop_assert_eq!(retagged, fresh);
    }
}

// ============================================================
// Upgrade chain
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn prop_accepted_chains_terminate(targets in prop::collection::vec(prop::option::of(0usize..6), 1..6)) {
        let n = targets.len();
        let tiers: Vec<RarityTier> = targets
            .iter()
            .enumerate()
            .map(|(i, target)| {
                let tier = RarityTier::new(format!("t{i}"), format!("Tier {i}"), i as u32);
                match target {
                    Some(t) => tier.with_upgrade_target(format!("t{}", t % n)),
                    None => tier,
                }
            })
            .collect();

        // Rejected configs are fine; accepted ones must walk to a single top
        if let Ok(table) = TierTable::build(tiers) {
            prop_assert_eq!(table.chain().len(), n);
            for tier in table.chain() {
                let mut cursor = tier.id.clone();
                let mut steps = 0;
                while let Some(next) = table.chain_next(cursor.as_str()) {
                    cursor = next.id.clone();
                    steps += 1;
                    prop_assert!(steps < n, "chain from {} did not terminate", tier.id);
                }
                prop_assert!(table.by_id(cursor.as_str()).unwrap().is_maximal());
            }
        }
    }
}

// ============================================================
// Upgrade gates and failure
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_worn_pair_never_rolls(damage in 51u32..=250, worn_first in any::<bool>()) {
        let table = default_table();
        let compositor = compositor();
        let settings = UpgradeSettings::default();
        let machine = UpgradeStateMachine::new(&table, &compositor, &settings);
        let rare = table.by_id("rare").unwrap();

        let fresh = compositor.apply(ItemStack::new("TRIDENT"), rare);
        let worn = compositor.apply(ItemStack::new("TRIDENT").with_damage(damage), rare);
        let items = if worn_first { vec![worn, fresh] } else { vec![fresh, worn] };

        let mut rolls = ScriptedRolls::new([0.0, 0.0, 0.0]);
        let outcome = machine.combine(items.clone(), &mut rolls);

        prop_assert_eq!(rolls.drawn(), 0);
        let is_too_worn = matches!(
            &outcome,
            UpgradeOutcome::Rejected { reason: Rejection::TooWorn { .. }, .. }
        );
        prop_assert!(is_too_worn);
        prop_assert_eq!(outcome.into_items(), items);
    }

    #[test]
    fn prop_certain_critical_failure(
        chance in 0.0f64..50.0,
        success_roll in 50.0f64..100.0,
        crit_roll in 0.0f64..100.0,
    ) {
        let table = default_table();
        let compositor = compositor();
        let mut settings = UpgradeSettings::default();
        settings.default_success_chance = chance;
        settings.failure.critical_failure_chance = 100.0;
        let machine = UpgradeStateMachine::new(&table, &compositor, &settings);
        let epic = table.by_id("epic").unwrap();

        let pair = vec![
            compositor.apply(ItemStack::new("IRON_SWORD"), epic),
            compositor.apply(ItemStack::new("IRON_SWORD"), epic),
        ];
        let mut rolls = ScriptedRolls::new([success_roll, crit_roll]);
        let outcome = machine.combine(pair, &mut rolls);

        let is_critical = matches!(outcome, UpgradeOutcome::CriticalFailure { .. });
        prop_assert!(is_critical);
        prop_assert_eq!(rolls.drawn(), 2);
    }
}

// ============================================================
// Cooldowns
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_proc_fires_respect_cooldown(mut hits in prop::collection::vec(0u64..60_000, 1..40)) {
        hits.sort_unstable();
        let table = default_table();
        let rare = table.by_id("rare").unwrap();
        let gate = ProcEffectGate::new(Arc::new(CooldownStore::new()));
        let actor = ActorId::new();
        let mut rolls = ScriptedRolls::new([]).with_fallback(0.0);

        let fired: Vec<u64> = hits
            .iter()
            .copied()
            .filter(|now| gate.try_trigger(actor, rare, *now, &mut rolls).is_some())
            .collect();

        // The first hit always fires with a zero roll
        prop_assert_eq!(fired.first().copied(), hits.first().copied());
        for pair in fired.windows(2) {
            prop_assert!(pair[1] - pair[0] >= rare.effect_cooldown_ms);
        }
    }

    #[test]
    fn prop_sweep_keeps_recent_actors(
        stamps in prop::collection::vec(0u64..100_000, 0..30),
        horizon in 1_000u64..50_000,
    ) {
        let store = CooldownStore::new();
        let now = 100_000;
        for at in &stamps {
            store.stamp(ActorId::new(), CooldownKind::Ability, *at);
        }

        let expected_kept = stamps.iter().filter(|at| now - **at <= horizon).count();
        let removed = store.sweep(now, horizon);

        prop_assert_eq!(store.len(), expected_kept);
        prop_assert_eq!(removed, stamps.len() - expected_kept);
    }
}
