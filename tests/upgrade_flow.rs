//! End-to-end flows through the engine, the way a host drives it

use rareforge::combat::{ActorId, StatusEffect};
use rareforge::data::loader::to_ron;
use rareforge::data::{LootBracket, LootPick, RarityConfig};
use rareforge::engine::{CombinePreview, UpgradeNotice};
use rareforge::items::{Attribute, ItemKind, ItemStack, PassiveGrant, Rejection, UpgradeOutcome, WornArmor};
use rareforge::{RarityEngine, ScriptedRolls, TierId};

fn engine_with(config: RarityConfig) -> RarityEngine {
    RarityEngine::new(config).unwrap()
}

fn tag_of(item: &ItemStack) -> Option<&str> {
    item.rarity_tag.as_ref().map(|t| t.as_str())
}

#[test]
fn test_craft_then_combine_to_next_tier() {
    let engine = engine_with(RarityConfig::default());

    // 5.0 is past epic's 3% but inside rare's 7%
    let mut rolls = ScriptedRolls::new([5.0, 5.0]);
    let a = engine.on_item_crafted(ItemStack::new("DIAMOND_SWORD"), &mut rolls);
    let b = engine.on_item_crafted(ItemStack::new("DIAMOND_SWORD"), &mut rolls);
    assert_eq!(tag_of(&a), Some("rare"));
    assert_eq!(tag_of(&b), Some("rare"));

    let grid = vec![ItemStack::new("STICK"), a, b];
    let (preview, grid) = engine.preview_combine(grid);
    assert!(matches!(preview, CombinePreview::Ready { .. }));

    let outcome = engine.on_combine_attempt(grid, &mut rolls);
    assert_eq!(
        UpgradeNotice::from(&outcome),
        UpgradeNotice::Success {
            from: TierId::from("rare"),
            to: TierId::from("epic"),
        }
    );
    let UpgradeOutcome::Success { result, leftover, .. } = outcome else {
        panic!("expected success");
    };
    assert_eq!(leftover, vec![ItemStack::new("STICK")]);
    assert_eq!(engine.state().compositor.total(&result, Attribute::AttackDamage), 6.0 + 3.0);

    let report = engine.inspect(&result);
    assert_eq!(report.tier, Some(TierId::from("epic")));
    assert_eq!(report.stars, "✦✦✦✦");
}

#[test]
fn test_failed_combine_downgrades_survivor() {
    let mut config = RarityConfig::default();
    config.upgrades.success_chances.insert(TierId::from("epic"), 50.0);
    let engine = engine_with(config);

    let grid = engine.give("IRON_SWORD", "epic", 2).unwrap();
    // Success misses, no critical failure, downgrade hits
    let mut rolls = ScriptedRolls::new([80.0, 50.0, 10.0]);
    let outcome = engine.on_combine_attempt(grid, &mut rolls);

    assert_eq!(
        UpgradeNotice::from(&outcome),
        UpgradeNotice::Downgraded {
            to: TierId::from("rare")
        }
    );
    let items = outcome.into_items();
    assert_eq!(items.len(), 1);
    assert_eq!(tag_of(&items[0]), Some("rare"));
    assert_eq!(engine.state().compositor.total(&items[0], Attribute::AttackDamage), 5.0 + 2.0);
}

#[test]
fn test_gate_order_reports_first_failure() {
    let mut config = RarityConfig::default();
    config.upgrades.requirements.min_enchantments.insert(TierId::from("legendary"), 2);
    config
        .upgrades
        .requirements
        .allowed_kinds
        .insert(TierId::from("legendary"), vec!["DIAMOND".into(), "NETHERITE".into()]);
    let engine = engine_with(config);

    // Enchantments are checked before the kind
    let grid = engine.give("IRON_SWORD", "epic", 2).unwrap();
    let (preview, grid) = engine.preview_combine(grid);
    assert!(matches!(
        preview,
        CombinePreview::Rejected(Rejection::TooFewEnchantments { required: 2, found: 0 })
    ));

    let enchanted: Vec<ItemStack> = grid
        .into_iter()
        .map(|item| item.with_enchantment("sharpness", 3).with_enchantment("unbreaking", 2))
        .collect();
    let mut rolls = ScriptedRolls::new([]);
    let outcome = engine.on_combine_attempt(enchanted, &mut rolls);
    assert!(matches!(
        outcome,
        UpgradeOutcome::Rejected { reason: Rejection::KindNotAllowed { .. }, .. }
    ));
    assert_eq!(rolls.drawn(), 0);
}

#[test]
fn test_ingredients_taken_from_grid() {
    let mut config = RarityConfig::default();
    config
        .upgrades
        .ingredients
        .requirements
        .entry(TierId::from("epic"))
        .or_default()
        .insert(ItemKind::new("DIAMOND"), 2);
    let engine = engine_with(config);

    let mut grid = engine.give("BOW", "rare", 2).unwrap();
    grid.push(ItemStack::new("DIAMOND").with_amount(3));
    let outcome = engine.on_combine_attempt(grid, &mut ScriptedRolls::new([]));

    let UpgradeOutcome::Success { result, leftover, .. } = outcome else {
        panic!("expected success");
    };
    assert_eq!(tag_of(&result), Some("epic"));
    assert_eq!(leftover, vec![ItemStack::new("DIAMOND").with_amount(1)]);
}

#[test]
fn test_dungeon_loot_depends_on_depth() {
    let engine = engine_with(RarityConfig::default());

    let chest = vec![ItemStack::new("IRON_HELMET"), ItemStack::new("BREAD")];
    // Bracket roll 0.5, then 10.0 takes the first pick
    let mut rolls = ScriptedRolls::new([0.5, 10.0]);
    let looted = engine.on_loot_generated(chest.clone(), Some(10), &mut rolls);
    assert_eq!(tag_of(&looted[0]), Some("mythic"));
    assert!(!looted[1].has_tag());

    let mut rolls = ScriptedRolls::new([0.5, 10.0]);
    let surface = engine.on_loot_generated(chest.clone(), Some(64), &mut rolls);
    assert_eq!(surface, chest);
    assert_eq!(rolls.drawn(), 0);
}

#[test]
fn test_loot_pick_for_missing_tier_stays_plain() {
    let mut config = RarityConfig::default();
    config.dungeon_loot.brackets = vec![LootBracket {
        below: 100.0,
        picks: vec![LootPick::new("ancient", 100.0)],
    }];
    let engine = engine_with(config);
    assert!(engine
        .validate()
        .warnings
        .iter()
        .any(|w| w.contains("ancient")));

    let mut rolls = ScriptedRolls::new([]).with_fallback(1.0);
    let looted = engine.on_loot_generated(vec![ItemStack::new("IRON_SWORD")], None, &mut rolls);
    assert!(!looted[0].has_tag());
}

#[test]
fn test_worn_set_refresh() {
    let engine = engine_with(RarityConfig::default());
    let chest = engine.give("NETHERITE_CHESTPLATE", "celestial", 1).unwrap().remove(0);
    let helmet = engine.give("IRON_HELMET", "epic", 1).unwrap().remove(0);
    // A helmet worn in the leg slot grants nothing
    let misplaced = engine.give("DIAMOND_HELMET", "celestial", 1).unwrap().remove(0);

    let worn = WornArmor {
        head: Some(&helmet),
        chest: Some(&chest),
        legs: Some(&misplaced),
        ..Default::default()
    };
    let grant = engine.on_periodic_tick(&worn);
    let effects: Vec<(StatusEffect, u8)> = grant.effects.iter().map(|e| (e.effect, e.amplifier)).collect();
    assert_eq!(
        effects,
        [
            (StatusEffect::NightVision, 0),
            (StatusEffect::Regeneration, 1),
            (StatusEffect::Resistance, 1),
        ]
    );
    assert!(grant.effects.iter().all(|e| e.duration_ms == 6000));
    assert_eq!(grant.cleanse, [StatusEffect::Blindness]);

    assert_eq!(engine.on_periodic_tick(&WornArmor::default()), PassiveGrant::default());
}

#[test]
fn test_disabled_engine_is_inert() {
    let mut config = RarityConfig::default();
    config.settings.enabled = false;
    let engine = engine_with(config);
    let mut rolls = ScriptedRolls::new([]).with_fallback(0.0);

    let sword = engine.on_item_crafted(ItemStack::new("IRON_SWORD"), &mut rolls);
    assert!(!sword.has_tag());

    let weapon = ItemStack::new("IRON_SWORD").with_tag("celestial");
    let hit = engine.on_entity_hit(ActorId::new(), &weapon, 5.0, 0, &mut rolls);
    assert!(hit.is_plain());
    assert!(engine.on_projectile_launched(&ItemStack::new("BOW").with_tag("celestial")).is_none());
    assert_eq!(rolls.drawn(), 0);
}

#[test]
fn test_reload_from_file() {
    let engine = engine_with(RarityConfig::default());
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rarities.ron");

    let mut config = RarityConfig::default();
    config.settings.include_hoes = true;
    config.abilities.crit_multiplier = 3.0;
    std::fs::write(&path, to_ron(&config).unwrap()).unwrap();

    engine.reload_from(&path).unwrap();
    let state = engine.state();
    assert!(state.config.settings.include_hoes);
    assert_eq!(state.config.abilities.crit_multiplier, 3.0);

    // Hoes now roll on craft
    let mut rolls = ScriptedRolls::new([0.005]);
    let hoe = engine.on_item_crafted(ItemStack::new("DIAMOND_HOE"), &mut rolls);
    assert_eq!(tag_of(&hoe), Some("celestial"));

    std::fs::write(&path, "(tiers: [").unwrap();
    assert!(engine.reload_from(&path).is_err());
    assert_eq!(engine.state().config.abilities.crit_multiplier, 3.0);
}

#[test]
fn test_climb_whole_chain_then_stop() {
    let engine = engine_with(RarityConfig::default());
    let mut rolls = ScriptedRolls::new([]);
    let mut item = engine.give("NETHERITE_SWORD", "common", 1).unwrap().remove(0);

    let mut climbed = vec![tag_of(&item).unwrap_or_default().to_string()];
    loop {
        let outcome = engine.on_combine_attempt(vec![item.clone(), item.clone()], &mut rolls);
        match outcome {
            UpgradeOutcome::Success { result, .. } => {
                climbed.push(tag_of(&result).unwrap_or_default().to_string());
                item = result;
            }
            UpgradeOutcome::Rejected {
                reason: Rejection::AlreadyMaximal { tier },
                items,
            } => {
                assert_eq!(tier.as_str(), "celestial");
                assert_eq!(items, vec![item.clone(), item.clone()]);
                break;
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(climbed.len() <= 8, "chain did not end");
    }

    assert_eq!(
        climbed,
        ["common", "uncommon", "rare", "epic", "legendary", "mythic", "divine", "celestial"]
    );
    assert_eq!(engine.state().compositor.total(&item, Attribute::AttackDamage), 7.0 + 9.0);
    assert_eq!(rolls.drawn(), 0);
}
