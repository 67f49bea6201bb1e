use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use rareforge::combat::{ActorId, CooldownStore, ProcEffectGate};
use rareforge::data::default_tiers;
use rareforge::items::{pick_by_roll, AttributeCompositor, ItemCatalog, ItemStack, WeightedTierSelector};
use rareforge::{RarityConfig, RarityEngine, TierTable};

fn bench_selection(c: &mut Criterion) {
    let table = TierTable::build(default_tiers()).unwrap();

    c.bench_function("pick_by_roll", |b| {
        b.iter(|| pick_by_roll(&table, black_box(42.5)))
    });

    let selector = WeightedTierSelector::new(&table);
    let mut rng = StdRng::seed_from_u64(42);
    c.bench_function("select_with_rng", |b| {
        b.iter(|| selector.select(black_box(true), &mut rng).map(|t| t.tier_index))
    });
}

fn bench_compositor(c: &mut Criterion) {
    let table = TierTable::build(default_tiers()).unwrap();
    let compositor = AttributeCompositor::new(Arc::new(ItemCatalog::vanilla(false)));
    let mythic = table.by_id("mythic").unwrap();
    let celestial = table.by_id("celestial").unwrap();
    let tagged = compositor.apply(ItemStack::new("NETHERITE_CHESTPLATE"), mythic);

    c.bench_function("apply_fresh", |b| {
        b.iter(|| compositor.apply(black_box(ItemStack::new("DIAMOND_SWORD")), mythic))
    });

    c.bench_function("apply_retag", |b| {
        b.iter(|| compositor.apply(black_box(tagged.clone()), celestial))
    });
}

fn bench_procs(c: &mut Criterion) {
    let table = TierTable::build(default_tiers()).unwrap();
    let divine = table.by_id("divine").unwrap();
    let gate = ProcEffectGate::new(Arc::new(CooldownStore::new()));
    let actors: Vec<ActorId> = (0..256).map(|_| ActorId::new()).collect();
    let mut rng = StdRng::seed_from_u64(7);
    let mut now = 0u64;

    c.bench_function("proc_gate_256_actors", |b| {
        b.iter(|| {
            now += 50;
            for actor in &actors {
                black_box(gate.try_trigger(*actor, divine, now, &mut rng));
            }
        })
    });
}

fn bench_engine_craft(c: &mut Criterion) {
    let engine = RarityEngine::new(RarityConfig::default()).unwrap();
    let mut rng = StdRng::seed_from_u64(1);

    c.bench_function("engine_on_item_crafted", |b| {
        b.iter(|| engine.on_item_crafted(black_box(ItemStack::new("IRON_SWORD")), &mut rng))
    });
}

criterion_group!(
    benches,
    bench_selection,
    bench_compositor,
    bench_procs,
    bench_engine_craft,
);
criterion_main!(benches);
