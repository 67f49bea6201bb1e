//! Host-facing engine
//!
//! [`RarityEngine`] owns the live tier registry, the live settings and the
//! shared cooldown store. It has one method per host event and the operations
//! behind the admin commands. Tiers and settings live in one [`EngineState`]
//! snapshot taken at entry, so a reload in between never shows a handler half
//! of each config.

pub mod events;

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::combat::procs::sweep_horizon;
use crate::combat::{
    ActorId, ArrowTags, CooldownStore, Millis, ProcEffectGate, ProjectileImpact, WeaponAbilities,
};
use crate::data::loader::load_config;
use crate::data::settings::RarityConfig;
use crate::data::validate::validate;
use crate::error::{ConfigError, LoadError, ValidationReport};
use crate::items::equipment::{movement_perks, passive_grants, teleport_ability, MovementPerk, PassiveGrant, WornArmor};
use crate::items::loot::{DungeonLootRoller, WeightedTierSelector};
use crate::items::upgrade::{Preparation, UpgradeOutcome, UpgradeStateMachine};
use crate::items::{Attribute, AttributeCompositor, ItemCatalog, ItemKind, ItemStack};
use crate::rarity::{TierRegistry, TierTable};
use crate::rolls::RollSource;

pub use events::{CombinePreview, HitOutcome, ItemInspection, TeleportGrant, UpgradeNotice};

/// Tier table, settings and the compositor built from them, swapped as one
#[derive(Debug, Clone)]
pub struct EngineState {
    pub tiers: Arc<TierTable>,
    pub config: RarityConfig,
    pub compositor: AttributeCompositor,
}

impl EngineState {
    fn build(tiers: Arc<TierTable>, config: RarityConfig, catalog: &ItemCatalog) -> Self {
        let catalog = Arc::new(catalog.with_include_hoes(config.settings.include_hoes));
        Self {
            tiers,
            config,
            compositor: AttributeCompositor::new(catalog),
        }
    }

    fn catalog(&self) -> &ItemCatalog {
        self.compositor.catalog()
    }
}

/// The rarity system as a host sees it
#[derive(Debug)]
pub struct RarityEngine {
    registry: TierRegistry,
    state: RwLock<Arc<EngineState>>,
    base_catalog: Arc<ItemCatalog>,
    cooldowns: Arc<CooldownStore>,
}

impl RarityEngine {
    /// Engine over the vanilla item catalog
    pub fn new(config: RarityConfig) -> Result<Self, ConfigError> {
        Self::with_catalog(config, ItemCatalog::vanilla(false))
    }

    pub fn with_catalog(config: RarityConfig, catalog: ItemCatalog) -> Result<Self, ConfigError> {
        for warning in validate(&config).into_result()? {
            log::warn!("{}", warning);
        }
        let registry = TierRegistry::new(config.tiers.clone())?;
        let state = EngineState::build(registry.snapshot(), config, &catalog);
        Ok(Self {
            registry,
            state: RwLock::new(Arc::new(state)),
            base_catalog: Arc::new(catalog),
            cooldowns: Arc::new(CooldownStore::new()),
        })
    }

    /// Current tier table
    pub fn tiers(&self) -> Arc<TierTable> {
        Arc::clone(&self.state().tiers)
    }

    /// Current settings
    pub fn state(&self) -> Arc<EngineState> {
        Arc::clone(&*self.state.read())
    }

    pub fn cooldowns(&self) -> &Arc<CooldownStore> {
        &self.cooldowns
    }

    fn trace(&self, state: &EngineState, message: std::fmt::Arguments<'_>) {
        if state.config.settings.debug {
            log::info!("{}", message);
        } else {
            log::debug!("{}", message);
        }
    }

    fn proc_gate(&self, state: &EngineState) -> ProcEffectGate {
        ProcEffectGate::new(Arc::clone(&self.cooldowns)).with_durations(&state.config.abilities.effect_duration_secs)
    }

    // ---- Host events ----

    /// Possibly give a freshly crafted item a rarity
    pub fn on_item_crafted(&self, item: ItemStack, rolls: &mut impl RollSource) -> ItemStack {
        let state = self.state();
        let table = Arc::clone(&state.tiers);
        let eligible = state.config.settings.enabled
            && state.catalog().is_weapon_or_armor(&item.kind)
            && !item.has_tag()
            && !state.config.compatibility.ignores(&item);

        match WeightedTierSelector::new(&table).select(eligible, rolls) {
            Some(tier) => {
                self.trace(&state, format_args!("Crafted {} as {}", item.kind, tier.id));
                state.compositor.apply(item, tier)
            }
            None => item,
        }
    }

    /// Roll rarity for structure loot generated at height `y`
    pub fn on_loot_generated(&self, items: Vec<ItemStack>, y: Option<i32>, rolls: &mut impl RollSource) -> Vec<ItemStack> {
        let state = self.state();
        if !state.config.settings.enabled {
            return items;
        }
        let table = Arc::clone(&state.tiers);
        let roller = DungeonLootRoller::new(&table, &state.config.dungeon_loot);
        if !roller.applies_at(y) {
            return items;
        }
        items
            .into_iter()
            .map(|item| {
                if item.has_tag() || !state.catalog().is_weapon_or_armor(&item.kind) {
                    return item;
                }
                match roller.roll(y, rolls) {
                    Some(tier) => {
                        self.trace(&state, format_args!("Loot {} rolled {}", item.kind, tier.id));
                        state.compositor.apply(item, tier)
                    }
                    None => item,
                }
            })
            .collect()
    }

    /// Check a crafting grid without rolling or consuming anything
    pub fn preview_combine(&self, items: Vec<ItemStack>) -> (CombinePreview, Vec<ItemStack>) {
        let state = self.state();
        let table = Arc::clone(&state.tiers);
        let upgrades = &state.config.upgrades;
        let machine = UpgradeStateMachine::new(&table, &state.compositor, upgrades);
        match machine.prepare(items) {
            Preparation::Idle(items) => (CombinePreview::Idle, items),
            Preparation::Rejected { reason, items } => (CombinePreview::Rejected(reason), items),
            Preparation::Ready(prepared) => {
                let attempt = prepared.attempt();
                let preview = CombinePreview::Ready {
                    from: attempt.current.id.clone(),
                    to: attempt.target.id.clone(),
                    success_chance: upgrades.success_chance(&attempt.current.id),
                };
                (preview, prepared.cancel())
            }
        }
    }

    /// Run a combination to its terminal outcome
    pub fn on_combine_attempt(&self, items: Vec<ItemStack>, rolls: &mut impl RollSource) -> UpgradeOutcome {
        let state = self.state();
        let table = Arc::clone(&state.tiers);
        let machine = UpgradeStateMachine::new(&table, &state.compositor, &state.config.upgrades);
        let outcome = machine.combine(items, rolls);
        if outcome.was_rolled() {
            log::info!("Upgrade outcome: {:?}", UpgradeNotice::from(&outcome));
        }
        outcome
    }

    /// Melee hit by `attacker` wielding `weapon`
    pub fn on_entity_hit(
        &self,
        attacker: ActorId,
        weapon: &ItemStack,
        damage: f64,
        now: Millis,
        rolls: &mut impl RollSource,
    ) -> HitOutcome {
        let state = self.state();
        if !state.config.settings.enabled {
            return HitOutcome::plain(damage);
        }
        let table = Arc::clone(&state.tiers);
        let Some(tier) = table.resolve(weapon.rarity_tag.as_ref()) else {
            return HitOutcome::plain(damage);
        };

        let proc_fired = self.proc_gate(&state).try_trigger(attacker, tier, now, rolls);

        let abilities = &state.config.abilities;
        let family = state.catalog().family(&weapon.kind);
        let ability = WeaponAbilities::new(
            Arc::clone(&self.cooldowns),
            abilities.ability_cooldown_ms,
            abilities.crit_multiplier,
        )
        .on_hit(attacker, family, tier, table.abilities(), now, rolls);

        let damage = ability.as_ref().map_or(damage, |a| a.apply_damage(damage));
        HitOutcome {
            damage,
            proc_fired,
            ability,
        }
    }

    /// Tags to store on a projectile shot from `weapon`
    pub fn on_projectile_launched(&self, weapon: &ItemStack) -> Option<ArrowTags> {
        let state = self.state();
        if !state.config.settings.enabled {
            return None;
        }
        let table = Arc::clone(&state.tiers);
        let tier = table.resolve(weapon.rarity_tag.as_ref())?;
        ArrowTags::for_launch(state.catalog().family(&weapon.kind), tier, table.abilities())
    }

    /// Damage dealt by a projectile carrying `tags`
    pub fn on_projectile_damage(&self, tags: Option<&ArrowTags>, damage: f64) -> f64 {
        match tags {
            Some(tags) => {
                let scaled = tags.scale_damage(damage);
                self.trace(&self.state(), format_args!("Arrow damage {:.1} -> {:.1}", damage, scaled));
                scaled
            }
            None => damage,
        }
    }

    /// Impacts of a projectile carrying `tags` landing
    pub fn on_projectile_hit(&self, tags: Option<&ArrowTags>) -> Vec<ProjectileImpact> {
        let state = self.state();
        tags.map(|t| t.impacts(state.config.abilities.explosive_arrow_power))
            .unwrap_or_default()
    }

    /// Boots perks for a wearer who moved
    pub fn on_actor_moved(&self, boots: Option<&ItemStack>) -> Vec<MovementPerk> {
        let state = self.state();
        match boots {
            Some(boots) if state.config.settings.enabled => movement_perks(&state.tiers, state.catalog(), boots),
            _ => Vec::new(),
        }
    }

    /// Sneak-interact with boots on; grants a teleport when off cooldown
    ///
    /// The cooldown starts only once the host reports the jump through
    /// [`RarityEngine::confirm_teleport`].
    pub fn on_actor_interacted(
        &self,
        actor: ActorId,
        boots: Option<&ItemStack>,
        sneaking: bool,
        now: Millis,
    ) -> Option<TeleportGrant> {
        let state = self.state();
        if !sneaking || !state.config.settings.enabled {
            return None;
        }
        let ability = teleport_ability(&state.tiers, state.catalog(), boots?)?;
        let cooldown_ms = state.config.abilities.teleport_cooldown_ms;
        let gate = self.proc_gate(&state);
        if !gate.can_teleport(actor, cooldown_ms, now) {
            self.trace(
                &state,
                format_args!(
                    "Teleport for {} on cooldown, {} ms left",
                    actor,
                    gate.teleport_remaining(actor, cooldown_ms, now)
                ),
            );
            return None;
        }
        Some(TeleportGrant {
            distance: ability.distance,
            cooldown_ms,
        })
    }

    /// The host performed a granted teleport
    pub fn confirm_teleport(&self, actor: ActorId, now: Millis) {
        self.proc_gate(&self.state()).confirm_teleport(actor, now);
    }

    /// Armor passives for one wearer, called every `passive_refresh_ms`
    pub fn on_periodic_tick(&self, worn: &WornArmor<'_>) -> PassiveGrant {
        let state = self.state();
        if !state.config.settings.enabled {
            return PassiveGrant::default();
        }
        passive_grants(
            &state.tiers,
            state.catalog(),
            worn,
            state.config.abilities.passive_duration_ms,
        )
    }

    /// Forget actors idle for longer than the sweep horizon
    pub fn sweep(&self, now: Millis) -> usize {
        let state = self.state();
        let abilities = &state.config.abilities;
        let horizon = sweep_horizon(
            &state.tiers,
            abilities.ability_cooldown_ms,
            abilities.teleport_cooldown_ms,
        );
        self.proc_gate(&state).sweep(now, horizon)
    }

    // ---- Commands ----

    /// `count` fresh items of `kind` at `tier_id`; `None` for an unknown tier
    pub fn give(&self, kind: &str, tier_id: &str, count: u32) -> Option<Vec<ItemStack>> {
        let state = self.state();
        let table = Arc::clone(&state.tiers);
        let tier = table.by_id(tier_id)?;
        let kind = ItemKind::new(kind);
        Some(
            (0..count)
                .map(|_| state.compositor.apply(ItemStack::new(kind.clone()), tier))
                .collect(),
        )
    }

    /// Retag an item directly, bypassing upgrade rules
    pub fn force_tier(&self, item: &ItemStack, tier_id: &str) -> Option<ItemStack> {
        let state = self.state();
        let tier = state.tiers.by_id(tier_id)?;
        Some(state.compositor.apply(item.clone(), tier))
    }

    pub fn inspect(&self, item: &ItemStack) -> ItemInspection {
        let state = self.state();
        let table = Arc::clone(&state.tiers);
        let totals: Vec<(Attribute, f64)> = state
            .compositor
            .applicable(item)
            .into_iter()
            .map(|a| (a, state.compositor.total(item, a)))
            .collect();

        let Some(tier) = table.resolve(item.rarity_tag.as_ref()) else {
            return ItemInspection::plain(item, totals);
        };
        let family = state.catalog().family(&item.kind);
        ItemInspection {
            kind: item.kind.clone(),
            tier: Some(tier.id.clone()),
            stale_tag: None,
            display_name: Some(tier.display_name.clone()),
            stars: tier.stars(),
            totals,
            next: table.chain_next(tier.id.as_str()).map(|t| t.id.clone()),
            previous: table.chain_previous(tier.id.as_str()).map(|t| t.id.clone()),
            abilities: table
                .abilities()
                .get(tier.tier_index, family)
                .map(|a| vec![a.label().to_string()])
                .unwrap_or_default(),
        }
    }

    /// Swap in a new config; on error the previous one stays live
    ///
    /// The state lock is held across the registry swap, so no handler can
    /// snapshot the new tiers next to the old settings.
    pub fn reload(&self, config: RarityConfig) -> Result<Vec<String>, ConfigError> {
        let warnings = validate(&config).into_result().map_err(|e| {
            log::warn!("Rejected config reload, keeping previous config: {}", e);
            e
        })?;
        let mut guard = self.state.write();
        let tiers = self.registry.reload(config.tiers.clone())?;
        *guard = Arc::new(EngineState::build(tiers, config, &self.base_catalog));
        drop(guard);
        for warning in &warnings {
            log::warn!("{}", warning);
        }
        Ok(warnings)
    }

    /// Read a config file and reload from it
    pub fn reload_from(&self, path: &Path) -> Result<Vec<String>, LoadError> {
        let config = load_config(path)?;
        Ok(self.reload(config)?)
    }

    /// Toggle verbose roll logging
    pub fn set_debug(&self, on: bool) {
        let mut guard = self.state.write();
        let mut config = guard.config.clone();
        config.settings.debug = on;
        *guard = Arc::new(EngineState::build(Arc::clone(&guard.tiers), config, &self.base_catalog));
        log::info!("Debug logging {}", if on { "enabled" } else { "disabled" });
    }

    /// Validate the live config
    pub fn validate(&self) -> ValidationReport {
        validate(&self.state().config)
    }
}
