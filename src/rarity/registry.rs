//! Tier registry
//!
//! [`TierTable`] is an immutable, validated view of every tier. The
//! [`TierRegistry`] holds the live table behind a pointer that reloads swap in
//! one step, so a reader holding a snapshot never sees a half-built table.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::ConfigError;
use super::abilities::AbilityTable;
use super::chain::resolve_chain;
use super::tier::{RarityTier, TierId};

/// Validated, read-only set of tiers
#[derive(Debug, Clone, Default)]
pub struct TierTable {
    by_id: HashMap<TierId, Arc<RarityTier>>,
    /// Rarest first
    ascending: Vec<Arc<RarityTier>>,
    /// Base tier first
    chain: Vec<Arc<RarityTier>>,
    previous: HashMap<TierId, TierId>,
    abilities: AbilityTable,
    max_effect_cooldown_ms: u64,
}

impl TierTable {
    /// A table with no tiers; every lookup misses
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validate the definitions and build the lookup structures
    pub fn build(tiers: Vec<RarityTier>) -> Result<Self, ConfigError> {
        let chain_ids = resolve_chain(&tiers)?;

        let by_id: HashMap<TierId, Arc<RarityTier>> = tiers
            .into_iter()
            .map(|tier| (tier.id.clone(), Arc::new(tier)))
            .collect();

        let chain: Vec<Arc<RarityTier>> = chain_ids
            .iter()
            .filter_map(|id| by_id.get(id).cloned())
            .collect();

        let mut previous = HashMap::new();
        for pair in chain.windows(2) {
            previous.insert(pair[1].id.clone(), pair[0].id.clone());
        }

        let mut ascending = chain.clone();
        ascending.sort_by(|a, b| {
            a.craft_chance
                .total_cmp(&b.craft_chance)
                .then(a.tier_index.cmp(&b.tier_index))
        });

        let mut abilities = AbilityTable::default();
        for tier in &chain {
            for (family, ability) in tier.special.entries() {
                abilities.insert(tier.tier_index, family, ability);
            }
        }

        let max_effect_cooldown_ms = chain.iter().map(|t| t.effect_cooldown_ms).max().unwrap_or(0);

        Ok(Self {
            by_id,
            ascending,
            chain,
            previous,
            abilities,
            max_effect_cooldown_ms,
        })
    }

    pub fn by_id(&self, id: &str) -> Option<&Arc<RarityTier>> {
        self.by_id.get(id)
    }

    /// Resolve an item tag; absent or stale tags mean "no rarity"
    pub fn resolve(&self, tag: Option<&TierId>) -> Option<&Arc<RarityTier>> {
        tag.and_then(|id| self.by_id.get(id))
    }

    /// Tiers ordered by craft chance, rarest first, ties by tier index
    pub fn ascending_by_rarity(&self) -> &[Arc<RarityTier>] {
        &self.ascending
    }

    /// Tiers in upgrade order, base first
    pub fn chain(&self) -> &[Arc<RarityTier>] {
        &self.chain
    }

    pub fn chain_next(&self, id: &str) -> Option<&Arc<RarityTier>> {
        self.by_id
            .get(id)
            .and_then(|tier| tier.upgrade_target.as_ref())
            .and_then(|target| self.by_id.get(target))
    }

    pub fn chain_previous(&self, id: &str) -> Option<&Arc<RarityTier>> {
        self.previous.get(id).and_then(|prev| self.by_id.get(prev))
    }

    /// Zero-based position of a tier along the chain
    pub fn rank(&self, id: &str) -> Option<usize> {
        self.chain.iter().position(|t| t.id.as_str() == id)
    }

    pub fn abilities(&self) -> &AbilityTable {
        &self.abilities
    }

    pub fn max_effect_cooldown_ms(&self) -> u64 {
        self.max_effect_cooldown_ms
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

/// Live, reloadable tier table
#[derive(Debug, Default)]
pub struct TierRegistry {
    current: RwLock<Arc<TierTable>>,
}

impl TierRegistry {
    pub fn new(tiers: Vec<RarityTier>) -> Result<Self, ConfigError> {
        Ok(Self::from_table(TierTable::build(tiers)?))
    }

    pub fn from_table(table: TierTable) -> Self {
        Self {
            current: RwLock::new(Arc::new(table)),
        }
    }

    /// The table as of now; unaffected by later reloads
    pub fn snapshot(&self) -> Arc<TierTable> {
        Arc::clone(&*self.current.read())
    }

    /// Replace the whole table
    ///
    /// On error the previous table stays live.
    pub fn reload(&self, tiers: Vec<RarityTier>) -> Result<Arc<TierTable>, ConfigError> {
        match TierTable::build(tiers) {
            Ok(table) => {
                let table = Arc::new(table);
                *self.current.write() = Arc::clone(&table);
                log::info!("Loaded {} rarity tiers", table.len());
                Ok(table)
            }
            Err(e) => {
                log::warn!("Rejected tier reload, keeping previous table: {}", e);
                Err(e)
            }
        }
    }
}
