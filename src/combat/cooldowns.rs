//! Per-actor cooldown bookkeeping
//!
//! One record per actor, shared by every proc kind. The store sits behind a
//! mutex so hosts that dispatch some events off the main thread stay safe;
//! [`CooldownStore::claim`] checks, gates and stamps under a single lock.

use std::collections::HashMap;
use std::fmt;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Millis;

/// Stable identity of a player or other actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(Uuid);

impl ActorId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Which cooldown a timestamp belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CooldownKind {
    /// On-hit status effects
    HitEffect,
    /// Sword, axe and trident abilities
    Ability,
    Teleport,
}

/// Last trigger times for one actor; `None` means never
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorProcState {
    pub last_ability_trigger_at: Option<Millis>,
    pub last_teleport_at: Option<Millis>,
    pub last_hit_effect_at: Option<Millis>,
}

impl ActorProcState {
    pub fn last(&self, kind: CooldownKind) -> Option<Millis> {
        match kind {
            CooldownKind::HitEffect => self.last_hit_effect_at,
            CooldownKind::Ability => self.last_ability_trigger_at,
            CooldownKind::Teleport => self.last_teleport_at,
        }
    }

    pub fn stamp(&mut self, kind: CooldownKind, now: Millis) {
        let slot = match kind {
            CooldownKind::HitEffect => &mut self.last_hit_effect_at,
            CooldownKind::Ability => &mut self.last_ability_trigger_at,
            CooldownKind::Teleport => &mut self.last_teleport_at,
        };
        *slot = Some(now);
    }

    /// Time left before `kind` may fire again
    pub fn remaining(&self, kind: CooldownKind, cooldown_ms: Millis, now: Millis) -> Millis {
        match self.last(kind) {
            Some(last) => cooldown_ms.saturating_sub(now.saturating_sub(last)),
            None => 0,
        }
    }

    pub fn is_ready(&self, kind: CooldownKind, cooldown_ms: Millis, now: Millis) -> bool {
        self.remaining(kind, cooldown_ms, now) == 0
    }

    /// Most recent trigger of any kind
    pub fn last_activity(&self) -> Option<Millis> {
        [
            self.last_ability_trigger_at,
            self.last_teleport_at,
            self.last_hit_effect_at,
        ]
        .into_iter()
        .flatten()
        .max()
    }

    /// Every timestamp is older than `horizon_ms`
    pub fn is_idle(&self, now: Millis, horizon_ms: Millis) -> bool {
        self.last_activity()
            .map_or(true, |last| now.saturating_sub(last) > horizon_ms)
    }
}

/// Concurrency-safe map of actor cooldowns
#[derive(Debug, Default)]
pub struct CooldownStore {
    states: Mutex<HashMap<ActorId, ActorProcState>>,
}

impl CooldownStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, actor: ActorId) -> Option<ActorProcState> {
        self.states.lock().get(&actor).copied()
    }

    pub fn remaining(&self, actor: ActorId, kind: CooldownKind, cooldown_ms: Millis, now: Millis) -> Millis {
        self.get(actor)
            .map_or(0, |state| state.remaining(kind, cooldown_ms, now))
    }

    pub fn is_ready(&self, actor: ActorId, kind: CooldownKind, cooldown_ms: Millis, now: Millis) -> bool {
        self.remaining(actor, kind, cooldown_ms, now) == 0
    }

    /// Fire `gate` if the cooldown has elapsed, stamping only when it returns `Some`
    ///
    /// The check, the gate and the stamp happen under one lock, so two callers
    /// can never both claim the same window.
    pub fn claim<T>(
        &self,
        actor: ActorId,
        kind: CooldownKind,
        cooldown_ms: Millis,
        now: Millis,
        gate: impl FnOnce() -> Option<T>,
    ) -> Option<T> {
        let mut states = self.states.lock();
        if let Some(state) = states.get(&actor) {
            if !state.is_ready(kind, cooldown_ms, now) {
                return None;
            }
        }
        let fired = gate()?;
        states.entry(actor).or_default().stamp(kind, now);
        Some(fired)
    }

    /// Record a trigger unconditionally
    pub fn stamp(&self, actor: ActorId, kind: CooldownKind, now: Millis) {
        self.states.lock().entry(actor).or_default().stamp(kind, now);
    }

    /// Forget an actor, e.g. on disconnect
    pub fn forget(&self, actor: ActorId) -> Option<ActorProcState> {
        self.states.lock().remove(&actor)
    }

    /// Drop every actor idle for longer than `horizon_ms`; returns how many went
    pub fn sweep(&self, now: Millis, horizon_ms: Millis) -> usize {
        let mut states = self.states.lock();
        let before = states.len();
        states.retain(|_, state| !state.is_idle(now, horizon_ms));
        before - states.len()
    }

    pub fn len(&self) -> usize {
        self.states.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.lock().is_empty()
    }
}
