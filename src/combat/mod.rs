//! Combat-side rarity behaviour
//!
//! Proc effects on hit, weapon abilities, projectiles and the per-actor
//! cooldown bookkeeping they share.

pub mod status;
pub mod cooldowns;
pub mod procs;
pub mod abilities;

/// Wall-clock milliseconds as supplied by the host
pub type Millis = u64;

pub use status::{EffectSpec, StatusEffect, EFFECT_DURATION_SECS};
pub use cooldowns::{ActorId, ActorProcState, CooldownKind, CooldownStore};
pub use procs::{ProcEffectGate, ProcFired};
pub use abilities::{ArrowTags, ProjectileImpact, WeaponAbilities, WeaponProc};
