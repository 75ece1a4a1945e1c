//! Combat system module
//!
//! Turn-based battles between a party and monsters:
//! - Attack resolution with to-hit, criticals and fumbles
//! - Status effects (poisoned, paralyzed, diseased, stunned)
//! - Death saves, XP awards and loot
//! - Encounter snapshots for save/resume

pub mod attack;
pub mod effects;
mod encounter;
mod loot;
mod response;

pub use attack::{resolve_attack, AttackResult};
pub use effects::{EffectKind, StatusEffect, StatusEffects};
pub use encounter::{
    AttackReport, CombatEncounter, CombatError, CombatResult, CombatStatus, CombatantStatus,
    FleeReport, ItemReport, LogEntry, LogKind, Rejection,
};
pub use loot::{roll_loot, Currency, Loot};
pub use response::ActionResponse;
