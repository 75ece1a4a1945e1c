//! Scenario tests for delve
//!
//! - Dungeon: entrance layout, exploration, connectivity and the room budget
//! - Combat: kills, victory rewards, death saves and fleeing
//! - Persistence: snapshots and round trips through JSON

pub mod combat;
pub mod dungeon;
pub mod persistence;
