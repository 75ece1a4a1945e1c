//! delve - tabletop dungeon crawl rules engine
//!
//! Generates dungeons room by room from random tables and runs turn-based
//! combat between an adventuring party and the monsters found inside.

pub mod combat;
pub mod config;
pub mod dice;
pub mod dungeon;
pub mod items;
pub mod monster;
pub mod persist;
pub mod player;
pub mod tables;

pub use combat::{ActionResponse, CombatEncounter, CombatResult, Rejection};
pub use config::{Config, LogFormat};
pub use dice::{DiceRoll, DiceRoller, Roller, ScriptedRoller};
pub use dungeon::{generate_dungeon, Direction, Dungeon, DungeonGrid, DungeonRoom};
pub use monster::Monster;
pub use persist::{Snapshot, SnapshotError};
pub use player::Player;
pub use tables::{BuiltinTables, JsonTables, TableName, TableSource};
