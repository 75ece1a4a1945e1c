//! Dungeon generation
//!
//! A [`Dungeon`] is named and sized once, then explored on a square grid
//! that grows one room at a time as the player walks into unmapped
//! territory. Every generated room is joined to the room it was entered
//! from by a door on each side.

mod contents;
mod generator;
mod grid;
pub mod hazards;
pub mod legacy;
mod room;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dice::DiceError;
use crate::items::TreasureError;
use crate::tables::{TableError, TableName};

pub use contents::{populate_room, Danger, Discovery, RoomContents, TreasureTable};
pub use generator::{generate_dungeon, room_count, Advance, Dungeon};
pub use grid::{DungeonGrid, RoomBudget};
pub use room::{Door, DoorKind, DungeonRoom, RoomKind};

#[derive(Debug, Error)]
pub enum DungeonError {
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Dice(#[from] DiceError),
    #[error(transparent)]
    Treasure(#[from] TreasureError),
    #[error("unknown door kind: {0}")]
    UnknownDoor(String),
    #[error("unknown direction: {0}")]
    UnknownDirection(String),
    #[error("table {table} has an unusable entry: {value}")]
    BadEntry { table: TableName, value: String },
    #[error("malformed dungeon: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Why a dungeon action was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DungeonRejection {
    #[error("Not in a dungeon")]
    NotEntered,
    #[error("Dungeon already completed")]
    AlreadyCompleted,
    #[error("Must explore all rooms first ({explored}/{total} explored)")]
    Unexplored { explored: u32, total: u32 },
}

/// Cardinal directions on the dungeon grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Grid offset; north is +y
    pub fn offset(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::South => (0, -1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }

    /// The two directions at right angles, in a fixed order
    pub fn perpendicular(&self) -> [Direction; 2] {
        match self {
            Direction::North | Direction::South => [Direction::East, Direction::West],
            Direction::East | Direction::West => [Direction::North, Direction::South],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = DungeonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "north" | "n" => Ok(Direction::North),
            "south" | "s" => Ok(Direction::South),
            "east" | "e" => Ok(Direction::East),
            "west" | "w" => Ok(Direction::West),
            _ => Err(DungeonError::UnknownDirection(s.to_string())),
        }
    }
}

/// A grid coordinate, stored as `[x, y]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const ORIGIN: Pos = Pos { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell in `direction`
    pub fn step(&self, direction: Direction) -> Pos {
        let (dx, dy) = direction.offset();
        Pos::new(self.x + dx, self.y + dy)
    }

    /// Map key: "x,y"
    pub fn key(&self) -> String {
        format!("{},{}", self.x, self.y)
    }

    pub fn from_key(key: &str) -> Option<Pos> {
        let (x, y) = key.split_once(',')?;
        Some(Pos::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
    }
}

impl From<(i32, i32)> for Pos {
    fn from((x, y): (i32, i32)) -> Self {
        Pos::new(x, y)
    }
}

impl From<Pos> for (i32, i32) {
    fn from(pos: Pos) -> Self {
        (pos.x, pos.y)
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
