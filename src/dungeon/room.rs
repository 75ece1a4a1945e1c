use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Direction, DungeonError, Pos, RoomContents};
use crate::items::{deserialize_items, Item};
use crate::monster::Monster;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomKind {
    Entrance,
    Room,
    Corridor,
}

/// Door state as rolled on the door table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoorKind {
    Unlocked,
    Stuck,
    Locked,
    Trapped,
}

impl DoorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DoorKind::Unlocked => "Unlocked",
            DoorKind::Stuck => "Stuck",
            DoorKind::Locked => "Locked",
            DoorKind::Trapped => "Trapped",
        }
    }
}

impl std::fmt::Display for DoorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DoorKind {
    type Err = DungeonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unlocked" | "open" => Ok(DoorKind::Unlocked),
            "stuck" => Ok(DoorKind::Stuck),
            "locked" => Ok(DoorKind::Locked),
            "trapped" => Ok(DoorKind::Trapped),
            _ => Err(DungeonError::UnknownDoor(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Door {
    #[serde(rename = "type")]
    pub kind: DoorKind,
    /// Coordinates of the room on the other side
    pub to_room: Pos,
}

/// One cell of the dungeon grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DungeonRoom {
    pub x: i32,
    pub y: i32,
    pub room_type: RoomKind,
    /// d6 shape roll; corridors use shape 1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<u32>,
    /// d6 pattern roll, entrance only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrance_pattern: Option<u32>,
    #[serde(default)]
    pub explored: bool,
    #[serde(default)]
    pub contents: RoomContents,
    #[serde(default)]
    pub doors: BTreeMap<Direction, Door>,
    /// Open sides in the order they were added
    #[serde(default)]
    pub exits: Vec<Direction>,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub monsters: Vec<Monster>,
    #[serde(default, deserialize_with = "deserialize_items")]
    pub treasure: Vec<Item>,
    #[serde(default)]
    pub dressing: Vec<String>,
    #[serde(default)]
    pub is_special: bool,
}

impl DungeonRoom {
    pub fn new(pos: Pos, room_type: RoomKind) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            room_type,
            shape: None,
            entrance_pattern: None,
            explored: false,
            contents: RoomContents::default(),
            doors: BTreeMap::new(),
            exits: Vec::new(),
            width: 1,
            height: 1,
            monsters: Vec::new(),
            treasure: Vec::new(),
            dressing: Vec::new(),
            is_special: false,
        }
    }

    pub fn pos(&self) -> Pos {
        Pos::new(self.x, self.y)
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Open a side; adding an existing exit is a no-op
    pub fn add_exit(&mut self, direction: Direction) {
        if !self.exits.contains(&direction) {
            self.exits.push(direction);
        }
    }

    /// Hang a door on a side, opening it if needed
    pub fn add_door(&mut self, direction: Direction, kind: DoorKind, to_room: Pos) {
        self.add_exit(direction);
        self.doors.insert(direction, Door { kind, to_room });
    }

    pub fn has_exit(&self, direction: Direction) -> bool {
        self.exits.contains(&direction)
    }

    pub fn door(&self, direction: Direction) -> Option<&Door> {
        self.doors.get(&direction)
    }

    pub fn alive_monsters(&self) -> impl Iterator<Item = &Monster> {
        self.monsters.iter().filter(|m| m.is_alive())
    }

    pub fn is_corridor(&self) -> bool {
        self.room_type == RoomKind::Corridor
    }
}
