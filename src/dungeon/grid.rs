//! Incremental room grid
//!
//! The grid starts with only the entrance at the origin. Walking through an
//! open side into an empty cell generates the next room there, hangs a door
//! on both sides of the shared wall, and fills the room. Generation stops
//! once the dungeon's room budget is spent; after that only existing rooms
//! can be entered.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{
    populate_room, Direction, DoorKind, DungeonError, DungeonRoom, Pos, RoomContents, RoomKind,
};
use crate::dice::Roller;
use crate::tables::{TableName, TableSource};

/// How many rooms a grid may grow to, and how many may be special
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomBudget {
    pub total_rooms: u32,
    pub special_rooms: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredGrid")]
pub struct DungeonGrid {
    /// Rooms keyed by "x,y"
    rooms: BTreeMap<String, DungeonRoom>,
    entrance_pos: Pos,
    player_pos: Pos,
    /// Rooms created so far, entrance included
    rooms_generated: u32,
}

#[derive(Deserialize)]
struct StoredGrid {
    rooms: BTreeMap<String, DungeonRoom>,
    entrance_pos: Pos,
    player_pos: Pos,
    rooms_generated: u32,
}

impl TryFrom<StoredGrid> for DungeonGrid {
    type Error = String;

    fn try_from(stored: StoredGrid) -> Result<Self, Self::Error> {
        for (key, room) in &stored.rooms {
            if Pos::from_key(key) != Some(room.pos()) {
                return Err(format!("room key {} does not match its coordinates", key));
            }
        }
        if stored.entrance_pos != Pos::ORIGIN {
            return Err(format!("entrance at {} instead of the origin", stored.entrance_pos));
        }
        if stored.rooms_generated as usize != stored.rooms.len() {
            return Err(format!(
                "rooms_generated {} does not match {} rooms",
                stored.rooms_generated,
                stored.rooms.len()
            ));
        }
        for pos in [stored.entrance_pos, stored.player_pos] {
            if !stored.rooms.contains_key(&pos.key()) {
                return Err(format!("no room at {}", pos.key()));
            }
        }
        Ok(Self {
            rooms: stored.rooms,
            entrance_pos: stored.entrance_pos,
            player_pos: stored.player_pos,
            rooms_generated: stored.rooms_generated,
        })
    }
}

/// Entrance exits and size by d6 pattern
fn entrance_layout(pattern: u32) -> (&'static [Direction], u32, u32) {
    use Direction::*;
    match pattern {
        1 => (&[North], 1, 1),
        2 => (&[North, East], 2, 2),
        3 => (&[North, West], 2, 1),
        4 => (&[North, East], 2, 2),
        5 => (&[North, East, West], 3, 1),
        _ => (&[North, East], 2, 2),
    }
}

impl DungeonGrid {
    /// A grid holding only the entrance, with the player standing in it
    pub fn new(roller: &mut dyn Roller) -> Self {
        let pattern = roller.d6();
        let (exits, width, height) = entrance_layout(pattern);

        let mut entrance = DungeonRoom::new(Pos::ORIGIN, RoomKind::Entrance).with_size(width, height);
        entrance.entrance_pattern = Some(pattern);
        entrance.contents = RoomContents::Entrance;
        entrance.explored = true;
        for &exit in exits {
            entrance.add_exit(exit);
        }
        debug!(pattern, exits = ?entrance.exits, "created entrance");

        let mut rooms = BTreeMap::new();
        rooms.insert(Pos::ORIGIN.key(), entrance);
        Self {
            rooms,
            entrance_pos: Pos::ORIGIN,
            player_pos: Pos::ORIGIN,
            rooms_generated: 1,
        }
    }

    pub fn rooms_generated(&self) -> u32 {
        self.rooms_generated
    }

    pub fn player_pos(&self) -> Pos {
        self.player_pos
    }

    pub fn entrance_pos(&self) -> Pos {
        self.entrance_pos
    }

    pub fn room_at(&self, pos: Pos) -> Option<&DungeonRoom> {
        self.rooms.get(&pos.key())
    }

    pub fn room_at_mut(&mut self, pos: Pos) -> Option<&mut DungeonRoom> {
        self.rooms.get_mut(&pos.key())
    }

    pub fn current_room(&self) -> Option<&DungeonRoom> {
        self.room_at(self.player_pos)
    }

    pub fn current_room_mut(&mut self) -> Option<&mut DungeonRoom> {
        let pos = self.player_pos;
        self.room_at_mut(pos)
    }

    pub fn rooms(&self) -> impl Iterator<Item = &DungeonRoom> {
        self.rooms.values()
    }

    pub fn special_rooms_placed(&self) -> u32 {
        self.rooms.values().filter(|r| r.is_special).count() as u32
    }

    /// Open sides of the room the player stands in
    pub fn available_exits(&self) -> Vec<Direction> {
        self.current_room()
            .map(|room| room.exits.clone())
            .unwrap_or_default()
    }

    /// Open sides that lead into cells with no room yet
    pub fn unmapped_exits(&self) -> Vec<Direction> {
        self.available_exits()
            .into_iter()
            .filter(|&dir| self.room_at(self.player_pos.step(dir)).is_none())
            .collect()
    }

    /// Walk through an open side of the current room.
    ///
    /// Returns `None` without touching the grid when the side is closed or
    /// when the cell is empty and the budget is spent.
    pub fn move_player(
        &mut self,
        direction: Direction,
        budget: &RoomBudget,
        roller: &mut dyn Roller,
        tables: &dyn TableSource,
    ) -> Result<Option<&DungeonRoom>, DungeonError> {
        let from = self.player_pos;
        match self.current_room() {
            Some(room) if room.has_exit(direction) => {}
            _ => {
                debug!(%direction, pos = %from, "no exit that way");
                return Ok(None);
            }
        }

        let target = from.step(direction);
        let key = target.key();

        if self.rooms.contains_key(&key) {
            self.player_pos = target;
            let room = self.rooms.get_mut(&key).map(|room| {
                room.explored = true;
                &*room
            });
            return Ok(room);
        }

        if self.rooms_generated >= budget.total_rooms {
            debug!(
                generated = self.rooms_generated,
                total = budget.total_rooms,
                "room budget spent"
            );
            return Ok(None);
        }

        let mut room = generate_room(target, direction, roller);
        let door: DoorKind = tables.roll(TableName::Door, roller)?.parse()?;
        room.add_door(direction.opposite(), door, from);
        room.explored = true;
        let special_open = self.special_rooms_placed() < budget.special_rooms;
        populate_room(&mut room, special_open, roller, tables)?;

        if let Some(current) = self.rooms.get_mut(&from.key()) {
            current.add_door(direction, door, target);
        }
        info!(
            pos = %target,
            kind = ?room.room_type,
            contents = room.contents.label(),
            %door,
            "generated room"
        );
        self.rooms.insert(key.clone(), room);
        self.rooms_generated += 1;
        self.player_pos = target;
        Ok(self.rooms.get(&key))
    }
}

/// Lay out a room or corridor entered by moving `direction`.
///
/// The back wall always opens toward the room it was entered from.
fn generate_room(pos: Pos, direction: Direction, roller: &mut dyn Roller) -> DungeonRoom {
    let back = direction.opposite();
    let [left, right] = direction.perpendicular();

    if roller.d6() <= 2 {
        let mut corridor = DungeonRoom::new(pos, RoomKind::Corridor);
        corridor.shape = Some(1);
        corridor.add_exit(back);
        if roller.chance(50) {
            corridor.add_exit(direction);
        }
        if roller.chance(25) {
            corridor.add_exit(left);
        }
        if roller.chance(25) {
            corridor.add_exit(right);
        }
        return corridor;
    }

    let shape = roller.d6();
    let (exits, width, height): (&[Direction], u32, u32) = match shape {
        1 => (&[back, direction], 2, 2),
        2 => (&[back, direction, left], 3, 2),
        3 => (&[back, left, right], 2, 2),
        4 => (&[back, direction, right], 3, 3),
        5 => (&[back, direction, left, right], 2, 2),
        _ => (&[back, left], 2, 1),
    };
    let mut room = DungeonRoom::new(pos, RoomKind::Room).with_size(width, height);
    room.shape = Some(shape);
    for &exit in exits {
        room.add_exit(exit);
    }
    room
}
