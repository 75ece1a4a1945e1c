//! Dungeon metadata and exploration lifecycle

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::legacy::{self, LegacyRoom};
use super::{Direction, DungeonError, DungeonGrid, DungeonRejection, DungeonRoom, RoomBudget, RoomKind};
use crate::dice::{DiceError, Roller};
use crate::tables::{TableName, TableSource};

/// "2d6+2 Rooms"
static SIZE_FORMULA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)d(\d+)\+(\d+)").unwrap());

const FALLBACK_ROOMS: u32 = 5;

/// What [`Dungeon::advance`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Advance {
    /// Progress is already at the last room
    AtEnd,
    /// Walked through an exit
    Moved { direction: Direction },
    /// No grid move was possible; the room counter was bumped instead
    Counter { advanced: bool },
}

/// A generated dungeon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredDungeon")]
pub struct Dungeon {
    pub name: String,
    pub theme: String,
    pub dungeon_type: String,
    pub adjective: String,
    pub noun: String,
    /// Size formula as rolled, e.g. "2d6+2 Rooms"
    pub size: String,
    pub special_rooms_count: u32,
    pub builder: String,
    pub purpose: String,
    pub destruction: String,
    #[serde(default)]
    pub entered: bool,
    #[serde(default)]
    pub completed: bool,
    /// Rooms visited so far
    #[serde(default)]
    pub current_room: u32,
    pub total_rooms: u32,
    /// Rooms rolled without a grid
    #[serde(default)]
    pub explored_rooms: Vec<LegacyRoom>,
    #[serde(default)]
    pub grid: Option<DungeonGrid>,
}

#[derive(Deserialize)]
struct StoredDungeon {
    name: String,
    theme: String,
    dungeon_type: String,
    adjective: String,
    noun: String,
    size: String,
    special_rooms_count: u32,
    builder: String,
    purpose: String,
    destruction: String,
    #[serde(default)]
    entered: bool,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    current_room: u32,
    total_rooms: u32,
    #[serde(default)]
    explored_rooms: Vec<LegacyRoom>,
    #[serde(default)]
    grid: Option<DungeonGrid>,
}

impl TryFrom<StoredDungeon> for Dungeon {
    type Error = String;

    fn try_from(stored: StoredDungeon) -> Result<Self, Self::Error> {
        // the entrance exists even when the budget is zero
        if let Some(grid) = &stored.grid {
            if grid.rooms_generated() > stored.total_rooms.max(1) {
                return Err(format!(
                    "grid holds {} rooms but the dungeon allows {}",
                    grid.rooms_generated(),
                    stored.total_rooms
                ));
            }
        }
        Ok(Self {
            name: stored.name,
            theme: stored.theme,
            dungeon_type: stored.dungeon_type,
            adjective: stored.adjective,
            noun: stored.noun,
            size: stored.size,
            special_rooms_count: stored.special_rooms_count,
            builder: stored.builder,
            purpose: stored.purpose,
            destruction: stored.destruction,
            entered: stored.entered,
            completed: stored.completed,
            current_room: stored.current_room,
            total_rooms: stored.total_rooms,
            explored_rooms: stored.explored_rooms,
            grid: stored.grid,
        })
    }
}

/// Resolve a size formula: N dice of M sides (capped at N×M) plus K
pub fn room_count(size: &str, roller: &mut dyn Roller) -> Result<u32, DungeonError> {
    let Some(caps) = SIZE_FORMULA.captures(size) else {
        debug!(size, fallback = FALLBACK_ROOMS, "size has no formula");
        return Ok(FALLBACK_ROOMS);
    };
    let number = |i: usize| {
        caps[i]
            .parse::<u32>()
            .map_err(|_| DiceError::Invalid(size.to_string()))
    };
    let (count, sides, bonus) = (number(1)?, number(2)?, number(3)?);
    if count == 0 {
        return Err(DiceError::ZeroDice.into());
    }
    if sides == 0 {
        return Err(DiceError::ZeroSides.into());
    }
    let overflow = || DiceError::Overflow(size.to_string());
    let most = count.checked_mul(sides).ok_or_else(overflow)?;
    let rolled = roller.dice(count, sides).min(most);
    Ok(rolled.checked_add(bonus).ok_or_else(overflow)?)
}

fn roll_text(
    tables: &dyn TableSource,
    name: TableName,
    roller: &mut dyn Roller,
) -> Result<String, DungeonError> {
    Ok(tables.roll(name, roller)?.trim().to_string())
}

/// Roll a new dungeon
pub fn generate_dungeon(
    roller: &mut dyn Roller,
    tables: &dyn TableSource,
) -> Result<Dungeon, DungeonError> {
    let theme = roll_text(tables, TableName::Theme, roller)?;
    let dungeon_type = roll_text(tables, TableName::DungeonType, roller)?;
    let adjective_table = if roller.d6() <= 3 {
        TableName::Adjective1
    } else {
        TableName::Adjective2
    };
    let adjective = roll_text(tables, adjective_table, roller)?;
    let noun_table = if roller.d6() <= 3 {
        TableName::Noun1
    } else {
        TableName::Noun2
    };
    let noun = roll_text(tables, noun_table, roller)?;
    let size = roll_text(tables, TableName::Size, roller)?;
    let special = roll_text(tables, TableName::SpecialRoomsCount, roller)?;
    let special_rooms_count = special.parse::<u32>().map_err(|_| DungeonError::BadEntry {
        table: TableName::SpecialRoomsCount,
        value: special.clone(),
    })?;
    let builder = roll_text(tables, TableName::Builder, roller)?;
    let purpose = roll_text(tables, TableName::Purpose, roller)?;
    let destruction = roll_text(tables, TableName::Destruction, roller)?;
    let total_rooms = room_count(&size, roller)?;

    let name = format!("{} {} of {} {}", theme, dungeon_type, adjective, noun);
    info!(%name, total_rooms, special_rooms_count, "generated dungeon");

    Ok(Dungeon {
        name,
        theme,
        dungeon_type,
        adjective,
        noun,
        size,
        special_rooms_count,
        builder,
        purpose,
        destruction,
        entered: false,
        completed: false,
        current_room: 0,
        total_rooms,
        explored_rooms: Vec::new(),
        grid: None,
    })
}

impl Dungeon {
    pub fn from_json(json: &str) -> Result<Self, DungeonError> {
        Ok(serde_json::from_str(json)?)
    }

    fn budget(&self) -> RoomBudget {
        RoomBudget {
            total_rooms: self.total_rooms,
            special_rooms: self.special_rooms_count,
        }
    }

    /// Step inside; the grid is built on the first entry only
    pub fn enter(&mut self, roller: &mut dyn Roller) {
        self.entered = true;
        self.current_room = 0;
        if self.grid.is_none() {
            self.grid = Some(DungeonGrid::new(roller));
        }
        info!(dungeon = %self.name, total_rooms = self.total_rooms, "entered dungeon");
    }

    pub fn current_grid_room(&self) -> Option<&DungeonRoom> {
        self.grid.as_ref()?.current_room()
    }

    pub fn current_grid_room_mut(&mut self) -> Option<&mut DungeonRoom> {
        self.grid.as_mut()?.current_room_mut()
    }

    /// Walk through an exit of the current room
    pub fn move_in_direction(
        &mut self,
        direction: Direction,
        roller: &mut dyn Roller,
        tables: &dyn TableSource,
    ) -> Result<Option<&DungeonRoom>, DungeonError> {
        let budget = self.budget();
        let Some(grid) = self.grid.as_mut() else {
            return Ok(None);
        };
        if grid.move_player(direction, &budget, roller, tables)?.is_none() {
            return Ok(None);
        }
        self.current_room = grid.rooms_generated().min(self.total_rooms);
        Ok(self.current_grid_room())
    }

    pub fn available_exits(&self) -> Vec<Direction> {
        self.grid
            .as_ref()
            .map(DungeonGrid::available_exits)
            .unwrap_or_default()
    }

    /// Bump the room counter; false once the last room is reached
    pub fn advance_room(&mut self) -> bool {
        if self.current_room < self.total_rooms {
            self.current_room += 1;
            true
        } else {
            false
        }
    }

    /// Move on without choosing a direction.
    ///
    /// Exits into unmapped cells are preferred; otherwise any exit is taken.
    pub fn advance(
        &mut self,
        roller: &mut dyn Roller,
        tables: &dyn TableSource,
    ) -> Result<Advance, DungeonError> {
        if self.current_room >= self.total_rooms {
            return Ok(Advance::AtEnd);
        }

        if let Some(grid) = &self.grid {
            let unmapped = grid.unmapped_exits();
            let choices = if unmapped.is_empty() {
                grid.available_exits()
            } else {
                unmapped
            };
            if !choices.is_empty() {
                let direction = choices[roller.pick(choices.len())];
                if self.move_in_direction(direction, roller, tables)?.is_some() {
                    return Ok(Advance::Moved { direction });
                }
            }
        }

        let advanced = self.advance_room();
        debug!(advanced, current_room = self.current_room, "advanced room counter");
        Ok(Advance::Counter { advanced })
    }

    /// Roll and record the current room of a grid-less dungeon
    pub fn explore_legacy_room(
        &mut self,
        roller: &mut dyn Roller,
        tables: &dyn TableSource,
    ) -> Result<&LegacyRoom, DungeonError> {
        let room = legacy::roll_room(self.current_room + 1, roller, tables)?;
        debug!(room_number = room.room_number, kind = %room.contents.room_type, "legacy room");
        self.explored_rooms.push(room);
        Ok(&self.explored_rooms[self.explored_rooms.len() - 1])
    }

    /// Finish the dungeon once every room has been visited
    pub fn complete(&mut self) -> Result<(), DungeonRejection> {
        if !self.entered {
            return Err(DungeonRejection::NotEntered);
        }
        if self.completed {
            return Err(DungeonRejection::AlreadyCompleted);
        }
        if self.current_room + 1 < self.total_rooms {
            return Err(DungeonRejection::Unexplored {
                explored: self.current_room + 1,
                total: self.total_rooms,
            });
        }
        self.completed = true;
        info!(dungeon = %self.name, "dungeon completed");
        Ok(())
    }

    /// Describe the room the player stands in
    pub fn room_description(&self) -> String {
        let Some(room) = self.current_grid_room() else {
            return "You are not in the dungeon.".to_string();
        };

        let mut text = match room.room_type {
            RoomKind::Entrance => format!(
                "You are at the entrance to the {}.\nEntrance Pattern: {}",
                self.name,
                room.entrance_pattern.unwrap_or_default()
            ),
            RoomKind::Corridor => "You are in a narrow corridor.".to_string(),
            RoomKind::Room => format!(
                "You are in a {}x{} room (Shape {}).",
                room.width,
                room.height,
                room.shape.unwrap_or_default()
            ),
        };

        if room.is_special {
            text.push_str("\n[SPECIAL ROOM]");
        }
        text.push_str(&format!(
            "\n\nContents: {}\n  {}",
            room.contents.label(),
            room.contents.describe()
        ));

        let monsters: Vec<String> = room
            .alive_monsters()
            .map(|m| format!("{} ({}/{} HP)", m.name, m.hp_current, m.hp_max))
            .collect();
        if !monsters.is_empty() {
            text.push_str(&format!("\n  Monsters: {}", monsters.join(", ")));
        }
        if !room.treasure.is_empty() {
            let names: Vec<&str> = room.treasure.iter().map(|i| i.name.as_str()).collect();
            text.push_str(&format!("\n  Treasure: {}", names.join(", ")));
        }
        if !room.dressing.is_empty() {
            text.push_str(&format!("\n\nRoom Dressing: {}", room.dressing.join(", ")));
        }

        let exits: Vec<&str> = room.exits.iter().map(Direction::as_str).collect();
        let exits = if exits.is_empty() {
            "None".to_string()
        } else {
            exits.join(", ")
        };
        text.push_str(&format!("\n\nExits: {}", exits));

        if !room.doors.is_empty() {
            text.push_str("\n\nDoors:");
            for (direction, door) in &room.doors {
                let label = direction.as_str();
                let mut chars = label.chars();
                let capitalized: String = chars
                    .next()
                    .map(|c| c.to_ascii_uppercase())
                    .into_iter()
                    .chain(chars)
                    .collect();
                text.push_str(&format!("\n  {}: {}", capitalized, door.kind));
            }
        }
        text
    }
}
