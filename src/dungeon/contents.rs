//! What a freshly generated room holds

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{DungeonError, DungeonRoom};
use crate::dice::Roller;
use crate::items::parse_treasure;
use crate::monster::Monster;
use crate::tables::{DenizenSet, TableName, TableSource};

/// Treasure found in rooms is always rolled at this tier
const ROOM_TREASURE_TIER: u8 = 1;
const SPECIAL_ROOM_CHANCE: u32 = 30;
const DRESSING_CHANCE: u32 = 40;
const ENCOUNTER_MONSTER_CHANCE: u32 = 50;
const ENCOUNTER_TREASURE_CHANCE: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreasureTable {
    A,
    B,
}

impl TreasureTable {
    fn table(&self) -> TableName {
        match self {
            TreasureTable::A => TableName::TreasureA,
            TreasureTable::B => TableName::TreasureB,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Discovery {
    SpecialRoom { special: String },
    Feature { feature: String },
    Item { item: String },
    /// The rolled entry; the item itself lands in the room's treasure
    Treasure { table: TreasureTable, roll: String },
    Other { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Danger {
    Hazard { hazard: String },
    Trap { trap: String },
    Encounter {
        encounter: String,
        #[serde(default)]
        has_monsters: bool,
        #[serde(default)]
        has_treasure: bool,
    },
    /// Denizens placed in the room's monster list
    Monster { tier: u8 },
    Other { name: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RoomContents {
    Entrance,
    #[default]
    Empty,
    Spoor { spoor: String },
    Discovery { discovery: Discovery },
    Danger { danger: Danger },
}

impl RoomContents {
    pub fn label(&self) -> &'static str {
        match self {
            RoomContents::Entrance => "Entrance",
            RoomContents::Empty => "Empty",
            RoomContents::Spoor { .. } => "Spoor",
            RoomContents::Discovery { .. } => "Discovery",
            RoomContents::Danger { .. } => "Danger",
        }
    }

    /// One-line account of the contents
    pub fn describe(&self) -> String {
        match self {
            RoomContents::Entrance => "The way back to the surface.".to_string(),
            RoomContents::Empty => "Nothing of note.".to_string(),
            RoomContents::Spoor { spoor } => format!("Signs of something nearby: {}", spoor),
            RoomContents::Discovery { discovery } => match discovery {
                Discovery::SpecialRoom { special } => format!("Special room: {}", special),
                Discovery::Feature { feature } => format!("Feature: {}", feature),
                Discovery::Item { item } => format!("Item: {}", item),
                Discovery::Treasure { roll, .. } => format!("Treasure: {}", roll),
                Discovery::Other { name } => format!("Discovery: {}", name),
            },
            RoomContents::Danger { danger } => match danger {
                Danger::Hazard { hazard } => format!("Hazard: {}", hazard),
                Danger::Trap { trap } => format!("Trap: {}", trap),
                Danger::Encounter { encounter, .. } => format!("Encounter: {}", encounter),
                Danger::Monster { tier } => format!("Monsters (tier {})", tier),
                Danger::Other { name } => format!("Danger: {}", name),
            },
        }
    }
}

/// Roll a room's contents, treasure, monsters and dressing.
///
/// `special_open` is true while the dungeon still has special rooms to place.
pub fn populate_room(
    room: &mut DungeonRoom,
    special_open: bool,
    roller: &mut dyn Roller,
    tables: &dyn TableSource,
) -> Result<(), DungeonError> {
    if special_open && roller.chance(SPECIAL_ROOM_CHANCE) {
        room.is_special = true;
    }

    let table = if room.is_corridor() {
        TableName::Corridor
    } else {
        TableName::Room
    };
    let rolled = tables.roll(table, roller)?.trim().to_string();

    room.contents = match rolled.as_str() {
        "Spoor" => RoomContents::Spoor {
            spoor: tables.roll(TableName::Spoor, roller)?.to_string(),
        },
        "Discovery" => RoomContents::Discovery {
            discovery: roll_discovery(room, roller, tables)?,
        },
        "Danger" => RoomContents::Danger {
            danger: roll_danger(room, roller, tables)?,
        },
        _ => RoomContents::Empty,
    };

    if roller.chance(DRESSING_CHANCE) {
        let category = TableName::DRESSING[roller.pick(TableName::DRESSING.len())];
        room.dressing
            .push(tables.roll(category, roller)?.to_string());
    }

    debug!(
        pos = %room.pos(),
        contents = room.contents.label(),
        special = room.is_special,
        monsters = room.monsters.len(),
        "populated room"
    );
    Ok(())
}

/// "Special Room" picks a table with a d6 unless the entry names one
fn special_room_table(text: &str, roller: &mut dyn Roller) -> TableName {
    if text.ends_with('1') {
        TableName::SpecialRoom1
    } else if text.ends_with('2') || roller.d6() > 3 {
        TableName::SpecialRoom2
    } else {
        TableName::SpecialRoom1
    }
}

fn roll_discovery(
    room: &mut DungeonRoom,
    roller: &mut dyn Roller,
    tables: &dyn TableSource,
) -> Result<Discovery, DungeonError> {
    let kind = tables.roll(TableName::Discovery, roller)?.trim().to_string();

    let discovery = if kind.starts_with("Special Room") {
        room.is_special = true;
        let table = special_room_table(&kind, roller);
        Discovery::SpecialRoom {
            special: tables.roll(table, roller)?.to_string(),
        }
    } else if kind == "Feature" {
        Discovery::Feature {
            feature: tables.roll(TableName::Feature, roller)?.to_string(),
        }
    } else if kind == "Item" {
        Discovery::Item {
            item: tables.roll(TableName::Item, roller)?.to_string(),
        }
    } else if kind.starts_with("Treasure") {
        let table = if kind.ends_with('B') {
            TreasureTable::B
        } else {
            TreasureTable::A
        };
        let roll = tables.roll(table.table(), roller)?.to_string();
        room.treasure
            .push(parse_treasure(&roll, ROOM_TREASURE_TIER, roller)?);
        Discovery::Treasure { table, roll }
    } else {
        Discovery::Other { name: kind }
    };
    Ok(discovery)
}

fn roll_danger(
    room: &mut DungeonRoom,
    roller: &mut dyn Roller,
    tables: &dyn TableSource,
) -> Result<Danger, DungeonError> {
    let kind = tables.roll(TableName::Danger, roller)?.trim().to_string();

    let danger = if kind == "Hazard" {
        Danger::Hazard {
            hazard: tables.roll(TableName::Hazard, roller)?.to_string(),
        }
    } else if kind == "Trap" {
        Danger::Trap {
            trap: tables.roll(TableName::Trap, roller)?.to_string(),
        }
    } else if kind == "Encounter" {
        let encounter = tables
            .roll(TableName::DungeonEncounters, roller)?
            .to_string();
        let mut has_monsters = false;
        let mut has_treasure = false;
        if roller.chance(ENCOUNTER_MONSTER_CHANCE) {
            let set = DenizenSet::select(1, roller);
            let entry = tables.roll_denizen(set, roller)?;
            room.monsters.extend(Monster::spawn_group(entry, 1, roller));
            has_monsters = true;
        } else if roller.chance(ENCOUNTER_TREASURE_CHANCE) {
            let roll = tables.roll(TableName::TreasureA, roller)?.to_string();
            room.treasure
                .push(parse_treasure(&roll, ROOM_TREASURE_TIER, roller)?);
            has_treasure = true;
        }
        Danger::Encounter {
            encounter,
            has_monsters,
            has_treasure,
        }
    } else if kind.starts_with("Monster") {
        let tier = if kind.contains('2') { 2 } else { 1 };
        let set = DenizenSet::select(tier, roller);
        let entry = tables.roll_denizen(set, roller)?;
        room.monsters
            .extend(Monster::spawn_group(entry, tier, roller));
        Danger::Monster { tier }
    } else {
        Danger::Other { name: kind }
    };
    Ok(danger)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedRoller;
    use crate::dungeon::{Pos, RoomKind};
    use crate::tables::BuiltinTables;

    fn room() -> DungeonRoom {
        DungeonRoom::new(Pos::new(0, 1), RoomKind::Room)
    }

    #[test]
    fn test_empty_room() {
        // room table 1 = Empty, dressing check fails
        let mut roller = ScriptedRoller::new([1, 100]);
        let mut room = room();
        populate_room(&mut room, false, &mut roller, BuiltinTables::shared()).unwrap();

        assert_eq!(room.contents, RoomContents::Empty);
        assert!(room.dressing.is_empty());
        assert!(!room.is_special);
        assert_eq!(roller.remaining(), 0);
    }

    #[test]
    fn test_special_flag_only_while_budget_open() {
        let mut roller = ScriptedRoller::new([1, 100]);
        let mut closed = room();
        populate_room(&mut closed, false, &mut roller, BuiltinTables::shared()).unwrap();
        assert!(!closed.is_special);

        // d100 10 makes it special, then Empty, no dressing
        let mut roller = ScriptedRoller::new([10, 1, 100]);
        let mut open = room();
        populate_room(&mut open, true, &mut roller, BuiltinTables::shared()).unwrap();
        assert!(open.is_special);
    }

    #[test]
    fn test_spoor_and_dressing() {
        // Spoor (2), spoor Tracks (2), dressing 40, first category, d6 3
        let mut roller = ScriptedRoller::new([2, 2, 40, 1, 3]);
        let mut room = room();
        populate_room(&mut room, false, &mut roller, BuiltinTables::shared()).unwrap();

        assert_eq!(
            room.contents,
            RoomContents::Spoor {
                spoor: "Tracks".to_string()
            }
        );
        assert_eq!(room.dressing.len(), 1);
    }

    #[test]
    fn test_hazard_danger() {
        // Danger (5), Hazard (1), Collapse (2), no dressing
        let mut roller = ScriptedRoller::new([5, 1, 2, 100]);
        let mut room = room();
        populate_room(&mut room, false, &mut roller, BuiltinTables::shared()).unwrap();

        assert_eq!(
            room.contents,
            RoomContents::Danger {
                danger: Danger::Hazard {
                    hazard: "Collapse".to_string()
                }
            }
        );
        assert!(room.monsters.is_empty());
    }

    #[test]
    fn test_special_room_discovery() {
        // Discovery (3), Special Room (1), sub-roll 2 -> table 1, entry 4, no dressing
        let mut roller = ScriptedRoller::new([3, 1, 2, 4, 100]);
        let mut room = room();
        populate_room(&mut room, false, &mut roller, BuiltinTables::shared()).unwrap();

        assert!(room.is_special);
        assert!(matches!(
            room.contents,
            RoomContents::Discovery {
                discovery: Discovery::SpecialRoom { .. }
            }
        ));
    }

    #[test]
    fn test_treasure_discovery_places_item() {
        // Discovery (3), Treasure A (5), Potion (4) then the generator rolls
        let mut roller = ScriptedRoller::new([3, 5, 4]).with_fallback(1);
        let mut room = room();
        populate_room(&mut room, false, &mut roller, BuiltinTables::shared()).unwrap();

        assert_eq!(room.treasure.len(), 1);
        assert!(matches!(
            room.contents,
            RoomContents::Discovery {
                discovery: Discovery::Treasure {
                    table: TreasureTable::A,
                    ..
                }
            }
        ));
    }

    #[test]
    fn test_monster_danger_spawns() {
        // Danger (6), Monster (T2) (6), fallback 1s afterwards
        let mut roller = ScriptedRoller::new([6, 6]).with_fallback(1);
        let mut room = room();
        populate_room(&mut room, false, &mut roller, BuiltinTables::shared()).unwrap();

        assert_eq!(
            room.contents,
            RoomContents::Danger {
                danger: Danger::Monster { tier: 2 }
            }
        );
        assert_eq!(room.monsters.len(), 1);
        assert!(room.monsters.iter().all(|m| m.tier == 2 && m.is_alive()));
    }

    #[test]
    fn test_corridor_uses_corridor_table() {
        // corridor table 1-3 are Empty
        let mut roller = ScriptedRoller::new([3, 100]);
        let mut corridor = DungeonRoom::new(Pos::new(1, 0), RoomKind::Corridor);
        populate_room(&mut corridor, false, &mut roller, BuiltinTables::shared()).unwrap();
        assert_eq!(corridor.contents, RoomContents::Empty);
    }

    #[test]
    fn test_contents_json_shape() {
        let contents = RoomContents::Danger {
            danger: Danger::Trap {
                trap: "Pit".to_string(),
            },
        };
        let json = serde_json::to_value(&contents).unwrap();
        assert_eq!(json["type"], "Danger");
        assert_eq!(json["danger"]["kind"], "Trap");
        assert_eq!(json["danger"]["trap"], "Pit");
        assert_eq!(
            serde_json::to_value(RoomContents::Entrance).unwrap(),
            serde_json::json!({"type": "Entrance"})
        );
    }
}
