//! Room rolls for dungeons explored without a grid
//!
//! Older saves track progress as a bare room counter. Each room visited
//! this way gets one roll on the room table, recorded by number. Unlike the
//! grid, a Discovery here has a further 2-in-6 chance of a danger too.

use serde::{Deserialize, Serialize};

use super::DungeonError;
use crate::dice::Roller;
use crate::items::{deserialize_optional_item, parse_treasure, Item};
use crate::monster::Monster;
use crate::tables::{DenizenSet, TableName, TableSource};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyRoom {
    pub room_number: u32,
    pub contents: LegacyContents,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyContents {
    #[serde(rename = "type")]
    pub room_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spoor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discovery_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discovery_detail: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_item"
    )]
    pub treasure_item: Option<Item>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub also_danger: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub danger_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub danger_detail: Option<String>,
    /// Denizens waiting to fight
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub monsters: Vec<Monster>,
}

/// Roll the contents of legacy room `room_number`
pub fn roll_room(
    room_number: u32,
    roller: &mut dyn Roller,
    tables: &dyn TableSource,
) -> Result<LegacyRoom, DungeonError> {
    let room_type = tables.roll(TableName::Room, roller)?.trim().to_string();
    let mut contents = LegacyContents {
        room_type: room_type.clone(),
        ..Default::default()
    };

    match room_type.as_str() {
        "Spoor" => {
            contents.spoor = Some(tables.roll(TableName::Spoor, roller)?.to_string());
        }
        "Discovery" => {
            roll_discovery(&mut contents, roller, tables)?;
            if roller.d6() <= 2 {
                contents.also_danger = true;
                roll_danger(&mut contents, roller, tables)?;
            }
        }
        "Danger" => roll_danger(&mut contents, roller, tables)?,
        _ => {}
    }

    Ok(LegacyRoom {
        room_number,
        contents,
    })
}

fn roll_discovery(
    contents: &mut LegacyContents,
    roller: &mut dyn Roller,
    tables: &dyn TableSource,
) -> Result<(), DungeonError> {
    let kind = tables.roll(TableName::Discovery, roller)?.trim().to_string();

    contents.discovery_detail = match kind.as_str() {
        "Special Room" => {
            let table = if roller.d6() <= 3 {
                TableName::SpecialRoom1
            } else {
                TableName::SpecialRoom2
            };
            Some(tables.roll(table, roller)?.to_string())
        }
        "Feature" => Some(tables.roll(TableName::Feature, roller)?.to_string()),
        "Item" => Some(tables.roll(TableName::Item, roller)?.to_string()),
        "Treasure A" => Some(tables.roll(TableName::TreasureA, roller)?.to_string()),
        "Treasure B" => {
            let text = tables.roll(TableName::TreasureB, roller)?.to_string();
            let item = parse_treasure(&text, 1, roller)?;
            let detail = format!("Found: {}", item.name);
            contents.treasure_item = Some(item);
            Some(detail)
        }
        _ => None,
    };
    contents.discovery_type = Some(kind);
    Ok(())
}

fn roll_danger(
    contents: &mut LegacyContents,
    roller: &mut dyn Roller,
    tables: &dyn TableSource,
) -> Result<(), DungeonError> {
    let kind = tables.roll(TableName::Danger, roller)?.trim().to_string();

    let detail = if kind == "Hazard" {
        tables.roll(TableName::Hazard, roller)?.to_string()
    } else if kind == "Trap" {
        tables.roll(TableName::Trap, roller)?.to_string()
    } else if kind == "Encounter" {
        "Encounter (roll 2d6 on encounter table)".to_string()
    } else if kind.contains("(T1)") || kind.contains("(T2)") {
        let tier = if kind.contains("(T1)") { 1 } else { 2 };
        let set = DenizenSet::select(tier, roller);
        let entry = tables.roll_denizen(set, roller)?;
        let detail = format!(
            "{} (HD: {}, AC: {}, Attack: {})",
            entry.name, entry.hd, entry.ac, entry.attack
        );
        contents.monsters = Monster::spawn_group(entry, tier, roller);
        detail
    } else {
        kind.clone()
    };

    contents.danger_type = Some(kind);
    contents.danger_detail = Some(detail);
    Ok(())
}
