//! Random tables
//!
//! A [`Table`] is an ordered `key -> value` map. The die rolled against it
//! is inferred from the key domain:
//! - keys within 1-6 roll a d6
//! - keys within 11-66 roll a d66
//! - keys within 2-12 roll 2d6
//! - keys within 1-4 roll a d4
//! - anything else picks a key uniformly
//!
//! Table data reaches the engine through a [`TableSource`], either the
//! [`BuiltinTables`] or a [`JsonTables`] override file.

mod builtin;
mod json;

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::dice::Roller;

pub use builtin::BuiltinTables;
pub use json::JsonTables;

/// Table lookup errors
#[derive(Debug, Error)]
pub enum TableError {
    #[error("table {0} is empty")]
    Empty(String),
    #[error("unknown table: {0}")]
    Unknown(String),
    #[error("table {table} has no entry for {key}")]
    MissingKey { table: String, key: u32 },
    #[error("failed to read table file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed table file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Die inferred from a table's key domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableDie {
    D6,
    D66,
    TwoD6,
    D4,
    /// No recognised die: pick a key uniformly
    Uniform,
}

/// An ordered keyed table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table<V> {
    entries: BTreeMap<u32, V>,
}

impl<V> Default for Table<V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<V> FromIterator<(u32, V)> for Table<V> {
    fn from_iter<I: IntoIterator<Item = (u32, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<V> Table<V> {
    /// Build a table from explicit keys
    pub fn new(entries: impl IntoIterator<Item = (u32, V)>) -> Self {
        entries.into_iter().collect()
    }

    /// Build a table keyed 1..=n from a list
    pub fn from_list(values: impl IntoIterator<Item = V>) -> Self {
        values
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i as u32 + 1, v))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: u32) -> Option<&V> {
        self.entries.get(&key)
    }

    pub fn keys(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.keys().copied()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values()
    }

    /// Die implied by the key domain (checked in a fixed order)
    pub fn die(&self) -> TableDie {
        let within = |lo: u32, hi: u32| self.keys().all(|k| (lo..=hi).contains(&k));
        if within(1, 6) {
            TableDie::D6
        } else if within(11, 66) {
            TableDie::D66
        } else if within(2, 12) {
            TableDie::TwoD6
        } else if within(1, 4) {
            TableDie::D4
        } else {
            TableDie::Uniform
        }
    }

    /// Middle key, used when a roll lands outside the table
    fn middle_key(&self) -> Option<u32> {
        self.keys().nth(self.len() / 2)
    }

    /// Entry at `key`, or the middle entry when `key` is absent
    pub fn get_or_middle(&self, key: u32, name: &str) -> Result<&V, TableError> {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }
        let middle = self
            .middle_key()
            .ok_or_else(|| TableError::Empty(name.to_string()))?;
        warn!(table = name, key, fallback = middle, "rolled key missing, using middle entry");
        self.get(middle).ok_or(TableError::MissingKey {
            table: name.to_string(),
            key: middle,
        })
    }

    /// Roll on the table with the die implied by its keys
    pub fn roll_on(&self, roller: &mut dyn Roller, name: &str) -> Result<&V, TableError> {
        if self.is_empty() {
            return Err(TableError::Empty(name.to_string()));
        }
        let key = match self.die() {
            TableDie::D6 => roller.d6(),
            TableDie::D66 => roller.d66(),
            TableDie::TwoD6 => roller.two_d6(),
            TableDie::D4 => roller.d4(),
            TableDie::Uniform => {
                let index = roller.pick(self.len());
                self.keys().nth(index).unwrap_or_default()
            }
        };
        debug!(table = name, key, "table roll");
        self.get_or_middle(key, name)
    }
}

/// Names of the string-valued dungeon tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableName {
    Theme,
    DungeonType,
    Adjective1,
    Adjective2,
    Noun1,
    Noun2,
    Size,
    SpecialRoomsCount,
    Corridor,
    Room,
    Spoor,
    Door,
    Discovery,
    SpecialRoom1,
    SpecialRoom2,
    Feature,
    Item,
    TreasureA,
    TreasureB,
    Danger,
    Hazard,
    Trap,
    Reaction,
    DressingNatural,
    DressingManMade,
    DressingLighting,
    DressingOdor,
    DressingOdd,
    DressingMystical,
    Destruction,
    Builder,
    Purpose,
    DungeonEncounters,
}

impl TableName {
    /// Every table name
    pub const ALL: [TableName; 33] = [
        TableName::Theme,
        TableName::DungeonType,
        TableName::Adjective1,
        TableName::Adjective2,
        TableName::Noun1,
        TableName::Noun2,
        TableName::Size,
        TableName::SpecialRoomsCount,
        TableName::Corridor,
        TableName::Room,
        TableName::Spoor,
        TableName::Door,
        TableName::Discovery,
        TableName::SpecialRoom1,
        TableName::SpecialRoom2,
        TableName::Feature,
        TableName::Item,
        TableName::TreasureA,
        TableName::TreasureB,
        TableName::Danger,
        TableName::Hazard,
        TableName::Trap,
        TableName::Reaction,
        TableName::DressingNatural,
        TableName::DressingManMade,
        TableName::DressingLighting,
        TableName::DressingOdor,
        TableName::DressingOdd,
        TableName::DressingMystical,
        TableName::Destruction,
        TableName::Builder,
        TableName::Purpose,
        TableName::DungeonEncounters,
    ];

    /// The six dressing categories, in roll order
    pub const DRESSING: [TableName; 6] = [
        TableName::DressingNatural,
        TableName::DressingManMade,
        TableName::DressingLighting,
        TableName::DressingOdor,
        TableName::DressingOdd,
        TableName::DressingMystical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableName::Theme => "theme",
            TableName::DungeonType => "dungeon_type",
            TableName::Adjective1 => "adjective1",
            TableName::Adjective2 => "adjective2",
            TableName::Noun1 => "noun1",
            TableName::Noun2 => "noun2",
            TableName::Size => "size",
            TableName::SpecialRoomsCount => "special_rooms_count",
            TableName::Corridor => "corridor",
            TableName::Room => "room",
            TableName::Spoor => "spoor",
            TableName::Door => "door",
            TableName::Discovery => "discovery",
            TableName::SpecialRoom1 => "special_room1",
            TableName::SpecialRoom2 => "special_room2",
            TableName::Feature => "feature",
            TableName::Item => "item",
            TableName::TreasureA => "treasure_a",
            TableName::TreasureB => "treasure_b",
            TableName::Danger => "danger",
            TableName::Hazard => "hazard",
            TableName::Trap => "trap",
            TableName::Reaction => "reaction",
            TableName::DressingNatural => "dressing_natural",
            TableName::DressingManMade => "dressing_man_made",
            TableName::DressingLighting => "dressing_lighting",
            TableName::DressingOdor => "dressing_odor",
            TableName::DressingOdd => "dressing_odd",
            TableName::DressingMystical => "dressing_mystical",
            TableName::Destruction => "destruction",
            TableName::Builder => "builder",
            TableName::Purpose => "purpose",
            TableName::DungeonEncounters => "dungeon_encounters",
        }
    }

    /// Dressing category label shown in room descriptions
    pub fn dressing_label(&self) -> Option<&'static str> {
        match self {
            TableName::DressingNatural => Some("Natural"),
            TableName::DressingManMade => Some("Man-made"),
            TableName::DressingLighting => Some("Lighting"),
            TableName::DressingOdor => Some("Odor"),
            TableName::DressingOdd => Some("Odd"),
            TableName::DressingMystical => Some("Mystical"),
            _ => None,
        }
    }
}

impl std::fmt::Display for TableName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableName {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['-', ' '], "_");
        TableName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == wanted)
            .ok_or_else(|| TableError::Unknown(s.to_string()))
    }
}

/// A monster stat block from a denizen table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenizenEntry {
    pub name: String,
    /// Hit dice notation ("2+2", "1/2", "1d2HP")
    pub hd: String,
    pub ac: i32,
    pub attack: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special: Option<String>,
}

impl DenizenEntry {
    pub fn new(name: &str, hd: &str, ac: i32, attack: &str) -> Self {
        Self {
            name: name.to_string(),
            hd: hd.to_string(),
            ac,
            attack: attack.to_string(),
            special: None,
        }
    }
}

/// The five 2d6 denizen tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenizenSet {
    /// Tier 1, sub-roll 1-2
    Tier1Low,
    /// Tier 1, sub-roll 3-4
    Tier1Mid,
    /// Tier 1, sub-roll 5-6
    Tier1High,
    /// Tier 2, sub-roll 1-2
    Tier2Low,
    /// Tier 2, sub-roll 3-6
    Tier2High,
}

impl DenizenSet {
    pub const ALL: [DenizenSet; 5] = [
        DenizenSet::Tier1Low,
        DenizenSet::Tier1Mid,
        DenizenSet::Tier1High,
        DenizenSet::Tier2Low,
        DenizenSet::Tier2High,
    ];

    /// Choose a denizen table for `tier` with a d6 sub-roll
    pub fn select(tier: u8, roller: &mut dyn Roller) -> Self {
        let sub = roller.d6();
        match (tier, sub) {
            (0 | 1, 1..=2) => DenizenSet::Tier1Low,
            (0 | 1, 3..=4) => DenizenSet::Tier1Mid,
            (0 | 1, _) => DenizenSet::Tier1High,
            (_, 1..=2) => DenizenSet::Tier2Low,
            _ => DenizenSet::Tier2High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DenizenSet::Tier1Low => "tier1_low",
            DenizenSet::Tier1Mid => "tier1_mid",
            DenizenSet::Tier1High => "tier1_high",
            DenizenSet::Tier2Low => "tier2_low",
            DenizenSet::Tier2High => "tier2_high",
        }
    }
}

impl std::fmt::Display for DenizenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable keyed table data consumed by the generators
pub trait TableSource {
    /// A string-valued table
    fn table(&self, name: TableName) -> Result<&Table<String>, TableError>;

    /// A 2d6 denizen table
    fn denizens(&self, set: DenizenSet) -> Result<&Table<DenizenEntry>, TableError>;

    /// Roll on a named table
    fn roll(&self, name: TableName, roller: &mut dyn Roller) -> Result<&str, TableError> {
        self.table(name)?
            .roll_on(roller, name.as_str())
            .map(String::as_str)
    }

    /// Roll 2d6 on a denizen table, falling back to the 7 entry
    fn roll_denizen(
        &self,
        set: DenizenSet,
        roller: &mut dyn Roller,
    ) -> Result<&DenizenEntry, TableError> {
        let table = self.denizens(set)?;
        let key = roller.two_d6();
        match table.get(key).or_else(|| table.get(7)) {
            Some(entry) => Ok(entry),
            None => table.get_or_middle(key, set.as_str()),
        }
    }
}

impl<T: TableSource + ?Sized> TableSource for &T {
    fn table(&self, name: TableName) -> Result<&Table<String>, TableError> {
        (**self).table(name)
    }

    fn denizens(&self, set: DenizenSet) -> Result<&Table<DenizenEntry>, TableError> {
        (**self).denizens(set)
    }
}
