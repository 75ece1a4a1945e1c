//! Table overrides loaded from a JSON file
//!
//! The file holds two optional maps:
//!
//! ```json
//! {
//!   "tables":   { "door": { "1": "Unlocked", "2": "Barred" } },
//!   "denizens": { "tier1_low": { "7": { "name": "Kobold", "hd": "1/2", "ac": 13, "attack": "Spear" } } }
//! }
//! ```
//!
//! Anything not overridden is served from the built-in tables.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use super::{BuiltinTables, DenizenEntry, DenizenSet, Table, TableError, TableName, TableSource};

#[derive(Debug, Default, Deserialize)]
struct TableFile {
    #[serde(default)]
    tables: HashMap<TableName, Table<String>>,
    #[serde(default)]
    denizens: HashMap<DenizenSet, Table<DenizenEntry>>,
}

/// Built-in tables with per-table JSON overrides
#[derive(Debug)]
pub struct JsonTables {
    overrides: TableFile,
    base: &'static BuiltinTables,
}

impl JsonTables {
    /// Parse overrides from a JSON string
    pub fn from_json(json: &str) -> Result<Self, TableError> {
        let overrides: TableFile = serde_json::from_str(json)?;
        if let Some(name) = overrides
            .tables
            .iter()
            .find_map(|(name, table)| table.is_empty().then_some(name))
        {
            return Err(TableError::Empty(name.to_string()));
        }
        Ok(Self {
            overrides,
            base: BuiltinTables::shared(),
        })
    }

    /// Load overrides from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tables = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            tables = tables.overrides.tables.len(),
            denizens = tables.overrides.denizens.len(),
            "loaded table overrides"
        );
        Ok(tables)
    }
}

impl TableSource for JsonTables {
    fn table(&self, name: TableName) -> Result<&Table<String>, TableError> {
        match self.overrides.tables.get(&name) {
            Some(table) => Ok(table),
            None => self.base.table(name),
        }
    }

    fn denizens(&self, set: DenizenSet) -> Result<&Table<DenizenEntry>, TableError> {
        match self.overrides.denizens.get(&set) {
            Some(table) => Ok(table),
            None => self.base.denizens(set),
        }
    }
}
