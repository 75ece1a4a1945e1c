//! Flat JSON save files
//!
//! A snapshot bundles the adventurer with whatever dungeon and fight are
//! in progress. Files are pretty-printed JSON and carry a format version;
//! files written by a newer version are refused.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::combat::CombatEncounter;
use crate::dungeon::Dungeon;
use crate::player::Player;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot io error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub player: Player,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dungeon: Option<Dungeon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combat: Option<CombatEncounter>,
}

impl Snapshot {
    pub fn new(player: Player) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            player,
            dungeon: None,
            combat: None,
        }
    }

    pub fn with_dungeon(mut self, dungeon: Dungeon) -> Self {
        self.dungeon = Some(dungeon);
        self
    }

    pub fn with_combat(mut self, combat: CombatEncounter) -> Self {
        self.combat = Some(combat);
        self
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        if snapshot.version > SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        Ok(snapshot)
    }

    /// Write the snapshot, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        let io_err = |source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, self.to_json()?).map_err(io_err)?;
        info!(path = %path.display(), player = %self.player.name, "saved snapshot");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let json = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot = Self::from_json(&json)?;
        info!(path = %path.display(), player = %snapshot.player.name, "loaded snapshot");
        Ok(snapshot)
    }
}
