//! Runtime configuration
//!
//! Layered with figment: built-in defaults, then an optional TOML file,
//! then `DELVE_` environment variables.

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "delve.toml";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// tracing-subscriber filter directives; RUST_LOG wins when set
    pub log_filter: String,
    pub log_format: LogFormat,
    /// Fixed seed for reproducible runs
    pub seed: Option<u64>,
    /// Denizen and loot tier for generated fights
    pub tier: u8,
    /// JSON file overriding the built-in tables
    pub tables: Option<PathBuf>,
    pub snapshot_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: "delve=info".to_string(),
            log_format: LogFormat::Pretty,
            seed: None,
            tier: 1,
            tables: None,
            snapshot_dir: PathBuf::from("saves"),
        }
    }
}

impl Config {
    /// Layered figment with `file` (or `delve.toml`) in the middle
    pub fn figment(file: Option<&Path>) -> Figment {
        let file = file.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed("DELVE_"))
    }

    pub fn load(file: Option<&Path>) -> Result<Self, figment::Error> {
        Self::figment(file).extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults_without_file() {
        Jail::expect_with(|_jail| {
            let config = Config::load(None)?;
            assert_eq!(config, Config::default());
            assert_eq!(config.tier, 1);
            Ok(())
        });
    }

    #[test]
    fn test_file_then_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "delve.toml",
                r#"
                seed = 42
                tier = 2
                log_format = "json"
                "#,
            )?;
            jail.set_env("DELVE_TIER", "3");

            let config = Config::load(None)?;
            assert_eq!(config.seed, Some(42));
            assert_eq!(config.tier, 3);
            assert_eq!(config.log_format, LogFormat::Json);
            assert_eq!(config.snapshot_dir, PathBuf::from("saves"));
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "tables = \"my-tables.json\"")?;
            let config = Config::load(Some(Path::new("custom.toml")))?;
            assert_eq!(config.tables, Some(PathBuf::from("my-tables.json")));
            Ok(())
        });
    }
}
