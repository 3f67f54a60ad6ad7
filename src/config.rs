//! Engine configuration.
//!
//! Loaded from an optional `narrative.toml`; every field has a default so a
//! missing file or a partial table is fine. Two environment variables take
//! precedence over the file: `NARRATIVE_DATA_DIR` and `NARRATIVE_LOG`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::LoadError;

pub const DATA_DIR_ENV: &str = "NARRATIVE_DATA_DIR";
pub const LOG_FILTER_ENV: &str = "NARRATIVE_LOG";

/// Tunables shared by the content store and both engines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Root of the content tree (`items/`, `quests/`, `dialogues/`, `npcs/`)
    pub data_dir: PathBuf,
    /// Lines kept in a conversation's history before the oldest are dropped
    pub history_limit: usize,
    /// Entries kept in the quest log
    pub quest_log_limit: usize,
    /// Typewriter reveal speed; zero shows node text at once
    pub typing_ms_per_char: u64,
    /// Slot count for the bundled backpack
    pub inventory_slots: usize,
    /// Node-entry responses may chain jumps; this caps the chain
    pub max_auto_jumps: usize,
    /// Default `tracing` filter directive
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            history_limit: 64,
            quest_log_limit: 50,
            typing_ms_per_char: 30,
            inventory_slots: 20,
            max_auto_jumps: 16,
            log_filter: "narrative_engine=info".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration table. Missing keys keep their defaults.
    pub fn from_toml(source: &str) -> Result<Self, LoadError> {
        toml::from_str(source).map_err(|source| LoadError::Toml {
            path: PathBuf::from("<inline>"),
            source,
        })
    }

    /// Read a configuration file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        if !path.exists() {
            info!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| LoadError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read a configuration file and apply process environment overrides.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        Ok(Self::from_file(path)?.with_env_overrides())
    }

    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup (the environment in practice).
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(filter) = lookup(LOG_FILTER_ENV).filter(|v| !v.trim().is_empty()) {
            self.log_filter = filter;
        }
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        if limit == 0 {
            warn!("history_limit of 0 would drop every line, using 1");
        }
        self.history_limit = limit.max(1);
        self
    }

    pub fn with_quest_log_limit(mut self, limit: usize) -> Self {
        self.quest_log_limit = limit;
        self
    }

    pub fn with_typing_speed(mut self, ms_per_char: u64) -> Self {
        self.typing_ms_per_char = ms_per_char;
        self
    }

    pub fn with_inventory_slots(mut self, slots: usize) -> Self {
        self.inventory_slots = slots;
        self
    }

    pub fn with_max_auto_jumps(mut self, jumps: usize) -> Self {
        self.max_auto_jumps = jumps;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.history_limit, 64);
        assert_eq!(config.typing_ms_per_char, 30);
        assert_eq!(config.inventory_slots, 20);
        assert_eq!(config.log_filter, "narrative_engine=info");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml("history_limit = 8\ntyping_ms_per_char = 0\n").unwrap();
        assert_eq!(config.history_limit, 8);
        assert_eq!(config.typing_ms_per_char, 0);
        assert_eq!(config.quest_log_limit, 50);
        assert_eq!(config.max_auto_jumps, 16);
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        let result = EngineConfig::from_toml("history_limit = \"lots\"");
        assert!(matches!(result, Err(LoadError::Toml { .. })));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = EngineConfig::from_file(&temp.path().join("narrative.toml")).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_file_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("narrative.toml");
        std::fs::write(&path, "data_dir = \"content\"\ninventory_slots = 12\n").unwrap();

        let config = EngineConfig::from_file(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("content"));
        assert_eq!(config.inventory_slots, 12);
    }

    #[test]
    fn test_overrides_win_over_file() {
        let env: HashMap<&str, &str> = [
            (DATA_DIR_ENV, "/srv/narrative"),
            (LOG_FILTER_ENV, "narrative_engine=debug"),
        ]
        .into_iter()
        .collect();

        let config = EngineConfig::default()
            .with_data_dir("elsewhere")
            .with_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.data_dir, PathBuf::from("/srv/narrative"));
        assert_eq!(config.log_filter, "narrative_engine=debug");
    }

    #[test]
    fn test_blank_override_is_ignored() {
        let config = EngineConfig::default().with_overrides(|_| Some("  ".to_string()));
        assert_eq!(config.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::new()
            .with_history_limit(0)
            .with_typing_speed(5)
            .with_max_auto_jumps(2);
        assert_eq!(config.history_limit, 1);
        assert_eq!(config.typing_ms_per_char, 5);
        assert_eq!(config.max_auto_jumps, 2);
    }
}
