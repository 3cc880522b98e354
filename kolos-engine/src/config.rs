//! Engine configuration
//!
//! Layered with figment, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. `kolos.toml` in the config directory
//! 3. `kolos.yaml` in the config directory
//! 4. `KOLOS_*` environment variables, `__` separating nested keys
//!    (`KOLOS_REORDER__DISTANCE_OFFSET=30`)

use crate::defaults::{
    DEFAULT_BOARD_NAME, DEFAULT_SEED_COMMENT, DEFAULT_SEED_TASK, DEFAULT_THEME,
};
use crate::error::{KolosError, Result};
use crate::reorder::DISTANCE_OFFSET;
use crate::store::{FileStore, MemoryStore, Store};
use figment::providers::{Env, Format, Serialized, Toml, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Config file names searched in the config directory
pub const CONFIG_FILE_NAMES: [&str; 2] = ["kolos.toml", "kolos.yaml"];

/// Environment variable prefix
pub const ENV_PREFIX: &str = "KOLOS_";

/// Which persistence backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Memory,
    #[default]
    File,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Root directory for the file backend
    pub root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            root: PathBuf::from(".kolos"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReorderConfig {
    /// Vertical bias added to each indicator's top edge
    pub distance_offset: f64,
}

impl Default for ReorderConfig {
    fn default() -> Self {
        Self {
            distance_offset: DISTANCE_OFFSET,
        }
    }
}

/// What a new team starts with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamDefaults {
    pub board_name: String,
    pub seed_task: String,
    pub seed_comment: String,
    pub theme: String,
}

impl Default for TeamDefaults {
    fn default() -> Self {
        Self {
            board_name: DEFAULT_BOARD_NAME.to_string(),
            seed_task: DEFAULT_SEED_TASK.to_string(),
            seed_comment: DEFAULT_SEED_COMMENT.to_string(),
            theme: DEFAULT_THEME.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KolosConfig {
    pub storage: StorageConfig,
    pub reorder: ReorderConfig,
    pub defaults: TeamDefaults,
    pub log: LogConfig,
}

impl KolosConfig {
    /// Build the layered figment for a config directory
    pub fn figment(dir: impl AsRef<Path>) -> Figment {
        let dir = dir.as_ref();
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(dir.join(CONFIG_FILE_NAMES[0])))
            .merge(Yaml::file(dir.join(CONFIG_FILE_NAMES[1])))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load from the current working directory
    pub fn load() -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Self::load_from(cwd)
    }

    /// Load from a specific config directory
    pub fn load_from(dir: impl AsRef<Path>) -> Result<Self> {
        Self::extract(Self::figment(dir))
    }

    /// Load from one explicit file (TOML or YAML by extension), env still applies
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(KolosError::not_found("config file", path.display()));
        }

        let base = Figment::from(Serialized::defaults(Self::default()));
        let figment = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => base.merge(Yaml::file(path)),
            _ => base.merge(Toml::file(path)),
        };
        Self::extract(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    fn extract(figment: Figment) -> Result<Self> {
        let config: Self = figment
            .extract()
            .map_err(|e| KolosError::invalid_value("config", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        if !self.reorder.distance_offset.is_finite() {
            return Err(KolosError::invalid_value(
                "reorder.distance_offset",
                "must be a finite number",
            ));
        }
        if self.defaults.board_name.trim().is_empty() {
            return Err(KolosError::invalid_value(
                "defaults.board_name",
                "must not be empty",
            ));
        }
        Ok(())
    }

    /// Open the configured store
    pub async fn open_store(&self) -> Result<Arc<dyn Store>> {
        Ok(match self.storage.backend {
            StorageBackend::Memory => Arc::new(MemoryStore::new()),
            StorageBackend::File => Arc::new(FileStore::open(&self.storage.root).await?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    #[serial]
    fn test_defaults() {
        let temp = TempDir::new().unwrap();
        let config = KolosConfig::load_from(temp.path()).unwrap();
        assert_eq!(config, KolosConfig::default());
        assert_eq!(config.reorder.distance_offset, 50.0);
        assert_eq!(config.defaults.board_name, "Kolos 1");
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.storage.root, PathBuf::from(".kolos"));
    }

    #[test]
    #[serial]
    fn test_toml_file_overrides_defaults() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("kolos.toml"),
            "[reorder]\ndistance_offset = 20.0\n\n[defaults]\nboard_name = \"Sprint\"\n",
        )
        .unwrap();

        let config = KolosConfig::load_from(temp.path()).unwrap();
        assert_eq!(config.reorder.distance_offset, 20.0);
        assert_eq!(config.defaults.board_name, "Sprint");
        assert_eq!(config.log.level, "info");
    }

    #[test]
    #[serial]
    fn test_yaml_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.yaml");
        std::fs::write(&path, "storage:\n  backend: memory\n").unwrap();

        let config = KolosConfig::load_file(&path).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("kolos.toml"),
            "[reorder]\ndistance_offset = 20.0\n",
        )
        .unwrap();

        std::env::set_var("KOLOS_REORDER__DISTANCE_OFFSET", "35");
        let config = KolosConfig::load_from(temp.path());
        std::env::remove_var("KOLOS_REORDER__DISTANCE_OFFSET");

        assert_eq!(config.unwrap().reorder.distance_offset, 35.0);
    }

    #[test]
    #[serial]
    fn test_empty_board_name_rejected() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("kolos.toml"),
            "[defaults]\nboard_name = \"  \"\n",
        )
        .unwrap();

        let result = KolosConfig::load_from(temp.path());
        assert!(matches!(result, Err(KolosError::InvalidValue { .. })));
    }

    #[test]
    #[serial]
    fn test_missing_explicit_file() {
        let result = KolosConfig::load_file("/nonexistent/kolos.toml");
        assert!(matches!(result, Err(KolosError::NotFound { .. })));
    }
}
