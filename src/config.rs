use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::definition::DEFAULT_ENDPOINT;
use crate::error::ConfigError;
use crate::session::SessionConfig;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub language: String,
    pub interval_secs: u64,
    pub min_interval_secs: u64,
    pub max_interval_secs: u64,
    pub live_definitions: bool,
    pub definition_endpoint: String,
    pub definition_timeout_secs: u64,
    /// Read word lists from here instead of the bundled ones
    pub word_dir: Option<PathBuf>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "AZ".to_string(),
            interval_secs: 5,
            min_interval_secs: 1,
            max_interval_secs: 60,
            live_definitions: true,
            definition_endpoint: DEFAULT_ENDPOINT.to_string(),
            definition_timeout_secs: 5,
            word_dir: None,
            log_level: "info".to_string(),
        }
    }
}

impl From<&Config> for SessionConfig {
    fn from(cfg: &Config) -> Self {
        let min = cfg.min_interval_secs.max(1);
        let max = cfg.max_interval_secs.max(min);
        Self {
            interval_secs: cfg.interval_secs.clamp(min, max),
            min_interval_secs: min,
            max_interval_secs: max,
            live_definitions: cfg.live_definitions,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Result<Config, ConfigError>;
    fn save(&self, cfg: &Config) -> Result<(), ConfigError>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "wordflow") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("wordflow_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FileConfigStore {
    fn write(&self, cfg: &Config) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}

impl ConfigStore for FileConfigStore {
    /// A missing or unreadable file gives defaults; a malformed one is an error
    fn load(&self) -> Result<Config, ConfigError> {
        let Ok(bytes) = fs::read(&self.path) else {
            return Ok(Config::default());
        };
        serde_json::from_slice::<Config>(&bytes).map_err(|source| ConfigError::Malformed {
            path: self.path.display().to_string(),
            source,
        })
    }

    fn save(&self, cfg: &Config) -> Result<(), ConfigError> {
        self.write(cfg).map_err(|source| ConfigError::Write {
            path: self.path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("config.json"));
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        assert_eq!(cfg, store.load().unwrap());
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("nested").join("config.json"));
        let cfg = Config {
            language: "EN".into(),
            interval_secs: 12,
            live_definitions: false,
            word_dir: Some(PathBuf::from("/srv/words")),
            log_level: "debug".into(),
            ..Config::default()
        };
        store.save(&cfg).unwrap();
        assert_eq!(cfg, store.load().unwrap());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("absent.json"));
        assert_eq!(store.load().unwrap(), Config::default());
    }

    #[test]
    fn malformed_file_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = FileConfigStore::with_path(&path).load().unwrap_err();
        assert_matches!(err, ConfigError::Malformed { .. });
        assert!(err.to_string().contains("config.json"));
    }

    #[test]
    fn save_into_a_file_path_fails() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();

        let store = FileConfigStore::with_path(blocker.join("config.json"));
        assert_matches!(store.save(&Config::default()), Err(ConfigError::Write { .. }));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"language": "EN", "interval_secs": 9}"#).unwrap();

        let cfg = FileConfigStore::with_path(&path).load().unwrap();
        assert_eq!(cfg.language, "EN");
        assert_eq!(cfg.interval_secs, 9);
        assert_eq!(cfg.max_interval_secs, 60);
        assert!(cfg.live_definitions);
    }

    #[test]
    fn session_config_sanitizes_bounds() {
        let cfg = Config {
            interval_secs: 500,
            min_interval_secs: 0,
            max_interval_secs: 30,
            ..Config::default()
        };
        let session = SessionConfig::from(&cfg);
        assert_eq!(session.min_interval_secs, 1);
        assert_eq!(session.max_interval_secs, 30);
        assert_eq!(session.interval_secs, 30);
    }
}
