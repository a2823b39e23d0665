use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Passage file to practice on; the bundled corpus when unset
    pub corpus_path: Option<PathBuf>,
    /// Directory holding key statistics, history and the log
    pub data_dir: Option<PathBuf>,
    /// Replace a corrupt key statistics file with zeros instead of refusing to start
    pub zero_fill_corrupt_stats: bool,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corpus_path: None,
            data_dir: None,
            zero_fill_corrupt_stats: false,
            log_level: "info".to_string(),
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "keyout") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("keyout_config.json")
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

    /// Load the config, writing the defaults out first when no file exists yet
    pub fn load_or_init(&self) -> Config {
        if !self.path.exists() {
            let cfg = Config::default();
            match self.save(&cfg) {
                Ok(()) => tracing::info!(path = %self.path.display(), "wrote default config"),
                Err(err) => {
                    tracing::warn!(path = %self.path.display(), %err, "could not write default config")
                }
            }
            return cfg;
        }
        self.load()
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(err) => {
                    tracing::warn!(path = %self.path.display(), %err, "ignoring unreadable config")
                }
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            corpus_path: Some(PathBuf::from("/tmp/texts.txt")),
            data_dir: Some(PathBuf::from("/tmp/keyout")),
            zero_fill_corrupt_stats: true,
            log_level: "debug".into(),
        };
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "zero_fill_corrupt_stats": true }"#).unwrap();

        let loaded = FileConfigStore::with_path(&path).load();
        assert!(loaded.zero_fill_corrupt_stats);
        assert_eq!(loaded.log_level, "info");
        assert_eq!(loaded.corpus_path, None);
    }

    #[test]
    fn first_run_writes_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keyout").join("config.json");
        let store = FileConfigStore::with_path(&path);

        assert_eq!(store.load_or_init(), Config::default());
        assert!(path.is_file());
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn existing_config_is_not_overwritten() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "log_level": "debug" }"#).unwrap();

        let loaded = FileConfigStore::with_path(&path).load_or_init();
        assert_eq!(loaded.log_level, "debug");
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{ "log_level": "debug" }"#);
    }

    #[test]
    fn garbage_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();

        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());
    }
}
