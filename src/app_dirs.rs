use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub const KEY_STATS_FILE: &str = "wrong_key_data.txt";
pub const HISTORY_FILE: &str = "stats.txt";
pub const LOG_FILE: &str = "keyout.log";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// `$HOME/.local/state/keyout`, or the platform data directory without a HOME
    pub fn data_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join("keyout"),
            )
        } else {
            ProjectDirs::from("", "", "keyout").map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }
}

/// Locations of every file the trainer reads or writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub dir: PathBuf,
    pub key_stats: PathBuf,
    pub history: PathBuf,
    pub log: PathBuf,
}

impl DataPaths {
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref().to_path_buf();
        Self {
            key_stats: dir.join(KEY_STATS_FILE),
            history: dir.join(HISTORY_FILE),
            log: dir.join(LOG_FILE),
            dir,
        }
    }

    /// `override_dir` if given, otherwise [`AppDirs::data_dir`], otherwise `./data`
    pub fn resolve(override_dir: Option<&Path>) -> Self {
        match override_dir {
            Some(dir) => Self::in_dir(dir),
            None => Self::in_dir(AppDirs::data_dir().unwrap_or_else(|| PathBuf::from("data"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_live_in_one_directory() {
        let paths = DataPaths::in_dir("/tmp/keyout");
        assert_eq!(paths.key_stats, PathBuf::from("/tmp/keyout/wrong_key_data.txt"));
        assert_eq!(paths.history, PathBuf::from("/tmp/keyout/stats.txt"));
        assert_eq!(paths.log, PathBuf::from("/tmp/keyout/keyout.log"));
    }

    #[test]
    fn override_wins() {
        let paths = DataPaths::resolve(Some(Path::new("custom")));
        assert_eq!(paths.dir, PathBuf::from("custom"));
    }
}
