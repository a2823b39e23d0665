//! Error types shared by the trainer's persistence and loading code.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures surfaced while loading or persisting trainer data.
///
/// Unknown keys pressed during a round are not represented here: they are a
/// deliberate no-op, see [`crate::stats::KeyRecord::UnknownKeyIgnored`].
#[derive(Error, Debug)]
pub enum TrainerError {
    /// The wrong-key data file has the wrong length or non-integer content
    #[error("corrupt key statistics in {}: {detail}", path.display())]
    CorruptStatistics { path: PathBuf, detail: String },

    /// A history line could not be parsed back into a summary
    #[error("corrupt session history at line {line}: {detail}")]
    CorruptHistory { line: u64, detail: String },

    /// The corpus contained no usable passage
    #[error("corpus {} contains no passages", path.display())]
    EmptyCorpus { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("history log error: {0}")]
    Csv(#[from] csv::Error),
}

impl TrainerError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn corrupt_statistics(path: impl AsRef<Path>, detail: impl Into<String>) -> Self {
        Self::CorruptStatistics {
            path: path.as_ref().to_path_buf(),
            detail: detail.into(),
        }
    }

    pub fn corrupt_history(line: u64, detail: impl Into<String>) -> Self {
        Self::CorruptHistory {
            line,
            detail: detail.into(),
        }
    }

    /// Load-time corruption that must stop a session from starting
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::CorruptStatistics { .. } | Self::CorruptHistory { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, TrainerError>;
