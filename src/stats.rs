use crate::error::{Result, TrainerError};
use crate::layout::{self, KEY_COUNT, ROWS, SPACE_WIDTH};
use itertools::Itertools;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Result of attributing a mistake to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRecord {
    Recorded,
    /// The symbol is outside the tracked layout; nothing was counted
    UnknownKeyIgnored,
}

/// Cumulative wrong-press counters, one per tracked key, in layout order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyStatistics {
    counts: Vec<u32>,
}

impl Default for KeyStatistics {
    fn default() -> Self {
        Self {
            counts: vec![0; KEY_COUNT],
        }
    }
}

impl KeyStatistics {
    /// Load counters from a file holding one integer per line.
    ///
    /// The number of lines must equal the flattened layout size. Trailing
    /// blank lines are tolerated; anything else malformed is corruption.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| TrainerError::io(path, e))?;
        Self::parse(path, &content)
    }

    /// Like [`KeyStatistics::load`], but a missing file yields zeroed
    /// counters. When `zero_fill_corrupt` is set, a corrupt file is replaced
    /// by zeroed counters as well, with a warning.
    pub fn load_or_default<P: AsRef<Path>>(path: P, zero_fill_corrupt: bool) -> Result<Self> {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(stats) => Ok(stats),
            Err(TrainerError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no key statistics yet, starting from zero");
                Ok(Self::default())
            }
            Err(err @ TrainerError::CorruptStatistics { .. }) if zero_fill_corrupt => {
                tracing::warn!(%err, "zero-filling corrupt key statistics");
                Ok(Self::default())
            }
            Err(err) => Err(err),
        }
    }

    fn parse(path: &Path, content: &str) -> Result<Self> {
        let counts = content
            .trim_end()
            .lines()
            .enumerate()
            .map(|(idx, line)| {
                line.trim().parse::<u32>().map_err(|_| {
                    TrainerError::corrupt_statistics(
                        path,
                        format!("line {}: {:?} is not a non-negative integer", idx + 1, line),
                    )
                })
            })
            .collect::<Result<Vec<u32>>>()?;

        if counts.len() != KEY_COUNT {
            return Err(TrainerError::corrupt_statistics(
                path,
                format!("expected {} counters, found {}", KEY_COUNT, counts.len()),
            ));
        }

        Ok(Self { counts })
    }

    /// Count a wrong press against `symbol`, upper-cased to match the layout
    pub fn record_wrong(&mut self, symbol: char) -> KeyRecord {
        match layout::slot(symbol) {
            Some(idx) => {
                self.counts[idx] = self.counts[idx].saturating_add(1);
                KeyRecord::Recorded
            }
            None => KeyRecord::UnknownKeyIgnored,
        }
    }

    pub fn wrong_count(&self, symbol: char) -> Option<u32> {
        layout::slot(symbol).map(|idx| self.counts[idx])
    }

    pub fn total_wrong(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// Counters paired with their keys, in layout order
    pub fn snapshot(&self) -> Vec<(char, u32)> {
        layout::keys().zip(self.counts.iter().copied()).collect()
    }

    /// Rectangular matrix for heatmap rendering, see [`layout::heatmap_matrix`]
    pub fn heatmap(&self) -> Vec<Vec<u32>> {
        layout::heatmap_matrix(ROWS, |key| self.wrong_count(key).unwrap_or(0), SPACE_WIDTH)
    }

    /// Overwrite `path` with the current counters, one per line.
    ///
    /// The data is written to a sibling file first and renamed into place.
    pub fn flush<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| TrainerError::io(parent, e))?;
        }

        let mut data = self.counts.iter().join("\n");
        data.push('\n');

        let tmp = path.with_extension("tmp");
        fs::write(&tmp, data).map_err(|e| TrainerError::io(&tmp, e))?;
        fs::rename(&tmp, path).map_err(|e| TrainerError::io(path, e))?;

        tracing::debug!(path = %path.display(), total = self.total_wrong(), "flushed key statistics");
        Ok(())
    }
}
