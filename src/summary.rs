//! End-of-round metrics and the append-only session history log.
//!
//! Each history line is `speed;wrong_count;accuracy;HH:MM;MM/DD/YY`. The
//! timestamp keeps its historical "time;date" shape, so it spans the last two
//! `;`-separated columns. Field order and delimiter are a durable contract.

use crate::error::{Result, TrainerError};
use crate::util::{mean, round_to, std_dev};
use chrono::{Local, NaiveDateTime, Timelike};
use csv::{QuoteStyle, ReaderBuilder, StringRecord, StringRecordsIntoIter, WriterBuilder};
use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

pub const TIME_FORMAT: &str = "%H:%M";
pub const DATE_FORMAT: &str = "%m/%d/%y";
const FIELD_COUNT: usize = 5;

/// Accuracy percentage: `round(1 - wrong/events, 3) * 100`.
///
/// Every processed keystroke counts towards `events`, including repeated
/// misses at the same position. A round without keystrokes is 100%.
pub fn accuracy(wrong_count: u32, event_count: usize) -> f64 {
    if event_count == 0 {
        return 100.0;
    }
    let ratio = round_to(1.0 - wrong_count as f64 / event_count as f64, 3);
    // ratio has at most three decimals, so one decimal of percentage is exact
    round_to(ratio * 100.0, 1)
}

/// Finalized metrics of one completed round
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    /// Characters per second at completion
    pub speed: f64,
    pub wrong_count: u32,
    pub accuracy: f64,
    /// Local completion time, minute precision
    pub recorded_at: NaiveDateTime,
}

impl SessionSummary {
    pub fn new(speed: f64, wrong_count: u32, event_count: usize, recorded_at: NaiveDateTime) -> Self {
        Self {
            speed,
            wrong_count,
            accuracy: accuracy(wrong_count, event_count),
            recorded_at: truncate_to_minute(recorded_at),
        }
    }

    pub fn completed_now(speed: f64, wrong_count: u32, event_count: usize) -> Self {
        Self::new(speed, wrong_count, event_count, Local::now().naive_local())
    }

    pub fn time_label(&self) -> String {
        self.recorded_at.format(TIME_FORMAT).to_string()
    }

    pub fn date_label(&self) -> String {
        self.recorded_at.format(DATE_FORMAT).to_string()
    }

    fn to_record(&self) -> [String; FIELD_COUNT] {
        [
            format!("{:.3}", self.speed),
            self.wrong_count.to_string(),
            format!("{:.1}", self.accuracy),
            self.time_label(),
            self.date_label(),
        ]
    }

    fn from_record(record: &StringRecord) -> Result<Self> {
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        if record.len() != FIELD_COUNT {
            return Err(TrainerError::corrupt_history(
                line,
                format!("expected {} fields, found {}", FIELD_COUNT, record.len()),
            ));
        }

        let field = |idx: usize| record[idx].trim();
        let speed = field(0)
            .parse::<f64>()
            .map_err(|_| TrainerError::corrupt_history(line, format!("bad speed {:?}", field(0))))?;
        let wrong_count = field(1).parse::<u32>().map_err(|_| {
            TrainerError::corrupt_history(line, format!("bad wrong count {:?}", field(1)))
        })?;
        let accuracy = field(2).parse::<f64>().map_err(|_| {
            TrainerError::corrupt_history(line, format!("bad accuracy {:?}", field(2)))
        })?;
        let stamp = format!("{} {}", field(4), field(3));
        let recorded_at =
            NaiveDateTime::parse_from_str(&stamp, &format!("{} {}", DATE_FORMAT, TIME_FORMAT))
                .map_err(|_| {
                    TrainerError::corrupt_history(line, format!("bad timestamp {:?}", stamp))
                })?;

        Ok(Self {
            speed,
            wrong_count,
            accuracy,
            recorded_at,
        })
    }
}

fn truncate_to_minute(t: NaiveDateTime) -> NaiveDateTime {
    t.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(t)
}

/// The session history file
#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one newline-terminated line for `summary`
    pub fn append(&self, summary: &SessionSummary) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| TrainerError::io(parent, e))?;
        }

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| TrainerError::io(&self.path, e))?;

        // a hand-edited log may have lost its final newline
        if missing_final_newline(&mut file).map_err(|e| TrainerError::io(&self.path, e))? {
            file.write_all(b"\n")
                .map_err(|e| TrainerError::io(&self.path, e))?;
        }

        let mut writer = WriterBuilder::new()
            .delimiter(b';')
            .has_headers(false)
            .quote_style(QuoteStyle::Never)
            .from_writer(file);
        writer.write_record(summary.to_record())?;
        writer.flush().map_err(|e| TrainerError::io(&self.path, e))?;

        tracing::info!(
            speed = summary.speed,
            wrong = summary.wrong_count,
            accuracy = summary.accuracy,
            "session appended to history"
        );
        Ok(())
    }

    /// Lazily parse every recorded session in append order.
    ///
    /// Blank lines are skipped. A malformed line yields
    /// [`TrainerError::CorruptHistory`] and iteration may continue past it.
    /// A missing file lists as empty.
    pub fn list_all(&self) -> Result<HistoryEntries> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HistoryEntries { records: None }),
            Err(e) => return Err(TrainerError::io(&self.path, e)),
        };

        let records = ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(file)
            .into_records();

        Ok(HistoryEntries {
            records: Some(records),
        })
    }

    /// All readable sessions, skipping corrupt lines with a warning.
    /// Returns the sessions and the number of skipped lines.
    pub fn load_for_browsing(&self) -> Result<(Vec<SessionSummary>, usize)> {
        let mut sessions = Vec::new();
        let mut skipped = 0;
        for entry in self.list_all()? {
            match entry {
                Ok(summary) => sessions.push(summary),
                Err(err @ TrainerError::CorruptHistory { .. }) => {
                    tracing::warn!(%err, "skipping history line");
                    skipped += 1;
                }
                Err(err) => return Err(err),
            }
        }
        Ok((sessions, skipped))
    }
}

fn missing_final_newline(file: &mut File) -> io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// Iterator returned by [`HistoryLog::list_all`]
pub struct HistoryEntries {
    records: Option<StringRecordsIntoIter<File>>,
}

impl Iterator for HistoryEntries {
    type Item = Result<SessionSummary>;

    fn next(&mut self) -> Option<Self::Item> {
        let records = self.records.as_mut()?;
        loop {
            let record = match records.next()? {
                Ok(record) => record,
                Err(e) => {
                    // a line that is not UTF-8 is corrupt; the reader has already moved past it
                    if let csv::ErrorKind::Utf8 { pos, err } = e.kind() {
                        let line = pos.as_ref().map(|p| p.line()).unwrap_or(0);
                        return Some(Err(TrainerError::corrupt_history(
                            line,
                            format!("invalid UTF-8: {err}"),
                        )));
                    }
                    return Some(Err(e.into()));
                }
            };
            if record.iter().all(|f| f.trim().is_empty()) {
                continue;
            }
            return Some(SessionSummary::from_record(&record));
        }
    }
}

/// Aggregates shown above the history list
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryStats {
    pub sessions: usize,
    pub mean_speed: f64,
    pub best_speed: f64,
    pub speed_std_dev: f64,
    pub mean_accuracy: f64,
}

impl HistoryStats {
    pub fn from_sessions(sessions: &[SessionSummary]) -> Option<Self> {
        let speeds: Vec<f64> = sessions.iter().map(|s| s.speed).collect();
        let accuracies: Vec<f64> = sessions.iter().map(|s| s.accuracy).collect();

        Some(Self {
            sessions: sessions.len(),
            mean_speed: mean(&speeds)?,
            best_speed: speeds.iter().copied().fold(f64::MIN, f64::max),
            speed_std_dev: std_dev(&speeds)?,
            mean_accuracy: mean(&accuracies)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(h, m, 42)
            .unwrap()
    }

    #[test]
    fn accuracy_matches_formula() {
        assert_eq!(accuracy(1, 4), 75.0);
        assert_eq!(accuracy(0, 10), 100.0);
        assert_eq!(accuracy(1, 3), 66.7);
        assert_eq!(accuracy(5, 5), 0.0);
        assert_eq!(accuracy(0, 0), 100.0);
    }

    #[test]
    fn summary_truncates_to_minute() {
        let s = SessionSummary::new(3.5, 1, 4, at(9, 5));
        assert_eq!(s.recorded_at.second(), 0);
        assert_eq!(s.time_label(), "09:05");
        assert_eq!(s.date_label(), "10/19/26");
    }

    #[test]
    fn append_writes_semicolon_line() {
        let dir = tempdir().unwrap();
        let log = HistoryLog::new(dir.path().join("stats.txt"));
        log.append(&SessionSummary::new(2.5, 1, 4, at(14, 30))).unwrap();

        let content = fs::read_to_string(log.path()).unwrap();
        assert_eq!(content, "2.500;1;75.0;14:30;10/19/26\n");
    }

    #[test]
    fn history_round_trips_in_append_order() {
        let dir = tempdir().unwrap();
        let log = HistoryLog::new(dir.path().join("data").join("stats.txt"));
        let written = vec![
            SessionSummary::new(1.25, 3, 12, at(8, 0)),
            SessionSummary::new(4.0, 0, 20, at(12, 15)),
            SessionSummary::new(2.125, 7, 30, at(23, 59)),
        ];
        for s in &written {
            log.append(s).unwrap();
        }

        let read: Vec<SessionSummary> = log.list_all().unwrap().map(|r| r.unwrap()).collect();
        assert_eq!(read, written);
    }

    #[test]
    fn missing_history_is_empty() {
        let dir = tempdir().unwrap();
        let log = HistoryLog::new(dir.path().join("stats.txt"));
        assert_eq!(log.list_all().unwrap().count(), 0);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let dir = tempdir().unwrap();
        let log = HistoryLog::new(dir.path().join("stats.txt"));
        fs::write(log.path(), "3.0;0;100.0;10:00;01/02/26\n\n\n").unwrap();

        let read: Vec<_> = log.list_all().unwrap().collect();
        assert_eq!(read.len(), 1);
        assert!(read[0].is_ok());
    }

    #[test]
    fn reads_lines_written_by_older_versions() {
        let dir = tempdir().unwrap();
        let log = HistoryLog::new(dir.path().join("stats.txt"));
        fs::write(log.path(), "4.123;2;97.39999999999999;18:07;03/14/24\n").unwrap();

        let s = log.list_all().unwrap().next().unwrap().unwrap();
        assert_eq!(s.speed, 4.123);
        assert_eq!(s.wrong_count, 2);
        assert_eq!(s.time_label(), "18:07");
        assert_eq!(s.date_label(), "03/14/24");
    }

    #[test]
    fn malformed_line_is_reported_with_line_number() {
        let dir = tempdir().unwrap();
        let log = HistoryLog::new(dir.path().join("stats.txt"));
        fs::write(
            log.path(),
            "3.0;0;100.0;10:00;01/02/26\n3.0;0;100.0\n2.0;1;90.0;11:00;01/02/26\n",
        )
        .unwrap();

        let read: Vec<_> = log.list_all().unwrap().collect();
        assert_eq!(read.len(), 3);
        assert!(read[0].is_ok());
        assert_matches!(&read[1], Err(TrainerError::CorruptHistory { line: 2, .. }));
        assert!(read[2].is_ok());
    }

    #[test]
    fn browsing_skips_corrupt_lines() {
        let dir = tempdir().unwrap();
        let log = HistoryLog::new(dir.path().join("stats.txt"));
        fs::write(
            log.path(),
            "fast;0;100.0;10:00;01/02/26\n2.0;1;90.0;11:00;01/02/26\n",
        )
        .unwrap();

        let (sessions, skipped) = log.load_for_browsing().unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(skipped, 1);
        assert_eq!(sessions[0].wrong_count, 1);
    }

    #[test]
    fn invalid_utf8_line_is_skipped_for_browsing() {
        let dir = tempdir().unwrap();
        let log = HistoryLog::new(dir.path().join("stats.txt"));
        fs::write(
            log.path(),
            b"3.0;0;100.0;10:00;01/02/26\n2.0;1;\xff\xfe;11:00;01/02/26\n4.0;0;100.0;12:00;01/02/26\n",
        )
        .unwrap();

        let read: Vec<_> = log.list_all().unwrap().collect();
        assert_eq!(read.len(), 3);
        assert_matches!(&read[1], Err(TrainerError::CorruptHistory { line: 2, .. }));

        let (sessions, skipped) = log.load_for_browsing().unwrap();
        assert_eq!(skipped, 1);
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[1].speed, 4.0);
    }

    #[test]
    fn append_after_unterminated_line_starts_a_new_line() {
        let dir = tempdir().unwrap();
        let log = HistoryLog::new(dir.path().join("stats.txt"));
        fs::write(log.path(), "3.000;0;100.0;10:00;01/02/26").unwrap();

        log.append(&SessionSummary::new(2.0, 0, 10, at(11, 0))).unwrap();

        let content = fs::read_to_string(log.path()).unwrap();
        assert_eq!(
            content,
            "3.000;0;100.0;10:00;01/02/26\n2.000;0;100.0;11:00;10/19/26\n"
        );
        let (sessions, skipped) = log.load_for_browsing().unwrap();
        assert_eq!((sessions.len(), skipped), (2, 0));
    }

    #[test]
    fn history_stats_aggregate() {
        let sessions = vec![
            SessionSummary::new(2.0, 0, 10, at(8, 0)),
            SessionSummary::new(4.0, 5, 10, at(9, 0)),
        ];
        let stats = HistoryStats::from_sessions(&sessions).unwrap();
        assert_eq!(stats.sessions, 2);
        assert_eq!(stats.mean_speed, 3.0);
        assert_eq!(stats.best_speed, 4.0);
        assert_eq!(stats.speed_std_dev, 1.0);
        assert_eq!(stats.mean_accuracy, 75.0);
        assert!(HistoryStats::from_sessions(&[]).is_none());
    }
}
