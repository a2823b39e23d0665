use crate::error::{Result, TrainerError};
use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fs;
use std::path::Path;

static CORPUS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/corpus");
const BUNDLED_FILE: &str = "texts.txt";

/// Typographic quotes with no key on a standard keyboard
pub const SMART_QUOTES: [char; 4] = ['\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}'];

pub fn strip_smart_quotes(line: &str) -> String {
    line.chars().filter(|c| !SMART_QUOTES.contains(c)).collect()
}

/// Practice passages, loaded once and never modified
#[derive(Debug, Clone)]
pub struct Corpus {
    passages: Vec<String>,
}

impl Corpus {
    /// One passage per line of a UTF-8 file; blank lines are dropped
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| TrainerError::io(path, e))?;
        Self::from_text(path, &text)
    }

    /// The corpus compiled into the binary
    pub fn bundled() -> Result<Self> {
        let source = Path::new(BUNDLED_FILE);
        let text = CORPUS_DIR
            .get_file(BUNDLED_FILE)
            .and_then(|f| f.contents_utf8())
            .ok_or_else(|| TrainerError::EmptyCorpus {
                path: source.to_path_buf(),
            })?;
        Self::from_text(source, text)
    }

    pub fn from_text(source: &Path, text: &str) -> Result<Self> {
        let passages: Vec<String> = text
            .lines()
            .map(strip_smart_quotes)
            .filter(|line| !line.trim().is_empty())
            .collect();

        if passages.is_empty() {
            return Err(TrainerError::EmptyCorpus {
                path: source.to_path_buf(),
            });
        }

        tracing::debug!(source = %source.display(), passages = passages.len(), "corpus loaded");
        Ok(Self { passages })
    }

    /// A corpus that always yields `passage`, which may be empty
    pub fn single(passage: impl Into<String>) -> Self {
        Self {
            passages: vec![strip_smart_quotes(&passage.into())],
        }
    }

    pub fn passages(&self) -> &[String] {
        &self.passages
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    /// Pick a passage uniformly at random
    pub fn choose(&self) -> &str {
        self.choose_with(&mut rand::thread_rng())
    }

    pub fn choose_with<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        self.passages
            .choose(rng)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn strips_all_four_smart_quotes() {
        let line = "\u{201C}Don\u{2019}t,\u{201D} she said, \u{2018}stop\u{2019}.";
        assert_eq!(strip_smart_quotes(line), "Dont, she said, stop.");
    }

    #[test]
    fn load_drops_blank_lines_and_terminators() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("texts.txt");
        fs::write(&path, "first passage\r\n\n  \nsecond \u{201C}one\u{201D}\n").unwrap();

        let corpus = Corpus::load(&path).unwrap();
        assert_eq!(corpus.passages(), &["first passage", "second one"]);
    }

    #[test]
    fn empty_corpus_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("texts.txt");
        fs::write(&path, "\n\n").unwrap();

        assert_matches!(Corpus::load(&path), Err(TrainerError::EmptyCorpus { .. }));
    }

    #[test]
    fn missing_corpus_is_io_error() {
        let dir = tempdir().unwrap();
        assert_matches!(
            Corpus::load(dir.path().join("nope.txt")),
            Err(TrainerError::Io { .. })
        );
    }

    #[test]
    fn bundled_corpus_is_plain_ascii() {
        let corpus = Corpus::bundled().unwrap();
        assert!(corpus.len() > 5);
        assert!(corpus.passages().iter().all(|p| p.is_ascii()));
    }

    #[test]
    fn choose_returns_a_passage() {
        let corpus = Corpus::bundled().unwrap();
        let picked = corpus.choose();
        assert!(corpus.passages().iter().any(|p| p == picked));
    }

    #[test]
    fn single_passage_may_be_empty() {
        let corpus = Corpus::single("");
        assert_eq!(corpus.choose(), "");
        assert!(!corpus.is_empty());
    }
}
