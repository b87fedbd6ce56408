//! Run leaderboard
//!
//! Every finished run is appended to `leaderboard.json`. The legacy
//! `best_time` field is kept alongside the runs so older readers still work.
//! A file that cannot be parsed is moved aside to `leaderboard.json.bak`
//! and the board starts fresh.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::consts::{LEADERBOARD_KEY, RECORD_EPSILON};
use crate::error::StoreError;
use crate::persistence::{self, Storage};

/// Name used when a run has none
pub const DEFAULT_RUN_NAME: &str = "Player";

/// A single finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Run duration in seconds (`None` if the stored entry had no usable time)
    pub time: Option<f64>,
    /// Local timestamp, `YYYY-MM-DD HH:MM:SS`
    pub date: String,
    pub name: String,
}

impl RunRecord {
    /// Read one stored run, tolerating missing fields. Non-objects are rejected.
    fn from_json(doc: &Value) -> Option<Self> {
        let map = doc.as_object()?;
        Some(Self {
            time: map.get("time").and_then(Value::as_f64),
            date: map
                .get("date")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            name: map
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or(DEFAULT_RUN_NAME)
                .to_string(),
        })
    }

    /// Time used for ordering; missing times sort last
    pub fn sort_time(&self) -> f64 {
        self.time.unwrap_or(f64::INFINITY)
    }
}

/// Result of recording a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordOutcome {
    pub is_new_record: bool,
    pub best_time: f64,
}

/// Leaderboard ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Newest date first
    #[default]
    Recent,
    /// Fastest time first
    Best,
}

impl SortMode {
    pub fn toggle(&self) -> Self {
        match self {
            SortMode::Recent => SortMode::Best,
            SortMode::Best => SortMode::Recent,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortMode::Recent => "Recent",
            SortMode::Best => "Best Times",
        }
    }
}

/// All recorded runs plus the cached best time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub runs: Vec<RunRecord>,
    pub best_time: Option<f64>,
}

impl Leaderboard {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a leaderboard from a parsed document, repairing bad fields.
    ///
    /// Returns `None` when the document is not an object.
    pub fn from_json(doc: &Value) -> Option<Self> {
        let map = doc.as_object()?;
        let runs = match map.get("runs") {
            Some(Value::Array(items)) => {
                let runs: Vec<RunRecord> = items.iter().filter_map(RunRecord::from_json).collect();
                if runs.len() != items.len() {
                    log::warn!("Skipped {} malformed runs", items.len() - runs.len());
                }
                runs
            }
            _ => Vec::new(),
        };
        let best_time = map.get("best_time").and_then(Value::as_f64);
        Some(Self { runs, best_time })
    }

    /// Load the leaderboard; a corrupted document is quarantined and replaced by an empty board
    pub fn load(storage: &dyn Storage) -> Self {
        let raw = match storage.read(LEADERBOARD_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                log::info!("No leaderboard found, starting fresh");
                return Self::new();
            }
            Err(e @ StoreError::NotText { .. }) => {
                log::warn!("{}", e);
                return Self::quarantine(storage);
            }
            Err(e) => {
                log::warn!("Could not read leaderboard ({}), starting fresh", e);
                return Self::new();
            }
        };

        let parsed = serde_json::from_str::<Value>(&raw)
            .ok()
            .and_then(|doc| Self::from_json(&doc));
        match parsed {
            Some(board) => {
                log::info!("Loaded {} runs", board.runs.len());
                board
            }
            None => Self::quarantine(storage),
        }
    }

    /// Move the stored document aside and start over
    fn quarantine(storage: &dyn Storage) -> Self {
        log::warn!("Leaderboard is corrupted, moving it aside");
        if let Err(e) = storage.quarantine(LEADERBOARD_KEY) {
            log::warn!("Could not back up corrupted leaderboard: {}", e);
        }
        Self::new()
    }

    /// Write the whole leaderboard
    pub fn save(&self, storage: &dyn Storage) -> Result<(), StoreError> {
        persistence::write_json(storage, LEADERBOARD_KEY, self)?;
        log::info!("Leaderboard saved ({} runs)", self.runs.len());
        Ok(())
    }

    /// Whether `time` would beat the stored best time
    pub fn is_new_record(&self, time: f64) -> bool {
        match self.best_time {
            None => true,
            Some(best) => time < best - RECORD_EPSILON,
        }
    }

    /// Append a run and update the best time if it was beaten
    pub fn record_run(&mut self, time: f64, name: &str, date: String) -> RecordOutcome {
        let is_new_record = self.is_new_record(time);
        let name = if name.is_empty() { DEFAULT_RUN_NAME } else { name };

        self.runs.push(RunRecord {
            time: Some(time),
            date,
            name: name.to_string(),
        });

        let best_time = match self.best_time {
            Some(best) if !is_new_record => best,
            _ => time,
        };
        self.best_time = Some(best_time);

        RecordOutcome {
            is_new_record,
            best_time,
        }
    }

    /// Load, record and save in one step
    pub fn record_run_persisted(
        storage: &dyn Storage,
        time: f64,
        name: &str,
        date: String,
    ) -> Result<RecordOutcome, StoreError> {
        let mut board = Self::load(storage);
        let outcome = board.record_run(time, name, date);
        board.save(storage)?;
        Ok(outcome)
    }

    pub fn clear(&mut self) {
        self.runs.clear();
        self.best_time = None;
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    /// Fastest recorded run time (ignores runs without a time)
    pub fn fastest_time(&self) -> Option<f64> {
        self.runs
            .iter()
            .filter_map(|r| r.time)
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Runs ordered for display
    pub fn sorted(&self, mode: SortMode) -> Vec<&RunRecord> {
        let mut runs: Vec<&RunRecord> = self.runs.iter().collect();
        match mode {
            // Lexicographic on the stored string; stable for equal dates
            SortMode::Recent => runs.sort_by(|a, b| b.date.cmp(&a.date)),
            SortMode::Best => runs.sort_by(|a, b| {
                a.sort_time()
                    .partial_cmp(&b.sort_time())
                    .unwrap_or(Ordering::Equal)
            }),
        }
        runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{FileStorage, MemoryStorage};
    use proptest::prelude::*;

    fn date(n: u32) -> String {
        format!("2025-01-{:02} 12:00:00", n)
    }

    #[test]
    fn test_record_scenario() {
        let mut board = Leaderboard::new();

        let first = board.record_run(12.34, "Ann", date(1));
        assert!(first.is_new_record);
        assert_eq!(first.best_time, 12.34);

        let second = board.record_run(15.0, "Ann", date(2));
        assert!(!second.is_new_record);
        assert_eq!(second.best_time, 12.34);

        let third = board.record_run(9.99, "Ann", date(3));
        assert!(third.is_new_record);
        assert_eq!(third.best_time, 9.99);

        assert_eq!(board.len(), 3);
    }

    #[test]
    fn test_equal_time_is_not_a_new_record() {
        let mut board = Leaderboard::new();
        board.record_run(10.0, "A", date(1));
        let outcome = board.record_run(10.0 - 1e-12, "B", date(2));
        assert!(!outcome.is_new_record);
        assert_eq!(outcome.best_time, 10.0);
    }

    #[test]
    fn test_empty_name_defaults() {
        let mut board = Leaderboard::new();
        board.record_run(5.0, "", date(1));
        assert_eq!(board.runs[0].name, "Player");
    }

    #[test]
    fn test_load_missing_is_empty() {
        let storage = MemoryStorage::new();
        let board = Leaderboard::load(&storage);
        assert!(board.is_empty());
        assert_eq!(board.best_time, None);
    }

    #[test]
    fn test_corrupted_file_is_backed_up() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        std::fs::write(dir.path().join(LEADERBOARD_KEY), "{\"runs\": [").unwrap();

        let board = Leaderboard::load(&storage);

        assert_eq!(board, Leaderboard::new());
        assert!(dir.path().join("leaderboard.json.bak").exists());
        assert!(!dir.path().join(LEADERBOARD_KEY).exists());
    }

    #[test]
    fn test_binary_file_is_backed_up_before_next_save() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        let garbage = b"\xff\xfe{\"runs\": []}";
        std::fs::write(dir.path().join(LEADERBOARD_KEY), garbage).unwrap();

        let board = Leaderboard::load(&storage);
        assert!(board.is_empty());

        let backup = dir.path().join("leaderboard.json.bak");
        assert_eq!(std::fs::read(&backup).unwrap(), garbage);

        Leaderboard::record_run_persisted(&storage, 4.2, "Ann", date(1)).unwrap();
        assert_eq!(std::fs::read(&backup).unwrap(), garbage);
        assert_eq!(Leaderboard::load(&storage).len(), 1);
    }

    #[test]
    fn test_non_object_document_is_backed_up() {
        let storage = MemoryStorage::new().with_doc(LEADERBOARD_KEY, "[1, 2]");
        let board = Leaderboard::load(&storage);
        assert!(board.is_empty());
        assert!(storage.contains("leaderboard.json.bak"));
    }

    #[test]
    fn test_bad_shape_is_repaired_not_quarantined() {
        let storage = MemoryStorage::new().with_doc(
            LEADERBOARD_KEY,
            r#"{"runs": [{"time": 3.5, "date": "2025-02-02 10:00:00"}, 7, {"name": "Kim"}],
                "best_time": "fast"}"#,
        );
        let board = Leaderboard::load(&storage);

        assert!(!storage.contains("leaderboard.json.bak"));
        assert_eq!(board.best_time, None);
        assert_eq!(board.runs.len(), 2);
        assert_eq!(board.runs[0].name, "Player");
        assert_eq!(board.runs[0].time, Some(3.5));
        assert_eq!(board.runs[1].name, "Kim");
        assert_eq!(board.runs[1].time, None);
        assert_eq!(board.runs[1].date, "");
    }

    #[test]
    fn test_runs_not_a_list() {
        let storage =
            MemoryStorage::new().with_doc(LEADERBOARD_KEY, r#"{"runs": {}, "best_time": 4.0}"#);
        let board = Leaderboard::load(&storage);
        assert!(board.is_empty());
        assert_eq!(board.best_time, Some(4.0));
    }

    #[test]
    fn test_persisted_record_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();

        let a = Leaderboard::record_run_persisted(&storage, 20.0, "Ann", date(1)).unwrap();
        let b = Leaderboard::record_run_persisted(&storage, 18.5, "Bob", date(2)).unwrap();
        assert!(a.is_new_record && b.is_new_record);

        let board = Leaderboard::load(&storage);
        assert_eq!(board.len(), 2);
        assert_eq!(board.best_time, Some(18.5));
        assert_eq!(board.runs[1].name, "Bob");

        let contents = std::fs::read_to_string(dir.path().join(LEADERBOARD_KEY)).unwrap();
        let raw: Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(raw["runs"][0]["date"], "2025-01-01 12:00:00");
        assert_eq!(raw["best_time"], 18.5);
    }

    #[test]
    fn test_sorting() {
        let mut board = Leaderboard::new();
        board.record_run(30.0, "old", date(1));
        board.record_run(10.0, "mid", date(5));
        board.record_run(20.0, "new", date(9));
        board.runs.push(RunRecord {
            time: None,
            date: date(7),
            name: "untimed".to_string(),
        });

        let recent: Vec<&str> = board
            .sorted(SortMode::Recent)
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(recent, ["new", "untimed", "mid", "old"]);

        let best: Vec<&str> = board
            .sorted(SortMode::Best)
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(best, ["mid", "new", "old", "untimed"]);

        assert_eq!(board.fastest_time(), Some(10.0));
    }

    #[test]
    fn test_clear() {
        let mut board = Leaderboard::new();
        board.record_run(1.0, "A", date(1));
        board.clear();
        assert_eq!(board, Leaderboard::new());
    }

    proptest! {
        #[test]
        fn prop_best_time_is_running_minimum(
            times in proptest::collection::vec(0.01f64..500.0, 1..40)
        ) {
            let mut board = Leaderboard::new();
            let mut min = f64::INFINITY;
            for (i, t) in times.iter().enumerate() {
                let outcome = board.record_run(*t, "P", date(i as u32 % 28 + 1));
                min = min.min(*t);
                prop_assert!((outcome.best_time - min).abs() <= RECORD_EPSILON);
                prop_assert_eq!(board.best_time, Some(outcome.best_time));
            }
        }
    }
}
