//! Persistence of finished sessions.
//!
//! A session is stored as its raw ledger: the alternating play/pause
//! timestamps. The record id is the first timestamp, so saving the same
//! session twice overwrites instead of duplicating.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::StoreError;
use crate::config::default_data_dir;
use crate::timer::{Clock, SystemClock};
use crate::types::Timestamp;

/// File name of the history file inside the data directory.
pub const SESSIONS_FILE_NAME: &str = "sessions.json";

// ============================================================================
// SessionRecord
// ============================================================================

/// One stored session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// First timestamp, as a decimal string
    pub id: String,
    /// Alternating play/pause timestamps
    pub data: Vec<Timestamp>,
    /// When the record was written
    pub created_at: Timestamp,
}

impl SessionRecord {
    /// Builds a record from a closed ledger.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::IncompleteSession` unless `data` holds at least
    /// one pair and no trailing open start.
    pub fn new(data: &[Timestamp], created_at: Timestamp) -> Result<Self, StoreError> {
        let first = match data.first() {
            Some(first) if data.len() >= 2 && data.len() % 2 == 0 => *first,
            _ => return Err(StoreError::IncompleteSession(data.len())),
        };

        Ok(Self {
            id: first.to_string(),
            data: data.to_vec(),
            created_at,
        })
    }

    /// When the session was first started.
    pub fn started_at(&self) -> Option<Timestamp> {
        self.data.first().copied()
    }

    /// When the session was last paused.
    pub fn ended_at(&self) -> Option<Timestamp> {
        self.data.last().copied()
    }

    /// `(start, stop)` pairs in order.
    pub fn pairs(&self) -> impl Iterator<Item = (Timestamp, Timestamp)> + '_ {
        self.data.chunks_exact(2).map(|pair| (pair[0], pair[1]))
    }

    /// Time spent counting, excluding pauses.
    pub fn focused_ms(&self) -> u64 {
        self.pairs()
            .map(|(start, stop)| stop.saturating_sub(start))
            .sum()
    }
}

impl AsRef<[Timestamp]> for SessionRecord {
    fn as_ref(&self) -> &[Timestamp] {
        &self.data
    }
}

/// Inserts or replaces `record`, keeping records ordered by start.
fn put(records: &mut Vec<SessionRecord>, record: SessionRecord) {
    match records.iter_mut().find(|r| r.id == record.id) {
        Some(existing) => *existing = record,
        None => records.push(record),
    }
    records.sort_by_key(|r| r.started_at());
}

// ============================================================================
// SessionStore
// ============================================================================

/// Storage for finished sessions.
pub trait SessionStore {
    /// Stores a closed ledger and returns the written record.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger is incomplete or the backend fails.
    fn save(&self, timestamps: &[Timestamp]) -> Result<SessionRecord, StoreError>;

    /// Loads every stored session, ordered by start.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn load_all(&self) -> Result<Vec<SessionRecord>, StoreError>;
}

// ============================================================================
// JsonFileStore
// ============================================================================

/// Session store backed by a JSON array file.
///
/// Writes go to a sibling temp file which is then renamed over the target, so
/// a crash mid-write never leaves a truncated history.
pub struct JsonFileStore {
    path: PathBuf,
    clock: Box<dyn Clock>,
}

impl JsonFileStore {
    /// Creates a store writing `sessions.json` inside `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(SESSIONS_FILE_NAME),
            clock: Box::new(SystemClock),
        }
    }

    /// Creates a store in the platform data directory.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NoDataDir` if the platform has no data directory.
    pub fn at_default_location() -> Result<Self, StoreError> {
        default_data_dir()
            .map(Self::new)
            .ok_or(StoreError::NoDataDir)
    }

    /// Replaces the clock used for `created_at`.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Returns the history file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn write_atomically(&self, records: &[SessionRecord]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let json = serde_json::to_string_pretty(records).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }
}

impl SessionStore for JsonFileStore {
    fn save(&self, timestamps: &[Timestamp]) -> Result<SessionRecord, StoreError> {
        let record = SessionRecord::new(timestamps, self.clock.now_ms())?;

        let mut records = self.load_all()?;
        put(&mut records, record.clone());
        self.write_atomically(&records)?;

        debug!("Wrote {} sessions to {}", records.len(), self.path.display());
        Ok(record)
    }

    fn load_all(&self) -> Result<Vec<SessionRecord>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let text = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut records: Vec<SessionRecord> =
            serde_json::from_str(&text).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;
        records.sort_by_key(|r| r.started_at());
        Ok(records)
    }
}

impl fmt::Debug for JsonFileStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonFileStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// MemoryStore
// ============================================================================

/// In-memory session store.
pub struct MemoryStore {
    records: RefCell<Vec<SessionRecord>>,
    clock: Box<dyn Clock>,
    should_fail: Cell<bool>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: RefCell::new(Vec::new()),
            clock: Box::new(SystemClock),
            should_fail: Cell::new(false),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Makes every subsequent operation fail with `StoreError::Backend`.
    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.set(should_fail);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.should_fail.get() {
            return Err(StoreError::Backend("memory store failure".to_string()));
        }
        Ok(())
    }
}

impl SessionStore for MemoryStore {
    fn save(&self, timestamps: &[Timestamp]) -> Result<SessionRecord, StoreError> {
        self.check()?;
        let record = SessionRecord::new(timestamps, self.clock.now_ms())?;
        put(&mut self.records.borrow_mut(), record.clone());
        Ok(record)
    }

    fn load_all(&self) -> Result<Vec<SessionRecord>, StoreError> {
        self.check()?;
        Ok(self.records.borrow().clone())
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore")
            .field("records", &self.records.borrow().len())
            .field("should_fail", &self.should_fail.get())
            .finish_non_exhaustive()
    }
}

impl<S: SessionStore + ?Sized> SessionStore for std::rc::Rc<S> {
    fn save(&self, timestamps: &[Timestamp]) -> Result<SessionRecord, StoreError> {
        (**self).save(timestamps)
    }

    fn load_all(&self) -> Result<Vec<SessionRecord>, StoreError> {
        (**self).load_all()
    }
}

// ============================================================================
// Tests
// ============================================================================
