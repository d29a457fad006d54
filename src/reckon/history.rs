//! # History Store
//!
//! Owns the newest-first log of past evaluations and mirrors it to a
//! [`KeyValueStore`] under [`HISTORY_KEY`]. Every mutation is written
//! through immediately; there is no buffering.
//!
//! Mutations are staged on a copy of the log and only committed once the
//! write succeeds, so a storage failure leaves the in-memory log equal to
//! what is on disk.

use crate::config::DEFAULT_TIMESTAMP_FORMAT;
use crate::error::{ReckonError, Result};
use crate::model::{HistoryRecord, ResultValue};
use crate::store::KeyValueStore;
use chrono::format::{Item, StrftimeItems};
use chrono::Local;
use std::fmt::Write;
use tracing::{debug, warn};

/// Storage key of the serialized history log.
pub const HISTORY_KEY: &str = "calculatorHistory";

/// Source of human-readable timestamps for new records.
pub trait Clock {
    fn timestamp(&self) -> String;
}

/// Local wall-clock time rendered with a strftime pattern.
#[derive(Debug, Clone)]
pub struct SystemClock {
    format: String,
}

impl SystemClock {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(DEFAULT_TIMESTAMP_FORMAT)
    }
}

impl Clock for SystemClock {
    fn timestamp(&self) -> String {
        let now = Local::now();
        let mut out = String::new();
        if write!(out, "{}", now.format(&self.format)).is_err() {
            out.clear();
            let _ = write!(out, "{}", now.format(DEFAULT_TIMESTAMP_FORMAT));
        }
        out
    }
}

/// Whether `format` is a strftime pattern chrono can render.
pub fn is_valid_timestamp_format(format: &str) -> bool {
    !format.is_empty() && !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

pub struct HistoryStore<B: KeyValueStore> {
    backend: B,
    clock: Box<dyn Clock>,
    records: Vec<HistoryRecord>,
}

impl<B: KeyValueStore> HistoryStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            clock: Box::new(SystemClock::default()),
            records: Vec::new(),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Hydrate the log from storage.
    ///
    /// Returns `true` when a persisted log was found and read. A missing
    /// entry, or one that does not parse, leaves the log empty and returns
    /// `false`.
    pub fn load(&mut self) -> Result<bool> {
        let Some(raw) = self.backend.get(HISTORY_KEY)? else {
            return Ok(false);
        };

        match serde_json::from_str::<Vec<HistoryRecord>>(&raw) {
            Ok(records) => {
                debug!(count = records.len(), "loaded history");
                self.records = records;
                Ok(true)
            }
            Err(e) => {
                warn!(error = %e, "ignoring malformed history entry");
                self.records.clear();
                Ok(false)
            }
        }
    }

    /// Prepend a new record stamped with the current time.
    pub fn record(
        &mut self,
        expression: impl Into<String>,
        result: impl Into<ResultValue>,
    ) -> Result<&HistoryRecord> {
        let record = HistoryRecord::new(expression, result, self.clock.timestamp());
        let mut staged = Vec::with_capacity(self.records.len() + 1);
        staged.push(record);
        staged.extend(self.records.iter().cloned());

        self.persist(&staged)?;
        self.records = staged;
        Ok(&self.records[0])
    }

    /// Remove the record at `index`.
    ///
    /// Out-of-range indexes are a no-op: nothing is removed or written and
    /// `Ok(None)` is returned.
    pub fn delete_at(&mut self, index: usize) -> Result<Option<HistoryRecord>> {
        if index >= self.records.len() {
            debug!(index, len = self.records.len(), "delete index out of range");
            return Ok(None);
        }

        let mut staged = self.records.clone();
        let removed = staged.remove(index);
        self.persist(&staged)?;
        self.records = staged;
        Ok(Some(removed))
    }

    /// Empty the log and delete the persisted entry entirely.
    pub fn clear(&mut self) -> Result<()> {
        self.backend.remove(HISTORY_KEY)?;
        self.records.clear();
        Ok(())
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&HistoryRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn persist(&self, records: &[HistoryRecord]) -> Result<()> {
        let json = serde_json::to_string(records).map_err(ReckonError::Serialization)?;
        self.backend.set(HISTORY_KEY, &json)
    }
}
