//! Bounded capture history (§4.6).
//!
//! Supplemented with `to_json`/`from_json` (serde, matching the teacher's
//! `JsonCookieStore` persistence idiom) for test fixtures and for
//! `Context`'s `recapture_last`/`history_recapture` entry points, named in
//! `original_source/src/core/pixelgrab_api.cpp` but dropped from the
//! distilled operation list.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Error, Result};

/// One recorded capture region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i32,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub timestamp_seconds: i64,
}

const DEFAULT_MAX_COUNT: usize = 50;

/// A newest-first FIFO of [`HistoryEntry`] with a monotonic id counter
/// that never reuses ids, even across trims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    entries: Vec<HistoryEntry>,
    max_count: usize,
    next_id: i32,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_COUNT)
    }
}

impl History {
    pub fn new(max_count: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_count: max_count.max(1),
            next_id: 1,
        }
    }

    /// Assigns the next id, timestamps the entry, prepends it, and trims
    /// the tail to `max_count`.
    pub fn record(&mut self, x: i32, y: i32, w: i32, h: i32) -> i32 {
        let id = self.next_id;
        self.next_id += 1;

        let timestamp_seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);

        self.entries.insert(0, HistoryEntry { id, x, y, w, h, timestamp_seconds });
        self.entries.truncate(self.max_count);
        id
    }

    /// Reads by recency index; 0 is the most recent entry.
    pub fn get_entry(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn find_by_id(&self, id: i32) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Shrinks the buffer immediately if `n` is smaller than the current
    /// length. `n` must be positive.
    pub fn set_max_count(&mut self, n: usize) -> Result<()> {
        if n == 0 {
            return Err(Error::InvalidParam);
        }
        self.max_count = n;
        self.entries.truncate(n);
        Ok(())
    }

    pub fn max_count(&self) -> usize {
        self.max_count
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|_| Error::Unknown)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|_| Error::InvalidParam)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_assigns_monotonic_ids_and_orders_newest_first() {
        let mut history = History::new(10);
        let id1 = history.record(0, 0, 10, 10);
        let id2 = history.record(5, 5, 20, 20);
        assert_eq!((id1, id2), (1, 2));
        assert_eq!(history.get_entry(0).unwrap().id, id2);
        assert_eq!(history.get_entry(1).unwrap().id, id1);
    }

    #[test]
    fn trims_to_max_count_without_reusing_ids() {
        let mut history = History::new(2);
        history.record(0, 0, 1, 1);
        history.record(0, 0, 1, 1);
        let id3 = history.record(0, 0, 1, 1);
        assert_eq!(history.len(), 2);
        assert_eq!(history.get_entry(0).unwrap().id, id3);
        let id4 = history.record(0, 0, 1, 1);
        assert_eq!(id4, 4);
    }

    #[test]
    fn set_max_count_rejects_zero_and_shrinks_immediately() {
        let mut history = History::new(10);
        for _ in 0..5 {
            history.record(0, 0, 1, 1);
        }
        assert!(matches!(history.set_max_count(0), Err(Error::InvalidParam)));
        assert!(history.set_max_count(2).is_ok());
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn json_round_trip_preserves_entries() {
        let mut history = History::new(5);
        history.record(1, 2, 3, 4);
        let json = history.to_json().unwrap();
        let restored = History::from_json(&json).unwrap();
        assert_eq!(restored.len(), 1);
        assert_eq!(restored.get_entry(0).unwrap().x, 1);
    }
}
