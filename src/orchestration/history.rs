//! Bounded record of submitted queries, most recent last.

use crate::constants::history::DEFAULT_HISTORY_LIMIT;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryHistoryEntry {
    pub query: String,
    pub timestamp: DateTime<Utc>,
}

/// Submitted queries, oldest dropped first once `limit` is reached
#[derive(Debug)]
pub struct QueryHistory {
    entries: Mutex<VecDeque<QueryHistoryEntry>>,
    limit: usize,
}

impl QueryHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(limit)),
            limit,
        }
    }

    pub fn add(&self, query: &str) {
        if self.limit == 0 {
            return;
        }

        let mut entries = self.entries.lock();
        while entries.len() >= self.limit {
            entries.pop_front();
        }
        entries.push_back(QueryHistoryEntry {
            query: query.to_string(),
            timestamp: Utc::now(),
        });
    }

    /// Copy of the history, oldest first
    pub fn entries(&self) -> Vec<QueryHistoryEntry> {
        self.entries.lock().iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for QueryHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}
