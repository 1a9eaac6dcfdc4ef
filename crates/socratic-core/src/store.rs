//! In-memory student log, keyed by grade level.
//!
//! Append-only and unbounded; contents are lost when the process exits.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::model::LogEntry;

/// Owned store of logged student turns.
#[derive(Debug, Default)]
pub struct StudentLogStore {
    entries: RwLock<HashMap<i64, Vec<LogEntry>>>,
}

impl StudentLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn for `grade` and return that grade's new entry count.
    pub fn append(&self, grade: i64, topic: &str, transcript: &str) -> usize {
        let entry = LogEntry::new(topic, transcript);
        let mut guard = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let list = guard.entry(grade).or_default();
        list.push(entry);
        list.len()
    }

    /// Entries for `grade` in insertion order.
    pub fn entries(&self, grade: i64) -> Vec<LogEntry> {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&grade)
            .cloned()
            .unwrap_or_default()
    }

    /// Entry count per grade with at least one entry, ascending by grade.
    pub fn summary(&self) -> Vec<(i64, usize)> {
        let mut counts: Vec<(i64, usize)> = self
            .entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .map(|(grade, list)| (*grade, list.len()))
            .collect();
        counts.sort_unstable_by_key(|&(grade, _)| grade);
        counts
    }
}
