// ABOUTME: Removal report tallying class tokens stripped for lacking a selector.
// ABOUTME: Keeps first-removal order so frequency ties sort deterministically.

use std::collections::HashMap;

use serde::{Serialize, Serializer};

/// One removed class name and how many times it was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovedClass {
    pub class: String,
    pub count: usize,
}

/// Tally of removed class tokens, in first-removal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalReport {
    entries: Vec<RemovedClass>,
    index: HashMap<String, usize>,
}

impl RemovalReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one removal of `class`.
    pub fn record(&mut self, class: &str) {
        match self.index.get(class) {
            Some(&idx) => self.entries[idx].count += 1,
            None => {
                self.index.insert(class.to_string(), self.entries.len());
                self.entries.push(RemovedClass {
                    class: class.to_string(),
                    count: 1,
                });
            }
        }
    }

    /// Number of times `class` was removed (0 if never).
    pub fn count(&self, class: &str) -> usize {
        self.index
            .get(class)
            .map(|&idx| self.entries[idx].count)
            .unwrap_or(0)
    }

    /// Number of distinct removed class names.
    pub fn distinct(&self) -> usize {
        self.entries.len()
    }

    /// Total number of removed tokens.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-removal order.
    pub fn iter(&self) -> impl Iterator<Item = &RemovedClass> {
        self.entries.iter()
    }

    /// Entries by descending count; ties keep first-removal order.
    pub fn by_frequency(&self) -> Vec<&RemovedClass> {
        let mut sorted: Vec<&RemovedClass> = self.entries.iter().collect();
        sorted.sort_by(|a, b| b.count.cmp(&a.count));
        sorted
    }
}

impl Serialize for RemovalReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.by_frequency())
    }
}
