use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, Local};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_MAX_ENTRIES: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub wpm: u32,
    pub accuracy: u32,
    pub date: DateTime<Local>,
}

impl LeaderboardEntry {
    pub fn new(name: impl Into<String>, wpm: u32, accuracy: u32) -> Self {
        Self {
            name: name.into(),
            wpm,
            accuracy,
            date: Local::now(),
        }
    }

    /// Avatar letter shown next to the name.
    pub fn initial(&self) -> Option<char> {
        self.name.chars().next().map(|c| c.to_ascii_uppercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SortField {
    Wpm,
    Accuracy,
    Date,
}

impl FromStr for SortField {
    type Err = Error;

    /// Accepts the filter keys used by the leaderboard tabs.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wpm" => Ok(SortField::Wpm),
            "accuracy" => Ok(SortField::Accuracy),
            "date" | "recent" => Ok(SortField::Date),
            _ => Err(Error::UnknownSortField(s.to_string())),
        }
    }
}

/// Past results, most recent first, bounded in size.
#[derive(Debug, Clone)]
pub struct LeaderboardStore {
    entries: Vec<LeaderboardEntry>,
    max_size: usize,
}

impl Default for LeaderboardStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

impl LeaderboardStore {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_size,
        }
    }

    /// Store pre-filled with demo results.
    pub fn with_sample_entries(max_size: usize) -> Self {
        let mut store = Self::new(max_size);
        let samples = [
            ("RapidTyper", 105, 97),
            ("QuickFingers", 108, 94),
            ("TypeMaster", 112, 99),
            ("KeyboardNinja", 118, 96),
            ("SpeedDemon", 125, 98),
        ];
        for (name, wpm, accuracy) in samples {
            store.insert(LeaderboardEntry::new(name, wpm, accuracy));
        }
        store
    }

    /// Prepends `entry` and drops the oldest entries beyond `max_size`.
    pub fn insert_bounded(&mut self, entry: LeaderboardEntry, max_size: usize) {
        self.entries.insert(0, entry);
        self.entries.truncate(max_size);
    }

    pub fn insert(&mut self, entry: LeaderboardEntry) {
        self.insert_bounded(entry, self.max_size);
    }

    /// Entries in insertion order, newest first.
    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Copy of the entries ordered by `field`. Ties keep insertion order.
    pub fn sorted_by(&self, field: SortField, descending: bool) -> Vec<LeaderboardEntry> {
        self.entries
            .iter()
            .sorted_by(|a, b| {
                let ord = compare(a, b, field);
                if descending {
                    ord.reverse()
                } else {
                    ord
                }
            })
            .cloned()
            .collect()
    }

    /// Default display order: fastest first.
    pub fn ranked(&self) -> Vec<LeaderboardEntry> {
        self.sorted_by(SortField::Wpm, true)
    }

    /// Sorts for a leaderboard filter tab, highest first.
    pub fn filter(&self, key: &str) -> Result<Vec<LeaderboardEntry>> {
        Ok(self.sorted_by(key.parse()?, true))
    }
}

fn compare(a: &LeaderboardEntry, b: &LeaderboardEntry, field: SortField) -> Ordering {
    match field {
        SortField::Wpm => a.wpm.cmp(&b.wpm),
        SortField::Accuracy => a.accuracy.cmp(&b.accuracy),
        SortField::Date => a.date.cmp(&b.date),
    }
}
