use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Writeup;

/// Three-way split of a writeup list at a given instant.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBuckets {
    pub completed: Vec<Writeup>,
    pub missing: Vec<Writeup>,
    pub upcoming: Vec<Writeup>,
}

impl StatusBuckets {
    pub fn len(&self) -> usize {
        self.completed.len() + self.missing.len() + self.upcoming.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Writeups not yet done, in stored order.
pub fn filter_pending(writeups: &[Writeup]) -> Vec<Writeup> {
    writeups.iter().filter(|w| !w.is_done).cloned().collect()
}

/// Splits writeups into completed, missing (past due) and upcoming.
///
/// A pending writeup due exactly at `now` counts as upcoming. Each input lands
/// in exactly one bucket and keeps its relative order.
pub fn filter_completed_missing_upcoming(
    writeups: &[Writeup],
    now: DateTime<Utc>,
) -> StatusBuckets {
    let mut buckets = StatusBuckets::default();
    for w in writeups {
        if w.is_done {
            buckets.completed.push(w.clone());
        } else if w.due < now {
            buckets.missing.push(w.clone());
        } else {
            buckets.upcoming.push(w.clone());
        }
    }
    buckets
}
