use std::collections::VecDeque;

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::constants::LOCK_THRESHOLD;

/// One audit outcome. `locked` is derived from purity, never stored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HistoryRecord {
    pub purity: f64,
    pub dilation: f64,
}

impl HistoryRecord {
    pub fn new(purity: f64, dilation: f64) -> Self {
        Self { purity, dilation }
    }

    pub fn locked(&self) -> bool {
        self.purity > LOCK_THRESHOLD
    }
}

impl Serialize for HistoryRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("HistoryRecord", 3)?;
        s.serialize_field("purity", &self.purity)?;
        s.serialize_field("dilation", &self.dilation)?;
        s.serialize_field("locked", &self.locked())?;
        s.end()
    }
}

/// Bounded, append-only record log.
///
/// Holds at most `capacity` records; the oldest is evicted when full.
/// `total_recorded` counts every push and never decreases.
#[derive(Clone, Debug)]
pub struct History {
    records: VecDeque<HistoryRecord>,
    capacity: usize,
    total_recorded: u64,
}

impl History {
    /// Capacity is raised to 1 if zero is given.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            total_recorded: 0,
        }
    }

    pub fn push(&mut self, record: HistoryRecord) {
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
        self.total_recorded += 1;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn total_recorded(&self) -> u64 {
        self.total_recorded
    }

    pub fn last(&self) -> Option<&HistoryRecord> {
        self.records.back()
    }

    /// Retained records, oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &HistoryRecord> + ExactSizeIterator {
        self.records.iter()
    }

    /// The last `n` retained records (fewer if the log is shorter), oldest first.
    pub fn trailing(&self, n: usize) -> impl Iterator<Item = &HistoryRecord> {
        let skip = self.records.len().saturating_sub(n);
        self.records.iter().skip(skip)
    }

    /// Peak purity over the last `n` records.
    pub fn peak_purity(&self, n: usize) -> Option<f64> {
        self.trailing(n).map(|r| r.purity).reduce(f64::max)
    }
}
