use serde::{Deserialize, Serialize};
use std::collections::{hash_map::Entry, HashMap};

/// One step of a forecast timeline.
///
/// `ft` is the forecast hour counted from the calculation's initial time.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub ft: u32,
    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(ft: u32, value: f64) -> Self {
        Self { ft, value }
    }
}

/// Forecast hour -> timeline offset table.
///
/// Built once per dataset from a single reference timeline. Offsets are
/// positional, so an index is only meaningful for timelines of the dataset
/// it was built from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeIndex {
    /// Forecast hours in reference order; position == offset for
    /// well-formed timelines.
    hours: Vec<u32>,
    offsets: HashMap<u32, usize>,
}

impl TimeIndex {
    /// Build the index in a single pass over `reference`.
    ///
    /// If an hour repeats, its first offset is kept.
    pub fn build(reference: &[TimeSeriesPoint]) -> TimeIndex {
        let mut offsets = HashMap::with_capacity(reference.len());
        let mut hours = Vec::with_capacity(reference.len());
        for (offset, point) in reference.iter().enumerate() {
            if let Entry::Vacant(slot) = offsets.entry(point.ft) {
                slot.insert(offset);
                hours.push(point.ft);
            }
        }
        TimeIndex { hours, offsets }
    }

    /// Offset of `ft` in every timeline of the dataset, or `None` when the
    /// hour is not part of the reference timeline.
    pub fn lookup(&self, ft: u32) -> Option<usize> {
        self.offsets.get(&ft).copied()
    }

    /// Forecast hours covered by the index, in timeline order.
    pub fn hours(&self) -> &[u32] {
        &self.hours
    }

    pub fn len(&self) -> usize {
        self.hours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hours.is_empty()
    }
}
