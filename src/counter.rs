// src/counter.rs
//
// Summary counts derived on demand from the crossing ledger. The
// currently-in-region figure is a per-frame transient computed during the
// frame pass and handed in alongside the ledger-derived fields.

use crate::crossing_tracker::CrossingTracker;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Summary {
    /// Distinct identities ever recorded. Monotonically non-decreasing
    /// across a run, since records are never removed.
    pub total_identities: usize,
    /// Count of records per resolved direction (sub-zone name). Identities
    /// still undetermined appear in `total_identities` but in no bucket.
    pub per_direction: BTreeMap<String, usize>,
    /// Observations whose reference point was inside the region of interest
    /// this frame. Resets every frame.
    pub currently_in_region: usize,
}

pub fn summarize(tracker: &CrossingTracker, currently_in_region: usize) -> Summary {
    let mut per_direction: BTreeMap<String, usize> = BTreeMap::new();
    for (_, record) in tracker.iter() {
        if let Some(direction) = &record.direction {
            *per_direction.entry(direction.clone()).or_insert(0) += 1;
        }
    }

    Summary {
        total_identities: tracker.len(),
        per_direction,
        currently_in_region,
    }
}
