// src/crossing_tracker.rs
//
// Per-identity crossing state. One record per track identity, created on the
// first in-region observation and kept for the rest of the run (growth is
// bounded by the number of distinct identities the tracker emits — fine for
// a video of bounded length, a known limitation for endless streams).

use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

/// Stable identifier assigned by the external tracker to the same physical
/// object across frames.
pub type TrackId = i64;

/// Crossing state for one track identity.
///
/// `start_zone` is set exactly once, on the first observation, and never
/// changes. `last_zone` and `direction` are overwritten on every later
/// observation — an identity that re-crosses keeps flipping its direction.
/// That oscillation is deliberate: direction always reflects the most recent
/// zone relative to the first one.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CrossingRecord {
    pub start_zone: String,
    pub last_zone: Option<String>,
    /// `Some(zone)` when `last_zone` differs from `start_zone`, otherwise
    /// `None` (undetermined). Recomputed on every update, never locked.
    pub direction: Option<String>,
}

impl CrossingRecord {
    fn new(start_zone: &str) -> Self {
        Self {
            start_zone: start_zone.to_string(),
            last_zone: None,
            direction: None,
        }
    }

    /// Label for an external renderer: the resolved direction, or the raw
    /// track id while the direction is still undetermined.
    pub fn label(&self, id: TrackId) -> String {
        match &self.direction {
            Some(direction) => direction.clone(),
            None => format!("ID={}", id),
        }
    }
}

/// Direction rule, kept free-standing because it is independently testable:
/// the current zone when it differs from the start zone, else undetermined.
/// Looks at nothing beyond the two names supplied.
pub fn resolve_direction(start_zone: &str, current_zone: &str) -> Option<String> {
    if current_zone != start_zone {
        Some(current_zone.to_string())
    } else {
        None
    }
}

/// The ledger of crossing records, exclusively owned here. No identity is
/// ever removed during normal operation.
#[derive(Debug, Default)]
pub struct CrossingTracker {
    records: HashMap<TrackId, CrossingRecord>,
}

impl CrossingTracker {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    /// Record one in-zone observation for `id`. Only call this when the
    /// identity's reference point is inside the region of interest AND a
    /// sub-zone matched — an in-region point in no named zone must leave the
    /// existing record untouched, so the caller simply skips the call.
    pub fn observe(&mut self, id: TrackId, zone_name: &str) -> &CrossingRecord {
        match self.records.entry(id) {
            std::collections::hash_map::Entry::Vacant(entry) => {
                info!("🆕 New track ID #{} first seen in zone '{}'", id, zone_name);
                entry.insert(CrossingRecord::new(zone_name))
            }
            std::collections::hash_map::Entry::Occupied(entry) => {
                let record = entry.into_mut();
                record.last_zone = Some(zone_name.to_string());
                record.direction = resolve_direction(&record.start_zone, zone_name);
                debug!(
                    "Track ID #{}: {} → {} (direction: {})",
                    id,
                    record.start_zone,
                    zone_name,
                    record.direction.as_deref().unwrap_or("undetermined")
                );
                record
            }
        }
    }

    /// Read-only lookup, e.g. for a renderer. Never mutates.
    pub fn get(&self, id: TrackId) -> Option<&CrossingRecord> {
        self.records.get(&id)
    }

    /// Distinct identities ever recorded. Monotonically non-decreasing.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TrackId, &CrossingRecord)> {
        self.records.iter().map(|(id, record)| (*id, record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_rule_is_symmetric_per_call() {
        assert_eq!(resolve_direction("top", "bottom"), Some("bottom".into()));
        assert_eq!(resolve_direction("bottom", "top"), Some("top".into()));
        assert_eq!(resolve_direction("top", "top"), None);
    }

    #[test]
    fn first_observation_creates_record() {
        let mut tracker = CrossingTracker::new();
        let record = tracker.observe(1, "top");
        assert_eq!(record.start_zone, "top");
        assert_eq!(record.last_zone, None);
        assert_eq!(record.direction, None);
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn crossing_resolves_direction() {
        let mut tracker = CrossingTracker::new();
        tracker.observe(1, "top");
        let record = tracker.observe(1, "bottom");
        assert_eq!(record.start_zone, "top");
        assert_eq!(record.last_zone, Some("bottom".into()));
        assert_eq!(record.direction, Some("bottom".into()));
    }

    #[test]
    fn same_zone_stays_undetermined() {
        let mut tracker = CrossingTracker::new();
        tracker.observe(7, "top");
        tracker.observe(7, "top");
        let record = tracker.observe(7, "top");
        assert_eq!(record.direction, None);
    }

    #[test]
    fn repeated_observation_is_idempotent() {
        let mut tracker = CrossingTracker::new();
        tracker.observe(3, "top");
        tracker.observe(3, "bottom");
        let first = tracker.observe(3, "bottom").clone();
        let second = tracker.observe(3, "bottom").clone();
        assert_eq!(first, second);
        assert_eq!(second.direction, Some("bottom".into()));
    }

    #[test]
    fn recrossing_overwrites_direction() {
        // top → bottom → top: direction follows the most recent zone.
        let mut tracker = CrossingTracker::new();
        tracker.observe(5, "top");
        assert_eq!(tracker.observe(5, "bottom").direction, Some("bottom".into()));
        let record = tracker.observe(5, "top");
        assert_eq!(record.direction, None); // back where it started
        assert_eq!(tracker.observe(5, "bottom").direction, Some("bottom".into()));
    }

    #[test]
    fn start_zone_never_changes() {
        let mut tracker = CrossingTracker::new();
        tracker.observe(2, "bottom");
        tracker.observe(2, "top");
        tracker.observe(2, "bottom");
        tracker.observe(2, "top");
        assert_eq!(tracker.get(2).unwrap().start_zone, "bottom");
    }

    #[test]
    fn get_does_not_create_records() {
        let tracker = CrossingTracker::new();
        assert!(tracker.get(42).is_none());
        assert!(tracker.is_empty());
    }

    #[test]
    fn label_uses_direction_when_resolved() {
        let mut tracker = CrossingTracker::new();
        tracker.observe(9, "top");
        assert_eq!(tracker.get(9).unwrap().label(9), "ID=9");
        tracker.observe(9, "bottom");
        assert_eq!(tracker.get(9).unwrap().label(9), "bottom");
    }
}
