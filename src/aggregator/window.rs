//! Bounded snapshot window with timestamp deduplication
//!
//! Holds the last `WINDOW_CAPACITY` history points in arrival order. All
//! operations are pure (they return a new window), so callers can detect a
//! change by value comparison.

use serde_json::Value;

use crate::model::HistoryPoint;

/// Maximum number of points kept; oldest evicted first
pub const WINDOW_CAPACITY: usize = 30;

/// Ordered, bounded history of snapshots
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotWindow {
    points: Vec<HistoryPoint>,
}

impl SnapshotWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[HistoryPoint] {
        &self.points
    }

    pub fn last(&self) -> Option<&HistoryPoint> {
        self.points.last()
    }

    /// Dedup rule: a candidate is accepted unless its timestamp equals the
    /// most recent entry's timestamp. Timestamp only; identical counts under
    /// a new timestamp are kept.
    pub fn accepts(&self, candidate: &HistoryPoint) -> bool {
        self.last()
            .map_or(true, |last| last.timestamp != candidate.timestamp)
    }

    /// Append one point, evicting the oldest entry when over capacity
    #[must_use]
    pub fn append(&self, point: HistoryPoint) -> Self {
        let mut points = self.points.clone();
        points.push(point);
        if points.len() > WINDOW_CAPACITY {
            points.remove(0);
        }
        Self { points }
    }

    /// Run a batch of points through dedup and append the accepted ones
    #[must_use]
    pub fn extend_deduped<I>(&self, batch: I) -> Self
    where
        I: IntoIterator<Item = HistoryPoint>,
    {
        let mut window = self.clone();
        for point in batch {
            if window.accepts(&point) {
                window = window.append(point);
            }
        }
        window
    }

    /// Distinct series keys in first-seen order, scanning front-to-back
    pub fn series_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        for point in &self.points {
            for key in point.url_stats.keys() {
                if !keys.iter().any(|k| k == key) {
                    keys.push(key.clone());
                }
            }
        }
        keys
    }

    /// Serialize for the persistence boundary
    pub fn serialize(&self) -> Value {
        serde_json::to_value(&self.points).unwrap_or(Value::Null)
    }

    /// Restore from a persisted value; absent or malformed input yields an
    /// empty window. Restored content is re-bounded in case the stored shape
    /// predates the current capacity.
    pub fn restore(value: Option<&Value>) -> Self {
        let points: Vec<HistoryPoint> = value
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default();
        Self::new().extend_deduped(points)
    }
}
