//! Series display selection
//!
//! Session-scoped set of series shown on the timeline chart. The default
//! population fires exactly once, when the window first carries data while
//! the selection is still empty. Keys that later age out of the window are
//! intentionally not pruned.

use crate::aggregator::window::SnapshotWindow;

/// How many series are selected by default
pub const DEFAULT_SERIES_LIMIT: usize = 5;

/// Set of series currently displayed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesSelection {
    selected: Vec<String>,
    defaulted: bool,
}

impl SeriesSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn is_selected(&self, key: &str) -> bool {
        self.selected.iter().any(|k| k == key)
    }

    /// First `DEFAULT_SERIES_LIMIT` distinct keys in arrival order,
    /// scanning the window front-to-back
    pub fn default_from(window: &SnapshotWindow) -> Vec<String> {
        let mut keys = window.series_keys();
        keys.truncate(DEFAULT_SERIES_LIMIT);
        keys
    }

    /// Apply the one-shot default. Does nothing once it has fired, or while
    /// the window is empty, or if the user already made a selection.
    pub fn sync_default(&mut self, window: &SnapshotWindow) {
        if self.defaulted || !self.selected.is_empty() || window.is_empty() {
            return;
        }
        self.selected = Self::default_from(window);
        self.defaulted = true;
    }

    /// Add or remove a key from the live selection
    pub fn toggle(&mut self, key: &str) {
        if let Some(pos) = self.selected.iter().position(|k| k == key) {
            self.selected.remove(pos);
        } else {
            self.selected.push(key.to_string());
        }
    }
}
