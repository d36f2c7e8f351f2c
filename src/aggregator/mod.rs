//! Real-time time-series aggregation
//!
//! Wires the poll pipeline together: sequence-checked tick results flow
//! through dedup into the bounded window, persistence is written through on
//! every mutation, and selection/coloring are derived from the series
//! observed in the window. The aggregator is the single writer of the window
//! and the persisted state; the UI only reads.

pub mod palette;
pub mod poller;
pub mod selection;
pub mod window;

pub use palette::SeriesPalette;
pub use poller::PollScheduler;
pub use selection::SeriesSelection;
pub use window::SnapshotWindow;

use serde_json::json;
use std::collections::BTreeMap;

use crate::model::{CodeBreakdown, HistoryPoint, StatsSummary, UrlStat};
use crate::store::{keys, StateStore};

/// Everything one poll tick produced
#[derive(Debug, Clone)]
pub struct TickData {
    pub history: Vec<HistoryPoint>,
    pub summary: StatsSummary,
    /// Only fetched while the cumulative view is active
    pub cumulative: Option<StatsSummary>,
}

/// Aggregator state machine: `(state, tick result) → state'`
pub struct Aggregator {
    window: SnapshotWindow,
    selection: SeriesSelection,
    palette: SeriesPalette,
    scheduler: PollScheduler,
    summary: Option<StatsSummary>,
    cumulative: Option<StatsSummary>,
    breakdown: CodeBreakdown,
    bar: BTreeMap<String, UrlStat>,
    last_update: Option<String>,
    store: Box<dyn StateStore>,
}

impl Aggregator {
    /// Restore persisted state from the store. This is the one read of the
    /// persistence boundary; everything after is write-through.
    pub fn restore(store: Box<dyn StateStore>) -> Self {
        let window = SnapshotWindow::restore(store.get(keys::HISTORY).as_ref());
        let paused = store
            .get(keys::PAUSED)
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        let last_update = store
            .get(keys::LAST_UPDATE)
            .and_then(|v| v.as_str().map(str::to_string));
        let breakdown = store
            .get(keys::PIE)
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default();
        let bar = store
            .get(keys::BAR)
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default();

        let mut palette = SeriesPalette::new();
        palette.extend(window.series_keys().iter());

        let mut selection = SeriesSelection::new();
        selection.sync_default(&window);

        Self {
            window,
            selection,
            palette,
            scheduler: PollScheduler::new(paused),
            summary: None,
            cumulative: None,
            breakdown,
            bar,
            last_update,
            store,
        }
    }

    pub fn window(&self) -> &SnapshotWindow {
        &self.window
    }

    pub fn selection(&self) -> &SeriesSelection {
        &self.selection
    }

    pub fn toggle_series(&mut self, key: &str) {
        self.selection.toggle(key);
    }

    pub fn palette(&self) -> &SeriesPalette {
        &self.palette
    }

    pub fn summary(&self) -> Option<&StatsSummary> {
        self.summary.as_ref()
    }

    pub fn cumulative(&self) -> Option<&StatsSummary> {
        self.cumulative.as_ref()
    }

    pub fn breakdown(&self) -> &CodeBreakdown {
        &self.breakdown
    }

    pub fn bar(&self) -> &BTreeMap<String, UrlStat> {
        &self.bar
    }

    pub fn last_update(&self) -> Option<&str> {
        self.last_update.as_deref()
    }

    pub fn is_paused(&self) -> bool {
        self.scheduler.is_paused()
    }

    /// Toggle the pause flag and persist it
    pub fn set_paused(&mut self, paused: bool) {
        if self.scheduler.set_paused(paused) {
            self.store.set(keys::PAUSED, &json!(paused));
        }
    }

    /// Whether the current tick should issue a fetch
    pub fn should_fetch(&self) -> bool {
        self.scheduler.should_fetch()
    }

    /// Number the next outgoing fetch
    pub fn begin_request(&mut self) -> u64 {
        self.scheduler.begin_request()
    }

    /// Apply one tick's result. Returns false when the response is stale
    /// (an older request resolving after a newer one was applied).
    pub fn apply(&mut self, seq: u64, data: TickData) -> bool {
        if !self.scheduler.should_apply(seq) {
            tracing::debug!(seq, "discarding stale poll response");
            return false;
        }
        self.scheduler.mark_applied(seq);

        let next = self.window.extend_deduped(data.history);
        if next != self.window {
            self.window = next;
            self.store.set(keys::HISTORY, &self.window.serialize());
        }

        self.palette.extend(self.window.series_keys().iter());
        self.selection.sync_default(&self.window);

        self.breakdown = CodeBreakdown::from(&data.summary);
        self.bar = data.summary.url_stats.clone();
        self.store.set(keys::PIE, &json!(self.breakdown));
        self.store.set(keys::BAR, &json!(self.bar));
        self.summary = Some(data.summary);
        if data.cumulative.is_some() {
            self.cumulative = data.cumulative;
        }

        let now = chrono::Local::now().format("%H:%M:%S").to_string();
        self.store.set(keys::LAST_UPDATE, &json!(now));
        self.last_update = Some(now);

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedStore(Arc<MemoryStore>);

    impl StateStore for SharedStore {
        fn get(&self, key: &str) -> Option<serde_json::Value> {
            self.0.get(key)
        }
        fn set(&self, key: &str, value: &serde_json::Value) {
            self.0.set(key, value);
        }
    }

    fn point(timestamp: &str, url: &str, count: u64) -> HistoryPoint {
        let mut url_stats = BTreeMap::new();
        url_stats.insert(
            url.to_string(),
            UrlStat {
                count,
                percentage: 0.0,
            },
        );
        HistoryPoint {
            timestamp: timestamp.to_string(),
            url_stats,
        }
    }

    fn tick(history: Vec<HistoryPoint>) -> TickData {
        TickData {
            history,
            summary: StatsSummary::default(),
            cumulative: None,
        }
    }

    #[test]
    fn test_apply_appends_and_dedupes() {
        let mut agg = Aggregator::restore(Box::new(MemoryStore::new()));
        let seq = agg.begin_request();
        assert!(agg.apply(seq, tick(vec![point("2025-05-12T10:00:00Z", "/a", 5)])));
        assert_eq!(agg.window().len(), 1);

        // same timestamp again: discarded by dedup
        let seq = agg.begin_request();
        agg.apply(seq, tick(vec![point("2025-05-12T10:00:00Z", "/a", 7)]));
        assert_eq!(agg.window().len(), 1);
        assert_eq!(agg.window().points()[0].url_stats["/a"].count, 5);

        let seq = agg.begin_request();
        agg.apply(seq, tick(vec![point("2025-05-12T10:00:10Z", "/a", 9)]));
        assert_eq!(agg.window().len(), 2);
    }

    #[test]
    fn test_stale_response_leaves_state_untouched() {
        let mut agg = Aggregator::restore(Box::new(MemoryStore::new()));
        let old_seq = agg.begin_request();
        let new_seq = agg.begin_request();

        assert!(agg.apply(new_seq, tick(vec![point("2025-05-12T10:00:10Z", "/a", 9)])));
        assert!(!agg.apply(old_seq, tick(vec![point("2025-05-12T10:00:00Z", "/a", 5)])));

        assert_eq!(agg.window().len(), 1);
        assert_eq!(agg.window().last().unwrap().timestamp, "2025-05-12T10:00:10Z");
    }

    #[test]
    fn test_state_survives_restart() {
        let store = SharedStore::default();

        let mut agg = Aggregator::restore(Box::new(store.clone()));
        let seq = agg.begin_request();
        agg.apply(seq, tick(vec![point("2025-05-12T10:00:00Z", "/a", 5)]));
        agg.set_paused(true);
        let window_before = agg.window().clone();

        let restored = Aggregator::restore(Box::new(store));
        assert_eq!(restored.window(), &window_before);
        assert!(restored.is_paused());
        assert!(restored.last_update().is_some());
    }

    #[test]
    fn test_selection_defaults_after_first_data() {
        let mut agg = Aggregator::restore(Box::new(MemoryStore::new()));
        assert!(agg.selection().selected().is_empty());

        let history: Vec<HistoryPoint> = ["/a", "/b", "/c", "/d", "/e", "/f"]
            .iter()
            .enumerate()
            .map(|(i, url)| point(&format!("2025-05-12T10:00:{:02}Z", i), url, 1))
            .collect();
        let seq = agg.begin_request();
        agg.apply(seq, tick(history));

        assert_eq!(agg.selection().selected(), ["/a", "/b", "/c", "/d", "/e"]);
    }

    #[test]
    fn test_summary_updates_breakdown_and_bar() {
        let mut agg = Aggregator::restore(Box::new(MemoryStore::new()));
        let summary = StatsSummary {
            success2xx: 90,
            errors4xx: 8,
            errors5xx: 2,
            url_stats: BTreeMap::from([(
                "/a".to_string(),
                UrlStat {
                    count: 100,
                    percentage: 100.0,
                },
            )]),
            ..Default::default()
        };

        let seq = agg.begin_request();
        agg.apply(
            seq,
            TickData {
                history: Vec::new(),
                summary,
                cumulative: None,
            },
        );

        assert_eq!(agg.breakdown().success2xx, 90);
        assert_eq!(agg.bar()["/a"].count, 100);
    }

    #[test]
    fn test_pause_flag_written_through() {
        let store = SharedStore::default();
        let mut agg = Aggregator::restore(Box::new(store.clone()));

        agg.set_paused(true);
        assert_eq!(store.get(keys::PAUSED), Some(json!(true)));

        agg.set_paused(false);
        assert_eq!(store.get(keys::PAUSED), Some(json!(false)));
    }
}
