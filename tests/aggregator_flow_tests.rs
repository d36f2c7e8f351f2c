/// Integration tests for the poll → dedup → window → persist pipeline
use httpmock::prelude::*;
use serde_json::json;
use std::time::Duration;

use logboard::{
    aggregator::{window::WINDOW_CAPACITY, Aggregator, TickData},
    client::StatsClient,
    model::StatsSummary,
    store::{keys, MemoryStore, StateStore},
};

fn history_body(entries: &[(&str, &str, u64)]) -> serde_json::Value {
    json!(entries
        .iter()
        .map(|(ts, url, count)| json!({
            "timestamp": ts,
            "urlStats": { *url: { "count": count, "percentage": 100.0 } }
        }))
        .collect::<Vec<_>>())
}

fn tick(history_json: serde_json::Value) -> TickData {
    TickData {
        history: serde_json::from_value(history_json).unwrap(),
        summary: StatsSummary::default(),
        cumulative: None,
    }
}

#[tokio::test]
async fn test_fetched_history_flows_into_window() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/statsHistory");
        then.status(200).json_body(history_body(&[
            ("2025-05-12T10:00:00Z", "/a", 5),
            ("2025-05-12T10:00:10Z", "/a", 9),
        ]));
    });

    let client = StatsClient::new(server.base_url(), Duration::from_secs(5)).unwrap();
    let history = client.fetch_history().await.unwrap();

    let mut aggregator = Aggregator::restore(Box::new(MemoryStore::new()));
    let seq = aggregator.begin_request();
    aggregator.apply(
        seq,
        TickData {
            history,
            summary: StatsSummary::default(),
            cumulative: None,
        },
    );

    assert_eq!(aggregator.window().len(), 2);
    assert_eq!(aggregator.selection().selected(), ["/a"]);
}

#[tokio::test]
async fn test_duplicate_timestamp_scenario() {
    let mut aggregator = Aggregator::restore(Box::new(MemoryStore::new()));

    // tick 1: first snapshot accepted
    let seq = aggregator.begin_request();
    aggregator.apply(
        seq,
        tick(history_body(&[("2025-05-12T00:00:00Z", "/a", 5)])),
    );
    assert_eq!(aggregator.window().len(), 1);

    // tick 2: same timestamp, discarded
    let seq = aggregator.begin_request();
    aggregator.apply(
        seq,
        tick(history_body(&[("2025-05-12T00:00:00Z", "/a", 5)])),
    );
    assert_eq!(aggregator.window().len(), 1);

    // tick 3: new timestamp, appended
    let seq = aggregator.begin_request();
    aggregator.apply(
        seq,
        tick(history_body(&[("2025-05-12T00:00:10Z", "/a", 9)])),
    );
    assert_eq!(aggregator.window().len(), 2);
    assert_eq!(
        aggregator.window().last().unwrap().timestamp,
        "2025-05-12T00:00:10Z"
    );
}

#[tokio::test]
async fn test_window_bounded_over_many_ticks() {
    let mut aggregator = Aggregator::restore(Box::new(MemoryStore::new()));

    for i in 0..31 {
        let seq = aggregator.begin_request();
        aggregator.apply(
            seq,
            tick(history_body(&[(
                &format!("2025-05-12T10:00:{:02}Z", i),
                "/a",
                i as u64,
            )])),
        );
        assert!(aggregator.window().len() <= WINDOW_CAPACITY);
    }

    assert_eq!(aggregator.window().len(), WINDOW_CAPACITY);
    // the first tick's snapshot has been evicted
    assert_eq!(
        aggregator.window().points()[0].timestamp,
        "2025-05-12T10:00:01Z"
    );
}

#[tokio::test]
async fn test_window_persisted_and_restored_across_restart() {
    let store = std::sync::Arc::new(MemoryStore::new());

    struct Shared(std::sync::Arc<MemoryStore>);
    impl StateStore for Shared {
        fn get(&self, key: &str) -> Option<serde_json::Value> {
            self.0.get(key)
        }
        fn set(&self, key: &str, value: &serde_json::Value) {
            self.0.set(key, value);
        }
    }

    let mut aggregator = Aggregator::restore(Box::new(Shared(store.clone())));
    let seq = aggregator.begin_request();
    aggregator.apply(
        seq,
        tick(history_body(&[
            ("2025-05-12T10:00:00Z", "/a", 5),
            ("2025-05-12T10:00:10Z", "/b", 3),
        ])),
    );
    let window_before = aggregator.window().clone();
    assert!(store.get(keys::HISTORY).is_some());

    // simulated restart: a fresh aggregator over the same store
    let restored = Aggregator::restore(Box::new(Shared(store)));
    assert_eq!(restored.window(), &window_before);
    assert_eq!(restored.selection().selected(), ["/a", "/b"]);
}
