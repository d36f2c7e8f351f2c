//! Dashboard command implementation
//!
//! Runs the interactive terminal dashboard: a timer drives polls of the stats
//! service, resolved fetches flow through the aggregator, and the TUI renders
//! whatever state the aggregator exposes. Fetches run as spawned tasks, so a
//! slow response never blocks rendering; the aggregator's sequence check
//! drops responses that resolve after a newer one was already applied.

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::FutureExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, time::Duration};
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};

use logboard::{
    aggregator::{Aggregator, TickData},
    client::StatsClient,
    config,
    dashboard::{DashboardApp, View},
    error::ClientError,
    store::FileStore,
};

/// Execute the dashboard command
///
/// # Arguments
/// * `interval_override` - Poll interval in seconds (config value if None)
/// * `url_override` - Stats service base URL (config value if None)
pub async fn execute(interval_override: Option<f64>, url_override: Option<String>) -> Result<()> {
    let cfg = config::load_config()?;

    let interval_secs = interval_override.unwrap_or(cfg.dashboard.poll_interval_seconds);
    if !(0.5..=300.0).contains(&interval_secs) {
        anyhow::bail!(
            "Invalid interval: {}. Must be between 0.5 and 300 seconds",
            interval_secs
        );
    }

    let base_url = url_override.unwrap_or(cfg.service.base_url);
    let client = StatsClient::new(base_url, Duration::from_secs(cfg.service.timeout_seconds))?;

    let state_dir = cfg
        .dashboard
        .state_dir
        .unwrap_or_else(FileStore::default_dir);
    let store = FileStore::open(state_dir)?;

    run_dashboard(client, store, interval_secs).await
}

/// One resolved fetch, tagged with its request sequence
struct FetchOutcome {
    seq: u64,
    result: Result<TickData, ClientError>,
}

/// Run the dashboard loop
async fn run_dashboard(client: StatsClient, store: FileStore, interval_secs: f64) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore persisted state before the first poll
    let mut app = DashboardApp::new(Aggregator::restore(Box::new(store)));

    let (tx, mut rx) = mpsc::unbounded_channel::<FetchOutcome>();
    let mut interval_timer = interval(Duration::from_secs_f64(interval_secs));
    interval_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // Initial fetch (skipped when restored in a paused state)
    if app.aggregator.should_fetch() {
        let seq = app.aggregator.begin_request();
        spawn_fetch(&client, seq, app.view == View::Cumulative, &tx);
    }

    // Main loop
    let result = loop {
        // Render UI
        if let Err(e) = terminal.draw(|f| app.render(f)) {
            break Err(e.into());
        }

        // Handle events with timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                let was_paused = app.aggregator.is_paused();
                if app.handle_key(key) {
                    break Ok(());
                }

                // Resuming waits out a full interval; missed ticks are not
                // replayed
                if was_paused && !app.aggregator.is_paused() {
                    interval_timer.reset();
                }

                // Manual refresh works even while paused
                if matches!(key.code, KeyCode::Char('r') | KeyCode::Char('R')) {
                    let seq = app.aggregator.begin_request();
                    spawn_fetch(&client, seq, app.view == View::Cumulative, &tx);
                }
            }
        }

        // Apply resolved fetches. In-flight results still land while paused;
        // stale sequences are dropped by the aggregator.
        while let Ok(outcome) = rx.try_recv() {
            match outcome.result {
                Ok(data) => {
                    if app.aggregator.apply(outcome.seq, data) {
                        app.error_message = None;
                    }
                }
                Err(e) => {
                    // Window stays as-is; next tick retries unconditionally
                    tracing::warn!(error = %e, "poll failed");
                    app.error_message = Some(e.to_string());
                }
            }
        }

        // Check if interval elapsed
        if interval_timer.tick().now_or_never().is_some() && app.aggregator.should_fetch() {
            let seq = app.aggregator.begin_request();
            spawn_fetch(&client, seq, app.view == View::Cumulative, &tx);
        }
    };

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn spawn_fetch(
    client: &StatsClient,
    seq: u64,
    want_cumulative: bool,
    tx: &mpsc::UnboundedSender<FetchOutcome>,
) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = fetch_tick(&client, want_cumulative).await;
        // receiver gone means the loop already exited
        let _ = tx.send(FetchOutcome { seq, result });
    });
}

async fn fetch_tick(client: &StatsClient, want_cumulative: bool) -> Result<TickData, ClientError> {
    let history = client.fetch_history().await?;
    let summary = client.fetch_stats().await?;
    let cumulative = if want_cumulative {
        Some(client.fetch_cumulative().await?)
    } else {
        None
    };

    Ok(TickData {
        history,
        summary,
        cumulative,
    })
}
