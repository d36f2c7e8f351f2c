//! Snapshot command implementation
//!
//! One-shot fetch of the current (or cumulative) stats, printed to stdout.
//! Useful for scripting and for checking the service without entering the TUI.

use anyhow::Result;
use std::time::Duration;

use logboard::{client::StatsClient, config, model::StatsSummary};

/// Execute the snapshot command
pub async fn execute(url_override: Option<String>, cumulative: bool) -> Result<()> {
    let cfg = config::load_config()?;
    let base_url = url_override.unwrap_or(cfg.service.base_url);
    let client = StatsClient::new(base_url, Duration::from_secs(cfg.service.timeout_seconds))?;

    let summary = if cumulative {
        client.fetch_cumulative().await?
    } else {
        client.fetch_stats().await?
    };

    print_summary(&summary, cumulative);
    Ok(())
}

fn print_summary(summary: &StatsSummary, cumulative: bool) {
    let scope = if cumulative { "cumulative" } else { "current" };
    println!("Stats ({}):", scope);
    println!("  processed logs: {}", summary.total_processed_logs);
    println!("  success 2xx:    {}", summary.success2xx);
    println!("  errors 4xx:     {}", summary.errors4xx);
    println!("  errors 5xx:     {}", summary.errors5xx);
    println!("  error rate:     {:.2}%", summary.error_rate_percent);

    if !summary.url_stats.is_empty() {
        println!("  by URL:");
        let mut entries: Vec<_> = summary.url_stats.iter().collect();
        entries.sort_by(|a, b| b.1.count.cmp(&a.1.count));
        for (url, stat) in entries {
            println!("    {:<40} {:>8}  {:>5.1}%", url, stat.count, stat.percentage);
        }
    }
}
