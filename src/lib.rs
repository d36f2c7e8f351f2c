pub mod aggregator;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod store;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing/logging
///
/// Note: This function can only be called once. While the TUI owns the
/// terminal, set RUST_LOG and redirect stderr to a file to capture logs.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}
