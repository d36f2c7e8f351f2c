//! Terminal dashboard rendering

pub mod app;

pub use app::{DashboardApp, View};
