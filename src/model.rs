//! Wire types for the stats service endpoints
//!
//! Field names follow the service's JSON contract (camelCase). All summary
//! fields default to zero so a partial payload still deserializes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-URL request statistics within one summary or snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlStat {
    pub count: u64,
    #[serde(default)]
    pub percentage: f64,
}

/// One timestamped set of per-URL counts from `/statsHistory`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPoint {
    /// ISO-8601 timestamp assigned by the service
    pub timestamp: String,
    #[serde(default)]
    pub url_stats: BTreeMap<String, UrlStat>,
}

/// Current totals from `/stats` (same shape for `/statsCumulative`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatsSummary {
    pub total_processed_logs: u64,
    pub success2xx: u64,
    pub errors4xx: u64,
    pub errors5xx: u64,
    pub error_rate_percent: f64,
    pub url_stats: BTreeMap<String, UrlStat>,
    pub urls4xx: BTreeMap<String, u64>,
    pub urls5xx: BTreeMap<String, u64>,
}

/// HTTP status class breakdown derived from a summary
///
/// Persisted between runs so the overview renders immediately on restart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodeBreakdown {
    pub success2xx: u64,
    pub errors4xx: u64,
    pub errors5xx: u64,
}

impl From<&StatsSummary> for CodeBreakdown {
    fn from(summary: &StatsSummary) -> Self {
        Self {
            success2xx: summary.success2xx,
            errors4xx: summary.errors4xx,
            errors5xx: summary.errors5xx,
        }
    }
}
