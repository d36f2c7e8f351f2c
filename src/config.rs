use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the stats service
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8081".to_string(),
            timeout_seconds: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Seconds between polls
    pub poll_interval_seconds: f64,
    /// Override for the state directory (defaults to the platform data dir)
    pub state_dir: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            poll_interval_seconds: 10.0,
            state_dir: None,
        }
    }
}

/// Load configuration from `logboard.toml` (optional) plus
/// `LOGBOARD__`-prefixed environment overrides
pub fn load_config() -> anyhow::Result<Config> {
    let config = config::Config::builder()
        .add_source(config::File::with_name("logboard").required(false))
        .add_source(config::Environment::with_prefix("LOGBOARD").separator("__"))
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

pub fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    if !cfg.service.base_url.starts_with("http://") && !cfg.service.base_url.starts_with("https://")
    {
        anyhow::bail!(
            "Invalid service.base_url '{}': must start with http:// or https://",
            cfg.service.base_url
        );
    }

    if cfg.service.timeout_seconds == 0 {
        anyhow::bail!("service.timeout_seconds must be at least 1");
    }

    if !(0.5..=300.0).contains(&cfg.dashboard.poll_interval_seconds) {
        anyhow::bail!(
            "Invalid dashboard.poll_interval_seconds: {}. Must be between 0.5 and 300",
            cfg.dashboard.poll_interval_seconds
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = Config::default();
        assert!(validate_config(&cfg).is_ok());
        assert_eq!(cfg.service.base_url, "http://localhost:8081");
        assert_eq!(cfg.dashboard.poll_interval_seconds, 10.0);
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let mut cfg = Config::default();
        cfg.service.base_url = "localhost:8081".to_string();

        let result = validate_config(&cfg);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("must start with http"));
    }

    #[test]
    fn test_validate_rejects_bad_interval() {
        let mut cfg = Config::default();
        cfg.dashboard.poll_interval_seconds = 0.0;
        assert!(validate_config(&cfg).is_err());

        cfg.dashboard.poll_interval_seconds = 301.0;
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut cfg = Config::default();
        cfg.service.timeout_seconds = 0;
        assert!(validate_config(&cfg).is_err());
    }
}
