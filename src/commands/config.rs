//! Configuration management commands

use anyhow::Result;

use logboard::config;

/// Display the effective configuration (file + env overrides + defaults)
pub fn show() -> Result<()> {
    let cfg = config::load_config()?;
    println!("{}", toml::to_string_pretty(&cfg)?);
    Ok(())
}

/// Validate the configuration file
pub fn validate() -> Result<()> {
    let cfg = config::load_config()?;
    config::validate_config(&cfg)?;
    println!("Configuration is valid");
    println!("  service url:   {}", cfg.service.base_url);
    println!("  poll interval: {}s", cfg.dashboard.poll_interval_seconds);
    Ok(())
}
