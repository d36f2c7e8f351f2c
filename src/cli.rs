use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "logboard", version, about = "Log statistics dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the interactive dashboard (default)
    Dashboard {
        /// Poll interval in seconds
        #[arg(short, long)]
        interval: Option<f64>,

        /// Stats service base URL (overrides config)
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Fetch current stats once and print them
    Snapshot {
        /// Stats service base URL (overrides config)
        #[arg(short, long)]
        url: Option<String>,

        /// Fetch lifetime totals instead of the current window
        #[arg(short, long)]
        cumulative: bool,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display the effective configuration
    Show,

    /// Validate the configuration file
    Validate,
}

impl Cli {
    /// Get the command to execute, defaulting to Dashboard if none provided
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Dashboard {
            interval: None,
            url: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_dashboard() {
        let cli = Cli { command: None };

        match cli.get_command() {
            Commands::Dashboard { interval, url } => {
                assert!(interval.is_none());
                assert!(url.is_none());
            }
            _ => panic!("Expected Dashboard command"),
        }
    }

    #[test]
    fn test_cli_parsing_dashboard_with_interval() {
        let args = vec!["logboard", "dashboard", "--interval", "5"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.get_command() {
            Commands::Dashboard { interval, .. } => {
                assert_eq!(interval, Some(5.0));
            }
            _ => panic!("Expected Dashboard command"),
        }
    }

    #[test]
    fn test_cli_parsing_snapshot_cumulative() {
        let args = vec!["logboard", "snapshot", "--cumulative"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.get_command() {
            Commands::Snapshot { cumulative, .. } => assert!(cumulative),
            _ => panic!("Expected Snapshot command"),
        }
    }

    #[test]
    fn test_cli_parsing_config_show() {
        let args = vec!["logboard", "config", "show"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.get_command() {
            Commands::Config { action } => {
                matches!(action, ConfigCommands::Show);
            }
            _ => panic!("Expected Config command"),
        }
    }
}
