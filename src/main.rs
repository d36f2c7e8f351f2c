use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use logboard::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    init_tracing();

    match args.get_command() {
        cli::Commands::Dashboard { interval, url } => {
            commands::dashboard::execute(interval, url).await?;
        }
        cli::Commands::Snapshot { url, cumulative } => {
            commands::snapshot::execute(url, cumulative).await?;
        }
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show()?,
            cli::ConfigCommands::Validate => commands::config::validate()?,
        },
        cli::Commands::Version => {
            println!("logboard v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
