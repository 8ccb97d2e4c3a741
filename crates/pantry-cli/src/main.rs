//! Pantry CLI - Grocery preference analysis
//!
//! Usage:
//!   pantry analyze                  Fetch deliveries, infer preferences
//!   pantry analyze --from-history   Re-analyze the stored history
//!   pantry resolve melk             Preferred product for an intent
//!   pantry classify "Oude kaas"     Category of a product name
//!   pantry export --format json     Export top products

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = cli.config.as_deref();

    match cli.command {
        Commands::Analyze {
            from_history,
            no_save,
            json,
            max_deliveries,
        } => {
            commands::cmd_analyze(
                config,
                commands::AnalyzeArgs {
                    from_history,
                    no_save,
                    json,
                    max_deliveries,
                },
            )
            .await
        }
        Commands::Resolve { intent } => commands::cmd_resolve(config, &intent),
        Commands::Classify { name } => commands::cmd_classify(config, &name),
        Commands::Export { format, output } => {
            commands::cmd_export(config, &format, output.as_deref())
        }
    }
}
