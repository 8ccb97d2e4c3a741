//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Pantry - Learn what your household actually buys
#[derive(Parser)]
#[command(name = "pantry")]
#[command(about = "Grocery delivery history to shopping preferences", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to ~/.local/share/pantry/config.toml, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch delivery history and infer per-category preferences
    ///
    /// Requires PICNIC_AUTH_TOKEN unless --from-history is given.
    Analyze {
        /// Re-analyze the stored history snapshot instead of fetching
        #[arg(long)]
        from_history: bool,

        /// Don't write history and preference snapshots
        #[arg(long)]
        no_save: bool,

        /// Print the full analysis as JSON
        #[arg(long)]
        json: bool,

        /// Only fetch this many of the most recent deliveries
        #[arg(long)]
        max_deliveries: Option<usize>,
    },

    /// Resolve a vague intent ("melk", "milk") to the preferred product
    Resolve {
        /// What you want to buy
        intent: String,
    },

    /// Show which category a product name falls into
    Classify {
        /// Product name to classify
        name: String,
    },

    /// Export the top products of the stored history
    Export {
        /// Output format: csv, json
        #[arg(short, long, default_value = "csv")]
        format: String,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
