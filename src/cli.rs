use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "siteup",
    about = "Batch update orchestrator for managed sites - drive core, plugin and theme upgrades",
    version,
    author
)]
pub struct Cli {
    /// Base URL of the host admin update API
    #[arg(short = 'H', long)]
    pub host: String,

    /// Bearer token for the host admin API
    #[arg(short, long)]
    pub token: Option<String>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply a batch of core/plugin/theme updates
    Update {
        /// Path to a JSON file with 1-5 update requests
        #[arg(short, long, value_name = "FILE")]
        batch: String,

        /// Print the raw response contract as JSON instead of a report
        #[arg(long)]
        json: bool,
    },

    /// List pending updates without applying them
    Check {
        /// Restrict the listing to one kind (plugin | theme)
        #[arg(long, value_name = "KIND")]
        kind: Option<String>,
    },
}
