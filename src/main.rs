mod batch;
mod cli;
mod error;
mod host;
mod orchestrator;
mod utils;
mod workflow;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use std::process;

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        unsafe {
            std::env::set_var("SITEUP_VERBOSE", "1");
        }
    }

    let result = match cli.command {
        Commands::Update { batch, json } => {
            workflow::execute_update(&cli.host, cli.token.as_deref(), &batch, json)
        }
        Commands::Check { kind } => {
            workflow::execute_check(&cli.host, cli.token.as_deref(), kind.as_deref())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}
