//! Quarry CLI - resolve template modules into a reproducible set
//!
//! Usage: quarry <COMMAND>
//!
//! Commands:
//!   resolve  Resolve every module of the manifest and print the result
//!   lock     Resolve and write the lockfile

mod cli;
mod commands;
mod logging;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.config.as_deref();
    match &cli.command {
        Commands::Resolve(args) => commands::cmd_resolve(args, false, cli.json, config),
        Commands::Lock(args) => commands::cmd_resolve(args, true, cli.json, config),
    }
}
