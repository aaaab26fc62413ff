//! Kotoba CLI - vocabulary flashcards with LLM enrichment.

mod cli;
mod commands;
mod server;

use clap::Parser;
use cli::{Cli, Commands};
use commands::Options;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let opts = Options {
        data_dir: cli.data_dir,
        providers: cli.providers,
        verbose: cli.verbose,
    };

    let result = match cli.command {
        Commands::Add {
            headwords,
            enrich,
            mock,
        } => commands::add::run(headwords, enrich, mock, &opts),

        Commands::List { search, json } => commands::list::run(search, json, &opts),

        Commands::Remove { id } => commands::remove::run(id, &opts),

        Commands::Due { json } => commands::list::run_due(json, &opts),

        Commands::Enrich { mock } => commands::enrich::run(mock, &opts),

        Commands::Review { limit } => commands::review::run(limit, &opts),

        Commands::Stats { json } => commands::stats::run(json, &opts),

        Commands::Config { action } => commands::config::run(action, &opts),

        Commands::Serve { port, mock } => commands::serve::run(port, mock, &opts),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "kotoba=debug,info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
