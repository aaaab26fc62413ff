//! Serve command - run the JSON API with background enrichment.

use std::sync::Arc;

use colored::Colorize;
use kotoba::WordStore;

use super::Options;
use crate::server::{app, state::AppState};

pub fn run(port: u16, mock: bool, opts: &Options) -> Result<(), Box<dyn std::error::Error>> {
    let config = opts.config(mock)?;
    let store = WordStore::open(config.slot());
    let chain = config.build_provider_chain()?;

    if chain.is_empty() {
        eprintln!(
            "{} no provider has a credential; new words will be marked failed",
            "Warning:".yellow()
        );
    }

    let providers = chain.names().join(" → ");
    let pending = store.pending().len();
    let total = store.len();
    let state = AppState::new(store, Arc::new(chain));

    let url = format!("http://localhost:{}/api", port);
    println!();
    println!(
        "{} {}",
        "Starting Kotoba server at".cyan().bold(),
        url.white().bold()
    );
    println!();
    println!("  Data dir:  {}", config.data_dir.display());
    println!("  Words:     {} ({} pending)", total, pending);
    if !providers.is_empty() {
        println!("  Providers: {}", providers);
    }
    println!();
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    // Every change is already persisted, so shutdown needs no save.
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(app::run_server(state, port))?;

    println!("{}", "Server stopped.".yellow());
    Ok(())
}
