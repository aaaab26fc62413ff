//! Enrich command - run pending words through the provider chain.

use colored::Colorize;
use kotoba::{EnrichmentProvider, LifecycleScheduler, WordStatus, WordStore};

use super::Options;

pub fn run(mock: bool, opts: &Options) -> Result<(), Box<dyn std::error::Error>> {
    let config = opts.config(mock)?;
    let mut store = WordStore::open(config.slot());
    let chain = config.build_provider_chain()?;

    let pending = store.pending().len();
    if pending == 0 {
        println!("{}", "No pending words.".green());
        return Ok(());
    }

    if chain.is_empty() {
        eprintln!(
            "{} no provider has a credential; set DEEPSEEK_API_KEY, GEMINI_API_KEY or run {}",
            "Warning:".yellow(),
            "kotoba config set-key".cyan()
        );
    } else if opts.verbose {
        println!("Providers: {}", chain.names().join(" → "));
    }

    println!(
        "{} {} pending words",
        "Enriching".cyan().bold(),
        pending.to_string().white().bold()
    );

    let (completed, failed) = enrich_all(&mut store, &chain);

    println!();
    println!(
        "{} {} completed, {} failed",
        "Done:".green().bold(),
        completed.to_string().green(),
        failed.to_string().red()
    );

    if failed > 0 {
        println!(
            "Failed words keep their headword; fix them by hand or remove and re-add."
        );
    }

    Ok(())
}

/// Enrich one word at a time, printing each result as it lands.
fn enrich_all(store: &mut WordStore, provider: &dyn EnrichmentProvider) -> (usize, usize) {
    let mut scheduler = LifecycleScheduler::new();
    let (mut completed, mut failed) = (0, 0);

    while let Some(job) = scheduler.begin(store) {
        let outcome = job.run(provider);
        let Some(word) = scheduler.finish(store, job, outcome) else {
            continue;
        };

        match word.status {
            WordStatus::Completed => {
                completed += 1;
                println!(
                    "  {} {} {} {}",
                    "✓".green(),
                    word.headword.white().bold(),
                    word.reading,
                    word.meaning
                );
            }
            WordStatus::Failed => {
                failed += 1;
                println!("  {} {}", "✗".red(), word.headword.white().bold());
            }
            WordStatus::Pending => {}
        }
    }

    (completed, failed)
}
