//! Add command - add headwords to the collection.

use colored::Colorize;

use super::{Options, enrich, short_id};

pub fn run(
    headwords: Vec<String>,
    enrich_now: bool,
    mock: bool,
    opts: &Options,
) -> Result<(), Box<dyn std::error::Error>> {
    let (_, mut store) = opts.open_store()?;

    let mut added = 0;
    for input in &headwords {
        match store.add(input) {
            Some(word) => {
                added += 1;
                println!(
                    "{} {} {}",
                    "Added".green().bold(),
                    word.headword.white().bold(),
                    short_id(&word.id).dimmed()
                );
            }
            None => eprintln!("{} skipping blank headword", "Warning:".yellow()),
        }
    }

    if added == 0 {
        return Err("Nothing to add".into());
    }

    if enrich_now {
        println!();
        enrich::run(mock, opts)?;
    } else {
        println!();
        println!("Run {} to fill in readings and meanings.", "kotoba enrich".cyan());
    }

    Ok(())
}
