//! Remove command - delete a word.

use colored::Colorize;

use super::{Options, resolve_id};

pub fn run(id: String, opts: &Options) -> Result<(), Box<dyn std::error::Error>> {
    let (_, mut store) = opts.open_store()?;
    let id = resolve_id(&store, &id)?;

    let removed = store
        .remove(&id)
        .ok_or_else(|| format!("No word with id {}", id))?;

    println!(
        "{} {} ({})",
        "Removed".red().bold(),
        removed.headword.white().bold(),
        removed.meaning
    );
    Ok(())
}
