//! List and due commands - show the collection.

use chrono::Utc;
use colored::Colorize;
use kotoba::Word;

use super::{Options, word_line};

pub fn run(
    search: Option<String>,
    json_output: bool,
    opts: &Options,
) -> Result<(), Box<dyn std::error::Error>> {
    let (_, store) = opts.open_store()?;

    let words: Vec<&Word> = match &search {
        Some(query) => store.search(query),
        None => store.list().iter().collect(),
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&words)?);
        return Ok(());
    }

    if words.is_empty() {
        match search {
            Some(query) => println!("No words match {}", query.white().bold()),
            None => println!("No words yet. Add one with {}", "kotoba add <HEADWORD>".cyan()),
        }
        return Ok(());
    }

    for word in &words {
        println!("{}", word_line(word));
        if opts.verbose {
            if let Some(example) = &word.example {
                println!("          {}", example.dimmed());
            }
        }
    }
    println!();
    println!("{} of {} words", words.len(), store.len());

    Ok(())
}

pub fn run_due(json_output: bool, opts: &Options) -> Result<(), Box<dyn std::error::Error>> {
    let (_, store) = opts.open_store()?;
    let now = Utc::now();
    let due = store.find_due(now);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&due)?);
        return Ok(());
    }

    if due.is_empty() {
        let next = store.list().iter().map(|w| w.next_review_date).min();
        match next {
            Some(at) => println!(
                "{} Next review {}",
                "Nothing due.".green(),
                at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M")
            ),
            None => println!("{}", "Nothing due.".green()),
        }
        return Ok(());
    }

    println!("{} {}", due.len().to_string().white().bold(), "words due for review".cyan().bold());
    println!();
    for word in &due {
        println!("{}", word_line(word));
    }

    Ok(())
}
