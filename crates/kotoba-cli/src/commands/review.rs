//! Review command - flashcard session over due words.

use std::io::{self, BufRead, Write};

use chrono::Utc;
use colored::Colorize;
use kotoba::{ReviewSession, SessionState, Word, WordStatus, WordStore};

use super::Options;

pub fn run(limit: Option<usize>, opts: &Options) -> Result<(), Box<dyn std::error::Error>> {
    let (_, mut store) = opts.open_store()?;

    let mut session = ReviewSession::due(&store, Utc::now());
    if let Some(limit) = limit {
        session = session.with_limit(limit);
    }

    if session.total() == 0 {
        println!("{}", "Nothing due. Come back later!".green());
        return Ok(());
    }

    println!(
        "{} {} cards. Enter flips a card; answer {} or {}, {} quits.",
        "Reviewing".cyan().bold(),
        session.total().to_string().white().bold(),
        "y".green(),
        "n".red(),
        "q".yellow()
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    run_session(&mut store, &mut session, stdin.lock(), stdout.lock())?;

    match session.state() {
        SessionState::Complete { correct, incorrect } => {
            println!();
            println!(
                "{} {} remembered, {} to revisit",
                "Session complete:".green().bold(),
                correct.to_string().green(),
                incorrect.to_string().red()
            );
        }
        SessionState::InProgress { position, total } => {
            println!();
            println!("{} after {}/{} cards", "Stopped".yellow(), position, total);
        }
    }

    Ok(())
}

/// Drive `session` from line-oriented input, recording judgments in `store`.
///
/// Ends when the session completes, on `q`, or at end of input.
fn run_session(
    store: &mut WordStore,
    session: &mut ReviewSession,
    mut input: impl BufRead,
    mut out: impl Write,
) -> io::Result<()> {
    let mut line = String::new();

    while let Some(word) = session.current().cloned() {
        if let SessionState::InProgress { position, total } = session.state() {
            writeln!(out)?;
            writeln!(out, "{}", format!("[{}/{}]", position + 1, total).dimmed())?;
        }
        show_front(&mut out, &word)?;

        line.clear();
        if input.read_line(&mut line)? == 0 || line.trim() == "q" {
            return Ok(());
        }

        show_back(&mut out, &word)?;

        let correct = loop {
            write!(out, "Remembered? [y/n/q] ")?;
            out.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                return Ok(());
            }
            match line.trim().to_lowercase().as_str() {
                "y" | "yes" => break true,
                "n" | "no" => break false,
                "q" => return Ok(()),
                _ => continue,
            }
        };

        session.answer_into(store, correct, Utc::now());
        if let Some(updated) = store.get(&word.id) {
            writeln!(
                out,
                "  mastery {} → next review {}",
                updated.mastery_level,
                updated
                    .next_review_date
                    .with_timezone(&chrono::Local)
                    .format("%Y-%m-%d")
            )?;
        }
    }

    Ok(())
}

fn show_front(out: &mut impl Write, word: &Word) -> io::Result<()> {
    writeln!(out, "  {}  {}", word.headword.white().bold(), word.level.label().dimmed())?;
    write!(out, "  {} ", "(Enter to flip)".dimmed())?;
    out.flush()
}

fn show_back(out: &mut impl Write, word: &Word) -> io::Result<()> {
    if word.status == WordStatus::Pending {
        writeln!(out, "  {}", "still being enriched".yellow())?;
    }
    writeln!(out, "  {}  {}", word.reading.cyan(), word.meaning)?;
    if let Some(example) = &word.example {
        writeln!(out, "  {}", example)?;
    }
    if let Some(translation) = &word.example_translation {
        writeln!(out, "  {}", translation.dimmed())?;
    }
    if let Some(mnemonic) = &word.mnemonic {
        writeln!(out, "  {} {}", "Tip:".yellow(), mnemonic)?;
    }
    Ok(())
}
