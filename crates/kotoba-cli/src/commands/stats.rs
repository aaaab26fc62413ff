//! Stats command - show study progress.

use chrono::Utc;
use colored::Colorize;
use kotoba::StudyStats;

use super::Options;

pub fn run(json_output: bool, opts: &Options) -> Result<(), Box<dyn std::error::Error>> {
    let (_, store) = opts.open_store()?;
    let stats = StudyStats::collect(store.list(), Utc::now());

    if json_output {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", "Study statistics".cyan().bold());
    println!();

    let bar_width = 30;
    let filled = (stats.mastered_ratio() * bar_width as f64).round() as usize;
    let bar: String = "█".repeat(filled) + &"░".repeat(bar_width - filled);
    println!(
        "Mastered: {} {}/{} ({:.0}%)",
        bar.cyan(),
        stats.mastered.to_string().white().bold(),
        stats.total,
        stats.mastered_ratio() * 100.0
    );
    println!("Due now:  {}", stats.due.to_string().yellow().bold());
    println!();

    println!("{}", "Enrichment:".yellow().bold());
    println!("  {} completed", stats.by_status.completed.to_string().green());
    println!("  {} pending", stats.by_status.pending.to_string().yellow());
    println!("  {} failed", stats.by_status.failed.to_string().red());
    println!();

    println!("{}", "Mastery:".yellow().bold());
    let widest = stats.mastery_distribution.iter().copied().max().unwrap_or(0).max(1);
    for (level, count) in stats.mastery_distribution.iter().enumerate() {
        let width = count * 20 / widest;
        println!("  {} {:<20} {}", level, "▇".repeat(width).cyan(), count);
    }

    if !stats.by_level.is_empty() {
        println!();
        println!("{}", "JLPT level:".yellow().bold());
        for (level, count) in &stats.by_level {
            println!("  {:<6} {}", level, count);
        }
    }

    Ok(())
}
