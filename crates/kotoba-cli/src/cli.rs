//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Kotoba: vocabulary flashcards with LLM enrichment
#[derive(Parser)]
#[command(name = "kotoba")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding the word collection (default: platform data dir)
    #[arg(long, global = true, env = "KOTOBA_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Enrichment providers to try, in order (e.g. "deepseek,gemini")
    #[arg(long, global = true)]
    pub providers: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add one or more words
    Add {
        /// Words to add
        #[arg(value_name = "HEADWORD", required = true)]
        headwords: Vec<String>,

        /// Enrich pending words right away
        #[arg(long)]
        enrich: bool,

        /// Use the mock provider instead of the configured ones
        #[arg(long)]
        mock: bool,
    },

    /// List words, newest first
    List {
        /// Only words whose headword or meaning contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a word by id
    Remove {
        /// Word id (a unique prefix is enough)
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Show words due for review
    Due {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Enrich every pending word, one at a time
    Enrich {
        /// Use the mock provider instead of the configured ones
        #[arg(long)]
        mock: bool,
    },

    /// Review due words as flashcards
    Review {
        /// Maximum number of cards in this session
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show study statistics
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage the stored provider credential
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Run the JSON API server with background enrichment
    Serve {
        /// Port for web server
        #[arg(short, long, default_value = "4173")]
        port: u16,

        /// Use the mock provider instead of the configured ones
        #[arg(long)]
        mock: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show resolved configuration
    Show,

    /// Save the DeepSeek API key
    SetKey {
        #[arg(value_name = "KEY")]
        key: String,
    },

    /// Remove the saved DeepSeek API key
    ClearKey,
}
