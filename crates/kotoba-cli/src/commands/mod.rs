//! CLI command implementations.

pub mod add;
pub mod config;
pub mod enrich;
pub mod list;
pub mod remove;
pub mod review;
pub mod serve;
pub mod stats;

use std::path::PathBuf;

use colored::Colorize;
use kotoba::config::parse_provider_list;
use kotoba::{KotobaConfig, ProviderKind, Word, WordStatus, WordStore};

/// Flags shared by every command.
pub struct Options {
    pub data_dir: Option<PathBuf>,
    pub providers: Option<String>,
    pub verbose: bool,
}

impl Options {
    /// Resolve configuration: defaults, environment, saved credential, flags.
    pub fn config(&self, mock: bool) -> Result<KotobaConfig, Box<dyn std::error::Error>> {
        let mut config = KotobaConfig::from_env()?;

        if let Some(dir) = &self.data_dir {
            config = config.with_data_dir(dir.clone());
        }
        let slot = config.slot();
        config = config.with_stored_credential(&slot)?;

        if let Some(list) = &self.providers {
            config = config.with_providers(parse_provider_list(list)?);
        }
        if mock {
            config = config.with_providers(vec![ProviderKind::Mock]);
        }

        Ok(config)
    }

    /// Open the word store for the resolved data directory.
    pub fn open_store(&self) -> Result<(KotobaConfig, WordStore), Box<dyn std::error::Error>> {
        let config = self.config(false)?;
        let store = WordStore::open(config.slot());
        Ok((config, store))
    }
}

/// Find a word by full id or unique id prefix.
pub fn resolve_id(store: &WordStore, id: &str) -> Result<String, Box<dyn std::error::Error>> {
    if store.get(id).is_some() {
        return Ok(id.to_string());
    }

    let matches: Vec<&Word> = store
        .list()
        .iter()
        .filter(|w| w.id.starts_with(id))
        .collect();

    match matches.as_slice() {
        [word] => Ok(word.id.clone()),
        [] => Err(format!("No word with id {}", id).into()),
        _ => Err(format!("Id prefix {} matches {} words", id, matches.len()).into()),
    }
}

/// One-line summary used by list-style output.
pub fn word_line(word: &Word) -> String {
    let status = match word.status {
        WordStatus::Pending => word.status.label().yellow(),
        WordStatus::Completed => word.status.label().green(),
        WordStatus::Failed => word.status.label().red(),
    };

    format!(
        "{}  {:<8} {:<12} {:<4} {} {}  {}",
        short_id(&word.id).dimmed(),
        word.headword.white().bold(),
        word.reading,
        word.level.label(),
        "★".repeat(word.mastery_level.level() as usize).yellow(),
        status,
        word.meaning
    )
}

pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
