//! Config command - manage the saved provider credential.

use colored::Colorize;
use kotoba::config::{load_credential, mask_credential, store_credential};

use super::Options;
use crate::cli::ConfigAction;

pub fn run(action: ConfigAction, opts: &Options) -> Result<(), Box<dyn std::error::Error>> {
    let config = opts.config(false)?;
    let slot = config.slot();

    match action {
        ConfigAction::Show => {
            let saved = load_credential(&slot)?;
            let key_source = match (&config.deepseek.api_key, &saved) {
                (None, _) => "not set",
                (Some(key), Some(stored)) if key == stored => "saved",
                (Some(_), _) => "environment",
            };

            println!("{}", "Configuration".cyan().bold());
            println!();
            println!("  Data dir:   {}", config.data_dir.display());
            println!(
                "  Providers:  {}",
                config
                    .providers
                    .iter()
                    .map(|p| p.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            println!("  Timeout:    {}s", config.timeout.as_secs());
            println!("  Glosses in: {}", config.gloss_language);
            println!();
            println!("  DeepSeek:   {} ({})", show_key(&config.deepseek.api_key), key_source);
            println!("    model     {}", config.deepseek.model);
            println!("    base url  {}", config.deepseek.base_url);
            println!("  Gemini:     {}", show_key(&config.gemini.api_key));
            println!("    model     {}", config.gemini.model);
        }
        ConfigAction::SetKey { key } => {
            if key.trim().is_empty() {
                return Err("Key is blank; use 'kotoba config clear-key' to remove it".into());
            }
            store_credential(&slot, &key)?;
            println!(
                "{} DeepSeek key {}",
                "Saved".green().bold(),
                mask_credential(key.trim())
            );
        }
        ConfigAction::ClearKey => {
            store_credential(&slot, "")?;
            println!("{} saved DeepSeek key", "Cleared".yellow().bold());
        }
    }

    Ok(())
}

fn show_key(key: &Option<String>) -> String {
    match key {
        Some(key) => mask_credential(key).green().to_string(),
        None => "not set".red().to_string(),
    }
}
