//! Runtime configuration: data directory, provider order and credentials.
//!
//! Values resolve in this order, later sources winning:
//!
//! 1. Built-in defaults
//! 2. Environment (`KOTOBA_DATA_DIR`, `KOTOBA_PROVIDERS`, `KOTOBA_TIMEOUT_SECS`,
//!    `KOTOBA_GLOSS_LANGUAGE`, `DEEPSEEK_API_KEY`, `GEMINI_API_KEY` / `API_KEY`)
//! 3. The DeepSeek credential saved in the data directory, used only when
//!    the environment does not provide one
//! 4. Command-line flags (applied by the CLI)

use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;

use crate::enrichment::{
    DeepSeekProvider, GeminiProvider, MockProvider, ProviderChain, ProviderConfig, deepseek,
    gemini,
};
use crate::error::{KotobaError, Result};
use crate::slot::{CREDENTIAL_KEY, DurableSlot, FileSlot};

/// Which enrichment backend to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderKind {
    /// DeepSeek chat API (requires a credential)
    DeepSeek,
    /// Google Gemini (requires GEMINI_API_KEY)
    Gemini,
    /// Mock provider for testing
    Mock,
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deepseek" | "openai" => Ok(ProviderKind::DeepSeek),
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "mock" | "test" => Ok(ProviderKind::Mock),
            _ => Err(format!(
                "Unknown provider: {}. Use: deepseek, gemini, or mock.",
                s
            )),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::DeepSeek => write!(f, "deepseek"),
            ProviderKind::Gemini => write!(f, "gemini"),
            ProviderKind::Mock => write!(f, "mock"),
        }
    }
}

/// Endpoint settings for one HTTP provider.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

/// Top-level configuration.
#[derive(Debug, Clone)]
pub struct KotobaConfig {
    /// Directory holding the durable slot files.
    pub data_dir: PathBuf,
    /// Providers to try, in order.
    pub providers: Vec<ProviderKind>,
    pub deepseek: ProviderSettings,
    pub gemini: ProviderSettings,
    /// Per-request timeout for provider calls.
    pub timeout: Duration,
    /// Language the meaning and translation are written in.
    pub gloss_language: String,
}

impl Default for KotobaConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            providers: vec![ProviderKind::DeepSeek, ProviderKind::Gemini],
            deepseek: ProviderSettings {
                api_key: None,
                base_url: deepseek::DEFAULT_BASE_URL.to_string(),
                model: "deepseek-chat".to_string(),
            },
            gemini: ProviderSettings {
                api_key: None,
                base_url: gemini::DEFAULT_BASE_URL.to_string(),
                model: gemini::DEFAULT_MODEL.to_string(),
            },
            timeout: Duration::from_secs(60),
            gloss_language: ProviderConfig::default().gloss_language,
        }
    }
}

impl KotobaConfig {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(dir) = get("KOTOBA_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(list) = get("KOTOBA_PROVIDERS") {
            config.providers = parse_provider_list(&list)?;
        }
        if let Some(secs) = get("KOTOBA_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                KotobaError::Config(format!("KOTOBA_TIMEOUT_SECS is not a number: {}", secs))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(key) = get("DEEPSEEK_API_KEY") {
            config.deepseek.api_key = Some(key);
        }
        if let Some(url) = get("DEEPSEEK_BASE_URL") {
            config.deepseek.base_url = url;
        }
        if let Some(key) = get("GEMINI_API_KEY").or_else(|| get("API_KEY")) {
            config.gemini.api_key = Some(key);
        }
        if let Some(model) = get("GEMINI_MODEL") {
            config.gemini.model = model;
        }
        if let Some(language) = get("KOTOBA_GLOSS_LANGUAGE") {
            config.gloss_language = language.trim().to_string();
        }

        Ok(config)
    }

    /// Fill the DeepSeek credential from `slot` if none is set yet.
    pub fn with_stored_credential(mut self, slot: &dyn DurableSlot) -> Result<Self> {
        if self.deepseek.api_key.is_none() {
            self.deepseek.api_key = load_credential(slot)?;
        }
        Ok(self)
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_providers(mut self, providers: Vec<ProviderKind>) -> Self {
        self.providers = providers;
        self
    }

    /// The durable slot for this configuration.
    pub fn slot(&self) -> FileSlot {
        FileSlot::new(&self.data_dir)
    }

    /// Build the fallback chain in configured order.
    ///
    /// Providers without a credential are skipped, so the chain may be
    /// empty; enriching through an empty chain fails every word.
    pub fn build_provider_chain(&self) -> Result<ProviderChain> {
        let mut chain = ProviderChain::new();

        for kind in &self.providers {
            match kind {
                ProviderKind::DeepSeek => match &self.deepseek.api_key {
                    Some(key) => chain.push(Box::new(DeepSeekProvider::with_config(
                        key.clone(),
                        self.deepseek.base_url.clone(),
                        self.provider_config(&self.deepseek.model),
                    )?)),
                    None => debug!("no DeepSeek credential, skipping provider"),
                },
                ProviderKind::Gemini => match &self.gemini.api_key {
                    Some(key) => chain.push(Box::new(GeminiProvider::with_config(
                        key.clone(),
                        self.gemini.base_url.clone(),
                        self.provider_config(&self.gemini.model),
                    )?)),
                    None => debug!("no Gemini credential, skipping provider"),
                },
                ProviderKind::Mock => chain.push(Box::new(MockProvider::new())),
            }
        }

        Ok(chain)
    }

    fn provider_config(&self, model: &str) -> ProviderConfig {
        ProviderConfig::default()
            .with_model(model)
            .with_timeout(self.timeout)
            .with_gloss_language(&self.gloss_language)
    }
}

/// Parse a comma-separated provider list such as `"deepseek,gemini"`.
pub fn parse_provider_list(list: &str) -> Result<Vec<ProviderKind>> {
    list.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.parse::<ProviderKind>().map_err(KotobaError::Config))
        .collect()
}

/// Platform data directory for Kotoba (e.g. `~/.local/share/kotoba`).
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kotoba")
}

/// Read the saved DeepSeek credential.
pub fn load_credential(slot: &dyn DurableSlot) -> Result<Option<String>> {
    Ok(slot
        .read(CREDENTIAL_KEY)?
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty()))
}

/// Save the DeepSeek credential. A blank key clears it.
pub fn store_credential(slot: &dyn DurableSlot, key: &str) -> Result<()> {
    let key = key.trim();
    if key.is_empty() {
        slot.remove(CREDENTIAL_KEY)
    } else {
        slot.write(CREDENTIAL_KEY, key)
    }
}

/// Mask a credential for display, keeping the last four characters.
pub fn mask_credential(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}
