//! Enrichment providers: fill in reading, meaning, example, translation and
//! mnemonic for a headword.
//!
//! # Supported Providers
//!
//! - **DeepSeek** - OpenAI-compatible chat API (requires `DEEPSEEK_API_KEY`
//!   or a stored credential)
//! - **Gemini** - Google `generateContent` (requires `GEMINI_API_KEY`)
//! - **Mock** - Canned responses, no network
//!
//! Providers compose through [`ProviderChain`], which tries them in order
//! and returns the first success.
//!
//! # Example
//!
//! ```no_run
//! use kotoba::enrichment::{DeepSeekProvider, EnrichmentProvider, GeminiProvider, ProviderChain};
//!
//! let chain = ProviderChain::new()
//!     .with(DeepSeekProvider::from_env().unwrap())
//!     .with(GeminiProvider::from_env().unwrap());
//!
//! let entry = chain.enrich("猫").unwrap();
//! println!("{} - {}", entry.reading, entry.meaning);
//! ```

mod chain;
pub mod deepseek;
pub mod gemini;
mod mock;
mod prompts;
mod provider;

pub use chain::ProviderChain;
pub use deepseek::DeepSeekProvider;
pub use gemini::GeminiProvider;
pub use mock::MockProvider;
pub use prompts::parse_enrichment;
pub use provider::{EnrichmentProvider, ProviderConfig};
