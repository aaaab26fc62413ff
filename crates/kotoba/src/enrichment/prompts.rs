//! Prompt templates and response parsing for enrichment calls.

use serde_json::{Value, json};

use crate::error::{KotobaError, Result};
use crate::word::Enrichment;

use super::provider::ProviderConfig;

/// System prompt for all enrichment calls.
pub fn system_prompt() -> &'static str {
    "You are a Japanese dictionary assistant. Reply with a single JSON object \
     and nothing else: no prose, no markdown code fences."
}

/// Build the user prompt for one headword.
pub fn enrichment_prompt(headword: &str, config: &ProviderConfig) -> String {
    format!(
        r#"Describe the Japanese word "{headword}".

Return a JSON object with exactly these string fields:
- "reading": the reading in hiragana
- "meaning": the meaning in {lang}
- "example": a natural Japanese example sentence using the word
- "exampleTranslation": the example sentence translated into {lang}
- "mnemonic": a short memory aid, written in {lang}

Do not add any other fields."#,
        headword = headword,
        lang = config.gloss_language,
    )
}

/// JSON schema for the enrichment object, in the OpenAPI subset Gemini
/// accepts.
pub fn enrichment_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "reading": { "type": "STRING" },
            "meaning": { "type": "STRING" },
            "example": { "type": "STRING" },
            "exampleTranslation": { "type": "STRING" },
            "mnemonic": { "type": "STRING" }
        },
        "required": ["reading", "meaning", "example", "exampleTranslation", "mnemonic"]
    })
}

/// Parse generated text into an enrichment.
///
/// The raw text is tried first; a markdown code block is unwrapped only
/// when that fails.
pub fn parse_enrichment(response: &str) -> Result<Enrichment> {
    let raw = response.trim();
    let first_err = match serde_json::from_str(raw) {
        Ok(enrichment) => return Ok(enrichment),
        Err(e) => e,
    };

    let fenced = if raw.contains("```json") {
        raw.split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
    } else {
        raw.split("```").nth(1)
    };

    let err = match fenced.map(|s| serde_json::from_str(s.trim())) {
        Some(Ok(enrichment)) => return Ok(enrichment),
        Some(Err(e)) => e,
        None => first_err,
    };
    Err(KotobaError::MalformedResponse(format!(
        "not an enrichment object: {}",
        err
    )))
}
