//! The word entity and its field types.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Meaning shown while a word waits for enrichment.
pub const MEANING_PLACEHOLDER: &str = "正在解析...";

/// Category assigned to new words.
pub const DEFAULT_CATEGORY: &str = "通用";

/// JLPT level tag.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum JlptLevel {
    N1,
    N2,
    #[default]
    N3,
    N4,
    N5,
    Other,
}

impl JlptLevel {
    /// All levels, in display order.
    pub const ALL: [JlptLevel; 6] = [
        JlptLevel::N1,
        JlptLevel::N2,
        JlptLevel::N3,
        JlptLevel::N4,
        JlptLevel::N5,
        JlptLevel::Other,
    ];

    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            JlptLevel::N1 => "N1",
            JlptLevel::N2 => "N2",
            JlptLevel::N3 => "N3",
            JlptLevel::N4 => "N4",
            JlptLevel::N5 => "N5",
            JlptLevel::Other => "Other",
        }
    }
}

impl std::str::FromStr for JlptLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "N1" => Ok(JlptLevel::N1),
            "N2" => Ok(JlptLevel::N2),
            "N3" => Ok(JlptLevel::N3),
            "N4" => Ok(JlptLevel::N4),
            "N5" => Ok(JlptLevel::N5),
            "OTHER" => Ok(JlptLevel::Other),
            _ => Err(format!("Unknown level: {}. Use N1-N5 or Other.", s)),
        }
    }
}

impl std::fmt::Display for JlptLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Enrichment status of a word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordStatus {
    /// Waiting for the enrichment provider.
    #[default]
    Pending,
    /// Enrichment succeeded.
    Completed,
    /// Enrichment failed; the word keeps its creation defaults.
    Failed,
}

impl WordStatus {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            WordStatus::Pending => "pending",
            WordStatus::Completed => "completed",
            WordStatus::Failed => "failed",
        }
    }

    /// Completed and failed are both terminal.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, WordStatus::Pending)
    }
}

/// Recall strength, always within `0..=5`.
///
/// Values outside the range are clamped on construction and on
/// deserialization, so a hand-edited blob cannot break the invariant.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(from = "i64", into = "u8")]
pub struct Mastery(u8);

impl Mastery {
    pub const MIN: Mastery = Mastery(0);
    pub const MAX: Mastery = Mastery(5);

    /// Build a mastery level, clamping into `0..=5`.
    pub fn new(level: i64) -> Self {
        Mastery(level.clamp(Self::MIN.0 as i64, Self::MAX.0 as i64) as u8)
    }

    pub fn level(self) -> u8 {
        self.0
    }

    /// One level up, saturating at 5.
    pub fn raised(self) -> Self {
        Self::new(self.0 as i64 + 1)
    }

    /// One level down, saturating at 0.
    pub fn lowered(self) -> Self {
        Self::new(self.0 as i64 - 1)
    }

    /// Review interval for this level: `2^level` days.
    pub fn interval(self) -> Duration {
        Duration::days(1_i64 << self.0)
    }

    pub fn is_mastered(self) -> bool {
        self == Self::MAX
    }
}

impl From<i64> for Mastery {
    fn from(level: i64) -> Self {
        Mastery::new(level)
    }
}

impl From<Mastery> for u8 {
    fn from(mastery: Mastery) -> Self {
        mastery.0
    }
}

impl std::fmt::Display for Mastery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The five fields an enrichment provider fills in.
///
/// Providers must answer with exactly these fields; anything else is
/// rejected as malformed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Enrichment {
    /// Reading in hiragana.
    pub reading: String,
    /// Meaning in the learner's language.
    pub meaning: String,
    /// Example sentence using the headword.
    pub example: String,
    /// Translation of the example sentence.
    pub example_translation: String,
    /// Memory aid.
    pub mnemonic: String,
}

/// A vocabulary entry.
///
/// Collections saved before `status` existed load with every word
/// `completed`; missing tags fall back to the creation defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    /// Unique identifier, assigned at creation.
    pub id: String,

    /// The text the user typed.
    #[serde(rename = "kanji")]
    pub headword: String,

    #[serde(default)]
    pub reading: String,

    #[serde(default)]
    pub meaning: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_translation: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mnemonic: Option<String>,

    #[serde(default = "default_category")]
    pub category: String,

    #[serde(default)]
    pub level: JlptLevel,

    #[serde(default)]
    pub mastery_level: Mastery,

    /// When the word is next due for review.
    pub next_review_date: DateTime<Utc>,

    pub created_at: DateTime<Utc>,

    #[serde(default = "legacy_status")]
    pub status: WordStatus,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn legacy_status() -> WordStatus {
    WordStatus::Completed
}

impl Word {
    /// Create a pending word that is due immediately.
    ///
    /// The headword is stored as given; callers trim it first.
    pub fn new(headword: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            headword: headword.into(),
            reading: String::new(),
            meaning: MEANING_PLACEHOLDER.to_string(),
            example: None,
            example_translation: None,
            mnemonic: None,
            category: DEFAULT_CATEGORY.to_string(),
            level: JlptLevel::default(),
            mastery_level: Mastery::MIN,
            next_review_date: now,
            created_at: now,
            status: WordStatus::Pending,
        }
    }

    /// Whether the word is due at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_date <= now
    }

    /// Merge enrichment fields in and mark the word completed.
    pub fn complete(&mut self, enrichment: Enrichment) {
        self.reading = enrichment.reading;
        self.meaning = enrichment.meaning;
        self.example = Some(enrichment.example);
        self.example_translation = Some(enrichment.example_translation);
        self.mnemonic = Some(enrichment.mnemonic);
        self.status = WordStatus::Completed;
    }

    /// Mark the word failed, leaving every other field untouched.
    pub fn fail(&mut self) {
        self.status = WordStatus::Failed;
    }
}

/// Partial update for a word. `None` fields are left as they are.
///
/// `id`, `headword` and `createdAt` are immutable and have no patch field.
/// Neither does `status`: only enrichment moves a word out of pending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct WordPatch {
    pub reading: Option<String>,
    pub meaning: Option<String>,
    pub example: Option<String>,
    pub example_translation: Option<String>,
    pub mnemonic: Option<String>,
    pub category: Option<String>,
    pub level: Option<JlptLevel>,
    pub mastery_level: Option<Mastery>,
    pub next_review_date: Option<DateTime<Utc>>,
}

impl WordPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_meaning(mut self, meaning: impl Into<String>) -> Self {
        self.meaning = Some(meaning.into());
        self
    }

    pub fn with_reading(mut self, reading: impl Into<String>) -> Self {
        self.reading = Some(reading.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_level(mut self, level: JlptLevel) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_mastery(mut self, mastery: Mastery) -> Self {
        self.mastery_level = Some(mastery);
        self
    }

    pub fn with_next_review(mut self, at: DateTime<Utc>) -> Self {
        self.next_review_date = Some(at);
        self
    }

    /// True when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the patch to a word.
    pub fn apply_to(self, word: &mut Word) {
        if let Some(reading) = self.reading {
            word.reading = reading;
        }
        if let Some(meaning) = self.meaning {
            word.meaning = meaning;
        }
        if let Some(example) = self.example {
            word.example = Some(example);
        }
        if let Some(translation) = self.example_translation {
            word.example_translation = Some(translation);
        }
        if let Some(mnemonic) = self.mnemonic {
            word.mnemonic = Some(mnemonic);
        }
        if let Some(category) = self.category {
            word.category = category;
        }
        if let Some(level) = self.level {
            word.level = level;
        }
        if let Some(mastery) = self.mastery_level {
            word.mastery_level = mastery;
        }
        if let Some(at) = self.next_review_date {
            word.next_review_date = at;
        }
    }
}
