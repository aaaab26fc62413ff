//! Summary numbers over a word collection.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::word::{JlptLevel, Word, WordStatus};

/// Counts of words by enrichment status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub completed: usize,
    pub failed: usize,
}

/// Study statistics for the stats view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyStats {
    /// Total number of words.
    pub total: usize,
    /// Words due for review now.
    pub due: usize,
    /// Words at the top mastery level.
    pub mastered: usize,
    pub by_status: StatusCounts,
    /// Index `i` holds the number of words at mastery level `i`.
    pub mastery_distribution: [usize; 6],
    /// Words per JLPT level, only levels that occur, sorted by label.
    pub by_level: IndexMap<String, usize>,
}

impl StudyStats {
    /// Compute statistics over `words` at `now`.
    pub fn collect<'a>(words: impl IntoIterator<Item = &'a Word>, now: DateTime<Utc>) -> Self {
        let mut stats = StudyStats {
            total: 0,
            due: 0,
            mastered: 0,
            by_status: StatusCounts::default(),
            mastery_distribution: [0; 6],
            by_level: IndexMap::new(),
        };
        let mut level_counts = [0usize; JlptLevel::ALL.len()];

        for word in words {
            stats.total += 1;
            if word.is_due(now) {
                stats.due += 1;
            }
            if word.mastery_level.is_mastered() {
                stats.mastered += 1;
            }
            match word.status {
                WordStatus::Pending => stats.by_status.pending += 1,
                WordStatus::Completed => stats.by_status.completed += 1,
                WordStatus::Failed => stats.by_status.failed += 1,
            }
            stats.mastery_distribution[word.mastery_level.level() as usize] += 1;
            if let Some(i) = JlptLevel::ALL.iter().position(|l| *l == word.level) {
                level_counts[i] += 1;
            }
        }

        // ALL is already in label order.
        for (level, count) in JlptLevel::ALL.iter().zip(level_counts) {
            if count > 0 {
                stats.by_level.insert(level.label().to_string(), count);
            }
        }

        stats
    }

    /// Share of words at the top mastery level (0.0-1.0).
    pub fn mastered_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.mastered as f64 / self.total as f64
        }
    }
}
