//! Review scheduling and flashcard sessions.
//!
//! Each judgment moves mastery one level up (correct) or down (incorrect),
//! clamped to `0..=5`, and schedules the next review `2^mastery` days out:
//!
//! | mastery | interval |
//! |---------|----------|
//! | 0       | 1 day    |
//! | 1       | 2 days   |
//! | 2       | 4 days   |
//! | 3       | 8 days   |
//! | 4       | 16 days  |
//! | 5       | 32 days  |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::WordStore;
use crate::word::{Mastery, Word};

/// Mastery after one judgment.
pub fn next_mastery(current: Mastery, correct: bool) -> Mastery {
    if correct {
        current.raised()
    } else {
        current.lowered()
    }
}

/// Apply a judgment to a word: recompute mastery and the next review date.
pub fn apply_judgment(word: &mut Word, correct: bool, now: DateTime<Utc>) {
    let mastery = next_mastery(word.mastery_level, correct);
    word.mastery_level = mastery;
    word.next_review_date = now + mastery.interval();
}

/// A judgment collected during a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judgment {
    pub word_id: String,
    pub correct: bool,
}

/// Where a session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    /// Showing the word at `position` (0-based) of `total`.
    InProgress { position: usize, total: usize },
    /// Every word has been judged.
    Complete { correct: usize, incorrect: usize },
}

/// Steps through a fixed sequence of due words, one judgment each.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    words: Vec<Word>,
    position: usize,
    correct: usize,
    incorrect: usize,
}

impl ReviewSession {
    /// Start a session over `words`, in the order given.
    pub fn new(words: impl IntoIterator<Item = Word>) -> Self {
        Self {
            words: words.into_iter().collect(),
            position: 0,
            correct: 0,
            incorrect: 0,
        }
    }

    /// Start a session over everything due in `store` at `now`.
    pub fn due(store: &WordStore, now: DateTime<Utc>) -> Self {
        Self::new(store.find_due(now).into_iter().cloned())
    }

    /// Cap the session at `limit` words.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.words.truncate(limit);
        self
    }

    /// The word currently shown, if any remain.
    pub fn current(&self) -> Option<&Word> {
        self.words.get(self.position)
    }

    pub fn total(&self) -> usize {
        self.words.len()
    }

    pub fn is_complete(&self) -> bool {
        self.position >= self.words.len()
    }

    pub fn state(&self) -> SessionState {
        if self.is_complete() {
            SessionState::Complete {
                correct: self.correct,
                incorrect: self.incorrect,
            }
        } else {
            SessionState::InProgress {
                position: self.position,
                total: self.words.len(),
            }
        }
    }

    /// Judge the current word and advance. `None` once the session is
    /// complete.
    pub fn answer(&mut self, correct: bool) -> Option<Judgment> {
        let word = self.words.get(self.position)?;
        let judgment = Judgment {
            word_id: word.id.clone(),
            correct,
        };

        if correct {
            self.correct += 1;
        } else {
            self.incorrect += 1;
        }
        self.position += 1;

        Some(judgment)
    }

    /// Judge the current word and record it in `store`.
    pub fn answer_into(
        &mut self,
        store: &mut WordStore,
        correct: bool,
        now: DateTime<Utc>,
    ) -> Option<Judgment> {
        let judgment = self.answer(correct)?;
        store.record_review(&judgment.word_id, judgment.correct, now);
        Some(judgment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_correct_raises_mastery() {
        let now = Utc::now();
        let mut word = Word::new("猫", now);
        word.mastery_level = Mastery::new(2);

        apply_judgment(&mut word, true, now);

        assert_eq!(word.mastery_level.level(), 3);
        assert_eq!(word.next_review_date, now + Duration::days(8));
    }

    #[test]
    fn test_incorrect_at_zero_clamps() {
        let now = Utc::now();
        let mut word = Word::new("猫", now);

        apply_judgment(&mut word, false, now);

        assert_eq!(word.mastery_level.level(), 0);
        assert_eq!(word.next_review_date, now + Duration::days(1));
    }

    #[test]
    fn test_correct_at_max_stays() {
        let now = Utc::now();
        let mut word = Word::new("猫", now);
        word.mastery_level = Mastery::MAX;

        apply_judgment(&mut word, true, now);

        assert_eq!(word.mastery_level, Mastery::MAX);
        assert_eq!(word.next_review_date, now + Duration::days(32));
    }

    #[test]
    fn test_empty_session_is_complete() {
        let mut session = ReviewSession::new(Vec::new());

        assert!(session.is_complete());
        assert!(session.current().is_none());
        assert_eq!(
            session.state(),
            SessionState::Complete {
                correct: 0,
                incorrect: 0
            }
        );
        assert!(session.answer(true).is_none());
    }

    #[test]
    fn test_session_walks_in_order_once() {
        let now = Utc::now();
        let words = vec![Word::new("一", now), Word::new("二", now), Word::new("三", now)];
        let ids: Vec<String> = words.iter().map(|w| w.id.clone()).collect();
        let mut session = ReviewSession::new(words);

        assert_eq!(session.state(), SessionState::InProgress { position: 0, total: 3 });
        assert_eq!(session.current().unwrap().headword, "一");

        let seen: Vec<String> = [true, false, true]
            .into_iter()
            .map(|c| session.answer(c).unwrap().word_id)
            .collect();

        assert_eq!(seen, ids);
        assert_eq!(
            session.state(),
            SessionState::Complete {
                correct: 2,
                incorrect: 1
            }
        );
        assert!(session.answer(false).is_none());
    }

    #[test]
    fn test_session_limit() {
        let now = Utc::now();
        let session =
            ReviewSession::new(vec![Word::new("一", now), Word::new("二", now)]).with_limit(1);
        assert_eq!(session.total(), 1);
    }

    #[test]
    fn test_answer_into_updates_store() {
        let now = Utc::now();
        let mut store = WordStore::in_memory();
        let word = store.add_at("猫", now).unwrap();

        let mut session = ReviewSession::due(&store, now);
        session.answer_into(&mut store, true, now).unwrap();

        let stored = store.get(&word.id).unwrap();
        assert_eq!(stored.mastery_level.level(), 1);
        assert!(session.is_complete());
        assert!(store.find_due(now).is_empty());
    }
}
