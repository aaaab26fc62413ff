//! The authoritative word collection.

use std::sync::mpsc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::review;
use crate::slot::{DurableSlot, MemorySlot, WORDS_KEY};
use crate::word::{Word, WordPatch, WordStatus};

use super::events::{Listener, StoreEvent, SubscriptionId};

/// Owns every word, persists write-through and notifies subscribers.
///
/// Words are kept newest first. Every mutation that finds its target
/// rewrites the whole collection to the slot, then notifies listeners.
/// Slot failures are logged and swallowed: the in-memory state stays
/// authoritative.
pub struct WordStore {
    words: Vec<Word>,
    slot: Box<dyn DurableSlot>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl WordStore {
    /// Load the collection from `slot`.
    ///
    /// A missing or malformed blob yields an empty collection.
    pub fn open(slot: impl DurableSlot + 'static) -> Self {
        let words = match slot.read(WORDS_KEY) {
            Ok(Some(blob)) => match serde_json::from_str::<Vec<Word>>(&blob) {
                Ok(words) => words,
                Err(e) => {
                    warn!(error = %e, "stored word collection is malformed, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to read word collection, starting empty");
                Vec::new()
            }
        };

        debug!(count = words.len(), "word store opened");

        Self {
            words,
            slot: Box::new(slot),
            listeners: Vec::new(),
            next_subscription: 1,
        }
    }

    /// Store backed by a fresh in-memory slot.
    pub fn in_memory() -> Self {
        Self::open(MemorySlot::new())
    }

    /// Add a word typed by the user. Blank input is ignored.
    pub fn add(&mut self, headword: &str) -> Option<Word> {
        self.add_at(headword, Utc::now())
    }

    /// Add a word with an explicit creation time.
    pub fn add_at(&mut self, headword: &str, now: DateTime<Utc>) -> Option<Word> {
        let headword = headword.trim();
        if headword.is_empty() {
            return None;
        }

        let word = Word::new(headword, now);
        debug!(id = %word.id, headword = %word.headword, "word added");
        self.words.insert(0, word.clone());
        self.commit(StoreEvent::Added(word.id.clone()));
        Some(word)
    }

    /// Apply a partial update. Returns the updated word, or `None` if the
    /// id is unknown.
    pub fn update(&mut self, id: &str, patch: WordPatch) -> Option<Word> {
        self.update_with(id, |word| patch.apply_to(word))
    }

    /// Mutate a word in place through a closure.
    pub fn update_with(&mut self, id: &str, f: impl FnOnce(&mut Word)) -> Option<Word> {
        let word = self.words.iter_mut().find(|w| w.id == id)?;
        f(word);
        let updated = word.clone();
        debug!(id = %id, status = updated.status.label(), "word updated");
        self.commit(StoreEvent::Updated(id.to_string()));
        Some(updated)
    }

    /// Record a review judgment for a word.
    pub fn record_review(&mut self, id: &str, correct: bool, now: DateTime<Utc>) -> Option<Word> {
        self.update_with(id, |word| review::apply_judgment(word, correct, now))
    }

    /// Delete a word. Returns it, or `None` if the id is unknown.
    pub fn remove(&mut self, id: &str) -> Option<Word> {
        let index = self.words.iter().position(|w| w.id == id)?;
        let word = self.words.remove(index);
        debug!(id = %id, "word removed");
        self.commit(StoreEvent::Removed(word.id.clone()));
        Some(word)
    }

    /// All words, newest first.
    pub fn list(&self) -> &[Word] {
        &self.words
    }

    pub fn get(&self, id: &str) -> Option<&Word> {
        self.words.iter().find(|w| w.id == id)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words due for review at `now`, in collection order.
    pub fn find_due(&self, now: DateTime<Utc>) -> Vec<&Word> {
        self.words.iter().filter(|w| w.is_due(now)).collect()
    }

    /// Words still waiting for enrichment, in collection order.
    pub fn pending(&self) -> Vec<&Word> {
        self.words
            .iter()
            .filter(|w| w.status == WordStatus::Pending)
            .collect()
    }

    /// The pending word that was created first.
    pub fn oldest_pending(&self) -> Option<&Word> {
        // Reverse so ties on created_at resolve to the earliest insertion.
        self.words
            .iter()
            .rev()
            .filter(|w| w.status == WordStatus::Pending)
            .min_by_key(|w| w.created_at)
    }

    /// Words whose headword or meaning contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<&Word> {
        let query = query.trim().to_lowercase();
        self.words
            .iter()
            .filter(|w| {
                query.is_empty()
                    || w.headword.to_lowercase().contains(&query)
                    || w.meaning.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Register an observer. It runs after every change, on the mutating
    /// thread, and must not block.
    pub fn subscribe(
        &mut self,
        listener: impl Fn(&StoreEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Subscribe through a channel instead of a callback.
    pub fn subscribe_channel(&mut self) -> (SubscriptionId, mpsc::Receiver<StoreEvent>) {
        let (tx, rx) = mpsc::channel();
        let id = self.subscribe(move |event| {
            // A dropped receiver just stops listening.
            let _ = tx.send(event.clone());
        });
        (id, rx)
    }

    /// Remove an observer. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    fn commit(&self, event: StoreEvent) {
        self.persist();
        for (_, listener) in &self.listeners {
            listener(&event);
        }
    }

    fn persist(&self) {
        let blob = match serde_json::to_string(&self.words) {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, "failed to serialize word collection");
                return;
            }
        };
        if let Err(e) = self.slot.write(WORDS_KEY, &blob) {
            warn!(error = %e, "failed to persist word collection");
        }
    }
}

impl std::fmt::Debug for WordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordStore")
            .field("words", &self.words.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
