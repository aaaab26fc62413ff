//! Change notifications emitted by the word store.

use serde::Serialize;

/// What changed in the store. Each variant carries the affected word id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum StoreEvent {
    Added(String),
    Updated(String),
    Removed(String),
}

impl StoreEvent {
    pub fn word_id(&self) -> &str {
        match self {
            StoreEvent::Added(id) | StoreEvent::Updated(id) | StoreEvent::Removed(id) => id,
        }
    }
}

/// Handle returned by `WordStore::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

/// Observer callback invoked after every store change.
pub type Listener = Box<dyn Fn(&StoreEvent) + Send + Sync>;
