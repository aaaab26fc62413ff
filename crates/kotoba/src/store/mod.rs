//! Word store: the single owner of every word.
//!
//! # Usage
//!
//! ```no_run
//! use kotoba::store::WordStore;
//! use kotoba::slot::FileSlot;
//!
//! let mut store = WordStore::open(FileSlot::new("data"));
//! store.subscribe(|event| println!("changed: {}", event.word_id()));
//!
//! let word = store.add("猫").unwrap();
//! println!("Pending: {}", store.pending().len());
//! store.remove(&word.id);
//! ```

mod events;
mod word_store;

pub use events::{Listener, StoreEvent, SubscriptionId};
pub use word_store::WordStore;
