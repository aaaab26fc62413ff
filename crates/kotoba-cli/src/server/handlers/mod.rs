//! API request handlers.

mod review;
mod stats;
mod words;

pub use review::*;
pub use stats::*;
pub use words::*;
