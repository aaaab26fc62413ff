//! JSON API server for the web front end.

pub mod app;
pub mod error;
pub mod handlers;
pub mod state;
pub mod worker;
