//! HTTP API module.
//!
//! Provides the chat page and the JSON endpoints it calls.

mod chat;
mod error;
mod routes;
pub mod types;
mod ui;

pub use error::ApiError;
pub use routes::{router, serve, AppState};
