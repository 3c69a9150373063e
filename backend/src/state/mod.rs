//! Shared server state
//!
//! Handles configuration, the database pool and the blob store.

pub mod app_state;

pub use app_state::{AppState, SharedState};
