//! File Manager Backend Library
//!
//! Server side of the file manager (REST handlers, persistence and blob
//! storage) plus the typed REST client used by front-ends and tests.
//! The server binary is in `src/main.rs`.

pub mod api;
/// Typed REST client for the file and user endpoints
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
/// Shared server state
///
/// Handles configuration, the database pool and the blob store.
pub mod state;
pub mod storage;
