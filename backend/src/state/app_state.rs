//! Application state shared by all request handlers

use crate::config::Config;
use crate::error::AppError;
use crate::storage::{BlobStore, FileDb};
use std::sync::Arc;

/// State handle passed to axum handlers
pub type SharedState = Arc<AppState>;

/// Server state: configuration plus the two persistence backends
///
/// Nothing in here is mutated after startup, so handlers share it without locking.
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Config,
    /// File and user records
    pub db: FileDb,
    /// Uploaded contents
    pub blobs: BlobStore,
}

impl AppState {
    /// Open the database and blob store described by `config`
    pub async fn new(config: Config) -> Result<Self, AppError> {
        let db = FileDb::new(&config.persistence.database_path).await?;
        let blobs = BlobStore::new(&config.uploads.upload_dir)?;
        Ok(Self { config, db, blobs })
    }

    /// Wrap the state for sharing between handlers
    pub fn shared(self) -> SharedState {
        Arc::new(self)
    }
}
