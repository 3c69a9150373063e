//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;
use std::path::PathBuf;

/// Default maximum upload size (50 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Persistence configuration
    pub persistence: PersistenceConfig,
    /// Upload configuration
    pub uploads: UploadConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
    /// Login used when a request does not name one
    pub default_login: String,
}

/// Persistence configuration
#[derive(Debug, Clone)]
pub struct PersistenceConfig {
    /// Path to the SQLite database file
    pub database_path: String,
}

/// Upload configuration
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Root directory for stored file contents
    pub upload_dir: PathBuf,
    /// Maximum accepted request body size for uploads, in bytes
    pub max_upload_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                default_login: env::var("DEFAULT_LOGIN").unwrap_or_else(|_| "user".to_string()),
            },
            persistence: PersistenceConfig {
                database_path: env::var("DATABASE_PATH")
                    .unwrap_or_else(|_| "./data/file-manager.db".to_string()),
            },
            uploads: UploadConfig {
                upload_dir: env::var("UPLOAD_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("./uploads")),
                max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                    .ok()
                    .and_then(|b| b.parse().ok())
                    .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            },
        }
    }

    /// Configuration rooted in a scratch directory (database and uploads inside it)
    pub fn for_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            server: ServerConfig {
                port: 0,
                host: "127.0.0.1".to_string(),
                default_login: "user".to_string(),
            },
            persistence: PersistenceConfig {
                database_path: data_dir.join("file-manager.db").to_string_lossy().to_string(),
            },
            uploads: UploadConfig {
                upload_dir: data_dir.join("uploads"),
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
