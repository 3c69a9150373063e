// GUI configuration
// Reads the API location, acting login and download directory from the environment

use std::env;
use std::path::PathBuf;

/// Default API base URL
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Front-end configuration
#[derive(Debug, Clone, PartialEq)]
pub struct GuiConfig {
    /// Base URL of the file manager server
    pub api_url: String,
    /// Login sent with every request; the server default applies when unset
    pub login: Option<String>,
    /// Directory downloads are written to
    pub download_dir: PathBuf,
}

impl GuiConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_url: var("FILE_MANAGER_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            login: var("FILE_MANAGER_LOGIN").filter(|login| !login.trim().is_empty()),
            download_dir: var("FILE_MANAGER_DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./downloads")),
        }
    }
}
