//! On-disk storage of uploaded file contents
//!
//! Contents are laid out per owner and record:
//! ```text
//! {root}/
//! └── {login}/
//!     └── {file id}/
//!         └── {title}
//! ```

use crate::error::AppError;
use crate::models::FileId;
use anyhow::Context;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Normalize an uploaded file name
///
/// Backslashes are treated as separators, `.` segments are dropped and only
/// the last segment is kept. Names containing `..` or that end up empty are
/// rejected.
pub fn clean_file_name(raw: &str) -> Result<String, AppError> {
    let normalized = raw.replace('\\', "/");

    if normalized.split('/').any(|segment| segment == "..") || normalized.contains("..") {
        return Err(AppError::InvalidFileName(format!(
            "Filename contains invalid path sequence {}",
            raw
        )));
    }

    let name = normalized
        .split('/')
        .map(str::trim)
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .last()
        .unwrap_or_default();

    if name.is_empty() || name.chars().any(char::is_control) {
        return Err(AppError::InvalidFileName(format!(
            "Filename is empty or invalid: {:?}",
            raw
        )));
    }

    Ok(name.to_string())
}

/// Disk-backed store for file contents
#[derive(Debug, Clone)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, AppError> {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .with_context(|| {
                format!(
                    "Could not create the directory where the uploaded files will be stored: {}",
                    root.display()
                )
            })
            .map_err(AppError::Internal)?;

        Ok(Self { root })
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of a record's content
    pub fn path_for(&self, login: &str, id: FileId, title: &str) -> Result<PathBuf, AppError> {
        let login = single_segment(login)?;
        let title = single_segment(title)?;
        Ok(self.root.join(login).join(id.to_string()).join(title))
    }

    /// Write content, replacing any existing content at the same location
    pub async fn write(
        &self,
        login: &str,
        id: FileId,
        title: &str,
        content: &[u8],
    ) -> Result<PathBuf, AppError> {
        let path = self.path_for(login, id, title)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Could not create directory {}", parent.display()))?;
        }
        fs::write(&path, content)
            .await
            .with_context(|| format!("Could not store file {}. Please try again!", title))?;

        tracing::debug!(path = %path.display(), bytes = content.len(), "Stored file content");
        Ok(path)
    }

    /// Read a record's content
    pub async fn read(&self, login: &str, id: FileId, title: &str) -> Result<Vec<u8>, AppError> {
        let path = self.path_for(login, id, title)?;
        match fs::read(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(AppError::FileNotFound(format!(
                "File not found {}",
                path.strip_prefix(&self.root).unwrap_or(&path).display()
            ))),
            Err(e) => Err(AppError::Internal(
                anyhow::Error::new(e).context(format!("Could not read {}", path.display())),
            )),
        }
    }

    /// Remove every stored content of a record; missing content is not an error
    pub async fn remove(&self, login: &str, id: FileId) -> Result<(), AppError> {
        let dir = self.root.join(single_segment(login)?).join(id.to_string());
        match fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Internal(
                anyhow::Error::new(e).context(format!("Could not remove {}", dir.display())),
            )),
        }
    }

    /// Remove one stored copy of a record's content
    ///
    /// The record directory is dropped as well once it is empty. Missing
    /// content is not an error.
    pub async fn remove_file(&self, login: &str, id: FileId, title: &str) -> Result<(), AppError> {
        let path = self.path_for(login, id, title)?;
        match fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(AppError::Internal(
                    anyhow::Error::new(e).context(format!("Could not remove {}", path.display())),
                ))
            }
        }
        if let Some(parent) = path.parent() {
            // Fails while other content is still stored there
            let _ = fs::remove_dir(parent).await;
        }
        Ok(())
    }
}

/// Ensure a path segment cannot escape its parent directory
fn single_segment(segment: &str) -> Result<&str, AppError> {
    let mut components = Path::new(segment).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(segment),
        _ => Err(AppError::InvalidFileName(format!(
            "Invalid path segment: {}",
            segment
        ))),
    }
}
