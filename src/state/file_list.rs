// File list screen state
// One page of the user's files plus the list actions (download, delete)

use crate::state::alerts::AlertService;
use file_manager_backend::client::{ClientError, FileApi, QueryOptions};
use file_manager_backend::models::{File, FileId};
use std::path::{Path, PathBuf};

/// Default number of rows per page
pub const ITEMS_PER_PAGE: u32 = 20;

/// Paged view over the user's files
#[derive(Debug, Clone)]
pub struct FileListState {
    /// Rows of the current page
    pub files: Vec<File>,
    /// Total number of files across pages
    pub total_items: u64,
    /// Zero-based page index
    pub page: u32,
    /// Rows per page
    pub items_per_page: u32,
    /// Sort criterion sent with the query
    pub sort: String,
    /// Whether the page must be reloaded before the next render
    pub stale: bool,
}

impl Default for FileListState {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            total_items: 0,
            page: 0,
            items_per_page: ITEMS_PER_PAGE,
            sort: "id,asc".to_string(),
            stale: true,
        }
    }
}

impl FileListState {
    /// Start on the first page, not yet loaded
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pages for the current total
    pub fn total_pages(&self) -> u32 {
        let size = u64::from(self.items_per_page.max(1));
        self.total_items.div_ceil(size) as u32
    }

    /// Move to another page; it is loaded on the next refresh
    pub fn go_to_page(&mut self, page: u32) {
        let last = self.total_pages().saturating_sub(1);
        self.page = page.min(last);
        self.stale = true;
    }

    /// Reload the current page
    ///
    /// A page left past the end, e.g. after deleting its last row, is
    /// swapped for the last page that still has rows.
    pub async fn load<A: FileApi + ?Sized>(&mut self, api: &A, alerts: &AlertService) {
        loop {
            let options =
                QueryOptions::page(self.page, self.items_per_page).sort_by(self.sort.clone());
            match api.query(&options).await {
                Ok(response) => {
                    self.total_items = response
                        .total_count()
                        .unwrap_or_else(|| response.body.as_ref().map_or(0, |b| b.len() as u64));
                    self.files = response.body.unwrap_or_default();
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to load files");
                    alerts.error(e.to_string());
                }
            }

            let last = self.total_pages().saturating_sub(1);
            if self.files.is_empty() && self.page > last {
                tracing::debug!(page = self.page, last, "Page out of range, loading last page");
                self.page = last;
                continue;
            }
            break;
        }
        self.stale = false;
    }

    /// Delete a file and mark the page for reload
    pub async fn delete<A: FileApi + ?Sized>(&mut self, api: &A, id: FileId, alerts: &AlertService) {
        match api.delete(id).await {
            Ok(response) => alerts.success_from(&response),
            Err(e) => alerts.error(e.to_string()),
        }
        self.stale = true;
    }

    /// Download a file's content into `dir`, returning the written path
    pub async fn download<A: FileApi + ?Sized>(
        api: &A,
        file: &File,
        dir: &Path,
    ) -> Result<PathBuf, ClientError> {
        let id = file
            .id
            .ok_or_else(|| ClientError::InvalidUpload("File has no id".to_string()))?;
        let bytes = api.download(id).await?;

        let name = Path::new(&file.title)
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| format!("file-{}", id).into());
        let target = dir.join(name);

        let write = async {
            tokio::fs::create_dir_all(dir).await?;
            tokio::fs::write(&target, &bytes).await?;
            Ok::<_, std::io::Error>(())
        };
        write.await.map_err(|e| {
            ClientError::InvalidUpload(format!("Failed to write {}: {}", target.display(), e))
        })?;
        tracing::info!(file_id = id, path = %target.display(), "Downloaded file");
        Ok(target)
    }
}
