//! File service
//!
//! Business rules for file records: storing uploads, paging a user's files,
//! updating records, and loading stored contents for download.

use crate::error::AppError;
use crate::models::file::parse_wire_date;
use crate::models::{FileDto, FileId, UserDto};
use crate::state::AppState;
use crate::storage::{clean_file_name, BlobStore, FileDb, NewFile, Page, PageRequest};
use chrono::Utc;
use tracing::{debug, warn};

/// An uploaded file as received from a multipart request
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Original file name supplied by the client
    pub file_name: String,
    /// File contents
    pub content: Vec<u8>,
}

/// Stored content ready to be sent to a client
#[derive(Debug, Clone)]
pub struct LoadedFile {
    /// File name to advertise
    pub file_name: String,
    /// MIME type guessed from the file name
    pub content_type: String,
    /// File contents
    pub content: Vec<u8>,
}

/// File service bound to the server state
pub struct FileService<'a> {
    db: &'a FileDb,
    blobs: &'a BlobStore,
}

impl<'a> FileService<'a> {
    /// Create a service over the state's database and blob store
    pub fn new(state: &'a AppState) -> Self {
        Self {
            db: &state.db,
            blobs: &state.blobs,
        }
    }

    /// Save an uploaded file owned by `owner`
    ///
    /// # Returns
    /// * `Ok(FileDto)` - The persisted record
    /// * `Err(AppError)` - If the file name is invalid or storing fails
    pub async fn save(
        &self,
        upload: &UploadedFile,
        description: Option<&str>,
        owner: &UserDto,
    ) -> Result<FileDto, AppError> {
        debug!(file_name = %upload.file_name, owner = %owner.login, "Request to save File");

        let title = clean_file_name(&upload.file_name)?;
        let id = self
            .db
            .insert_file(&NewFile {
                title: title.clone(),
                description: description.map(str::to_string),
                creation_date: Utc::now(),
                user_id: owner.id,
            })
            .await?;

        if let Err(e) = self
            .blobs
            .write(&owner.login, id, &title, &upload.content)
            .await
        {
            // Keep records and contents in step
            if let Err(cleanup) = self.db.delete_file(id).await {
                warn!(file_id = id, error = %cleanup, "Failed to remove record after storage error");
            }
            return Err(e);
        }

        self.find_one(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("File {} missing after save", id)))
    }

    /// Get one page of the files owned by `owner`
    pub async fn find_all(
        &self,
        owner: &UserDto,
        request: &PageRequest,
    ) -> Result<Page<FileDto>, AppError> {
        debug!(owner = %owner.login, page = request.page, "Request to get all Files");
        let page = self.db.list_files_for_user(owner.id, request).await?;
        Ok(page.map(|record| record.to_dto()))
    }

    /// Get one file by id
    pub async fn find_one(&self, id: FileId) -> Result<Option<FileDto>, AppError> {
        debug!(file_id = id, "Request to get File");
        Ok(self.db.get_file(id).await?.map(|record| record.to_dto()))
    }

    /// Update the editable fields of an existing record
    ///
    /// The stored content is moved when the title or owner changes so downloads
    /// keep working. A missing `userId` keeps the current owner.
    pub async fn update(&self, dto: &FileDto) -> Result<FileDto, AppError> {
        let id = dto
            .id
            .ok_or_else(|| AppError::BadRequest("Invalid id (idnull)".to_string()))?;
        debug!(file_id = id, "Request to update File");

        let existing = self
            .db
            .get_file(id)
            .await?
            .ok_or_else(|| AppError::FileNotFound(id.to_string()))?;

        let title = match dto.title.as_deref() {
            Some(title) if title != existing.title => clean_file_name(title)?,
            _ => existing.title.clone(),
        };

        let user_id = dto.user_id.or(existing.user_id);
        let login = match dto.user_id {
            Some(user_id) if Some(user_id) != existing.user_id => {
                let user = self
                    .db
                    .find_user(user_id)
                    .await?
                    .ok_or_else(|| AppError::BadRequest(format!("Unknown user {}", user_id)))?;
                Some(user.login)
            }
            _ => existing.user_login.clone(),
        };

        // Content is copied before the row changes and the old copy dropped after
        let moved = self
            .stage_content(&existing, &title, login.as_deref())
            .await?;

        let creation_date = dto.creation_date.as_deref().and_then(parse_wire_date);
        let written = self
            .db
            .update_file(
                id,
                &title,
                dto.description.as_deref(),
                creation_date,
                user_id,
            )
            .await;
        if let Err(e) = written {
            if let (true, Some(login)) = (moved, login.as_deref()) {
                self.discard_content(login, id, &title).await;
            }
            return Err(e);
        }

        if let (true, Some(old_login)) = (moved, existing.user_login.as_deref()) {
            self.discard_content(old_login, id, &existing.title).await;
        }

        let updated = self
            .db
            .get_file(id)
            .await?
            .ok_or_else(|| AppError::FileNotFound(id.to_string()))?;
        Ok(updated.to_dto())
    }

    /// Delete a record and its stored content
    pub async fn delete(&self, id: FileId) -> Result<(), AppError> {
        debug!(file_id = id, "Request to delete File");
        let existing = self
            .db
            .get_file(id)
            .await?
            .ok_or_else(|| AppError::FileNotFound(id.to_string()))?;

        self.db.delete_file(id).await?;
        if let Some(login) = existing.user_login.as_deref() {
            self.blobs.remove(login, id).await?;
        }
        Ok(())
    }

    /// Load a record's stored content
    pub async fn load_file(&self, id: FileId) -> Result<LoadedFile, AppError> {
        let record = self
            .db
            .get_file(id)
            .await?
            .ok_or_else(|| AppError::FileNotFound(id.to_string()))?;
        let login = record
            .user_login
            .as_deref()
            .ok_or_else(|| AppError::FileNotFound(format!("File {} has no owner", id)))?;

        let content = self.blobs.read(login, id, &record.title).await?;
        let content_type = mime_guess::from_path(&record.title)
            .first_or_octet_stream()
            .to_string();

        Ok(LoadedFile {
            file_name: record.title,
            content_type,
            content,
        })
    }

    /// Copy stored content to its location under the new title and owner
    ///
    /// Returns whether a copy was written. Records without an owner or
    /// without stored content have nothing to move.
    async fn stage_content(
        &self,
        before: &crate::storage::FileRecord,
        new_title: &str,
        new_login: Option<&str>,
    ) -> Result<bool, AppError> {
        let Some(old_login) = before.user_login.as_deref() else {
            return Ok(false);
        };
        let new_login = new_login.unwrap_or(old_login);
        if old_login == new_login && before.title == new_title {
            return Ok(false);
        }

        let content = match self.blobs.read(old_login, before.id, &before.title).await {
            Ok(content) => content,
            Err(AppError::FileNotFound(_)) => return Ok(false),
            Err(e) => return Err(e),
        };
        self.blobs
            .write(new_login, before.id, new_title, &content)
            .await?;
        Ok(true)
    }

    /// Remove one stored copy, logging instead of failing
    async fn discard_content(&self, login: &str, id: FileId, title: &str) {
        if let Err(e) = self.blobs.remove_file(login, id, title).await {
            warn!(file_id = id, error = %e, "Failed to remove stale file content");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::tempdir;

    async fn create_test_state() -> (AppState, tempfile::TempDir) {
        let dir = tempdir().expect("Failed to create temp dir");
        let state = AppState::new(Config::for_data_dir(dir.path()))
            .await
            .expect("Failed to create state");
        (state, dir)
    }

    async fn user(state: &AppState, login: &str) -> UserDto {
        state.db.find_user_by_login(login).await.unwrap().unwrap()
    }

    fn upload(name: &str, content: &[u8]) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content: content.to_vec(),
        }
    }

    #[tokio::test]
    async fn test_save_persists_record_and_content() {
        let (state, _dir) = create_test_state().await;
        let owner = user(&state, "user").await;
        let service = FileService::new(&state);

        let dto = service
            .save(&upload("notes.txt", b"hello"), Some("my notes"), &owner)
            .await
            .expect("save");

        let id = dto.id.expect("id");
        assert_eq!(dto.title.as_deref(), Some("notes.txt"));
        assert_eq!(dto.description.as_deref(), Some("my notes"));
        assert_eq!(dto.user_id, Some(owner.id));
        assert!(dto.creation_date.is_some());

        let stored = state.config.uploads.upload_dir.join("user").join(id.to_string()).join("notes.txt");
        assert_eq!(std::fs::read(stored).unwrap(), b"hello");

        let loaded = service.load_file(id).await.unwrap();
        assert_eq!(loaded.content, b"hello");
        assert_eq!(loaded.content_type, "text/plain");
    }

    #[tokio::test]
    async fn test_save_rejects_invalid_name_without_record() {
        let (state, _dir) = create_test_state().await;
        let owner = user(&state, "user").await;
        let service = FileService::new(&state);

        let result = service.save(&upload("../evil.sh", b"x"), None, &owner).await;
        match result {
            Err(AppError::InvalidFileName(_)) => {}
            other => panic!("Expected InvalidFileName error, got: {:?}", other),
        }
        let page = service.find_all(&owner, &PageRequest::default()).await.unwrap();
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_find_all_only_returns_owner_files() {
        let (state, _dir) = create_test_state().await;
        let owner = user(&state, "user").await;
        let admin = user(&state, "admin").await;
        let service = FileService::new(&state);

        service.save(&upload("a.txt", b"a"), None, &owner).await.unwrap();
        service.save(&upload("b.txt", b"b"), None, &admin).await.unwrap();

        let page = service.find_all(&owner, &PageRequest::default()).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.content[0].title.as_deref(), Some("a.txt"));
    }

    #[tokio::test]
    async fn test_update_requires_id_and_existing_record() {
        let (state, _dir) = create_test_state().await;
        let service = FileService::new(&state);

        match service.update(&FileDto::default()).await {
            Err(AppError::BadRequest(msg)) => assert!(msg.contains("idnull")),
            other => panic!("Expected BadRequest error, got: {:?}", other),
        }

        let missing = FileDto {
            id: Some(42),
            ..Default::default()
        };
        match service.update(&missing).await {
            Err(AppError::FileNotFound(_)) => {}
            other => panic!("Expected FileNotFound error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_renames_and_moves_content() {
        let (state, _dir) = create_test_state().await;
        let owner = user(&state, "user").await;
        let service = FileService::new(&state);
        let saved = service.save(&upload("a.txt", b"abc"), None, &owner).await.unwrap();

        let mut dto = saved.clone();
        dto.title = Some("b.txt".to_string());
        dto.description = Some("renamed".to_string());
        dto.creation_date = Some("2019-03-01T10:15:00.000Z".to_string());
        dto.user_id = Some(1);

        let updated = service.update(&dto).await.unwrap();
        assert_eq!(updated.title.as_deref(), Some("b.txt"));
        assert_eq!(updated.user_name.as_deref(), Some("Administrator"));
        assert_eq!(updated.creation_date.as_deref(), Some("2019-03-01T10:15:00.000Z"));

        let id = saved.id.unwrap();
        let loaded = service.load_file(id).await.unwrap();
        assert_eq!(loaded.file_name, "b.txt");
        assert_eq!(loaded.content, b"abc");
        assert!(!state.config.uploads.upload_dir.join("user").join(id.to_string()).exists());
    }

    #[tokio::test]
    async fn test_update_without_user_keeps_owner() {
        let (state, _dir) = create_test_state().await;
        let owner = user(&state, "user").await;
        let service = FileService::new(&state);
        let saved = service.save(&upload("a.txt", b"abc"), None, &owner).await.unwrap();
        let id = saved.id.unwrap();

        let mut dto = saved.clone();
        dto.user_id = None;
        dto.description = Some("still mine".to_string());
        let updated = service.update(&dto).await.unwrap();

        assert_eq!(updated.user_id, Some(owner.id));
        assert_eq!(updated.description.as_deref(), Some("still mine"));
        assert_eq!(service.load_file(id).await.unwrap().content, b"abc");
        let page = service.find_all(&owner, &PageRequest::default()).await.unwrap();
        assert_eq!(page.total, 1);

        service.delete(id).await.unwrap();
        assert!(!state.config.uploads.upload_dir.join("user").join(id.to_string()).exists());
    }

    #[tokio::test]
    async fn test_update_keeps_record_when_content_cannot_move() {
        let (state, _dir) = create_test_state().await;
        let owner = user(&state, "user").await;
        let service = FileService::new(&state);
        let saved = service.save(&upload("a.txt", b"abc"), None, &owner).await.unwrap();
        let id = saved.id.unwrap();

        // A directory in the way makes the new copy fail
        let blocked = state.config.uploads.upload_dir.join("user").join(id.to_string()).join("b.txt");
        std::fs::create_dir_all(&blocked).unwrap();

        let mut dto = saved.clone();
        dto.title = Some("b.txt".to_string());
        assert!(service.update(&dto).await.is_err());

        let record = service.find_one(id).await.unwrap().unwrap();
        assert_eq!(record.title.as_deref(), Some("a.txt"));
        let loaded = service.load_file(id).await.unwrap();
        assert_eq!(loaded.file_name, "a.txt");
        assert_eq!(loaded.content, b"abc");
    }

    #[tokio::test]
    async fn test_update_rejects_unknown_user() {
        let (state, _dir) = create_test_state().await;
        let owner = user(&state, "user").await;
        let service = FileService::new(&state);
        let mut dto = service.save(&upload("a.txt", b"a"), None, &owner).await.unwrap();
        dto.user_id = Some(999);

        assert!(matches!(
            service.update(&dto).await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_record_and_content() {
        let (state, _dir) = create_test_state().await;
        let owner = user(&state, "user").await;
        let service = FileService::new(&state);
        let id = service
            .save(&upload("a.txt", b"a"), None, &owner)
            .await
            .unwrap()
            .id
            .unwrap();

        service.delete(id).await.unwrap();
        assert!(service.find_one(id).await.unwrap().is_none());
        assert!(!state.config.uploads.upload_dir.join("user").join(id.to_string()).exists());

        match service.delete(id).await {
            Err(AppError::FileNotFound(_)) => {}
            other => panic!("Expected FileNotFound error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_file_missing_content() {
        let (state, _dir) = create_test_state().await;
        let owner = user(&state, "user").await;
        let service = FileService::new(&state);
        let id = service
            .save(&upload("a.bin", b"a"), None, &owner)
            .await
            .unwrap()
            .id
            .unwrap();
        state.blobs.remove("user", id).await.unwrap();

        match service.load_file(id).await {
            Err(AppError::FileNotFound(_)) => {}
            other => panic!("Expected FileNotFound error, got: {:?}", other),
        }
    }
}
