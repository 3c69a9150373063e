//! File API handlers
//!
//! REST endpoints for file records: multipart uploads, record updates,
//! paged listing, lookup, download and deletion. Business rules live in the
//! file service.

use crate::api::extract::CurrentUser;
use crate::api::headers;
use crate::error::AppError;
use crate::models::{FileDto, FileId};
use crate::services::files::{FileService, UploadedFile};
use crate::state::SharedState;
use crate::storage::PageRequest;
use axum::{
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Json, Response},
};
use tracing::{debug, warn};

/// Entity name used in alert keys
pub const ENTITY_NAME: &str = "file";

/// Base path of the file resource
pub const RESOURCE_PATH: &str = "/api/files";

/// Fields of an upload form
#[derive(Debug, Default)]
struct UploadForm {
    files: Vec<UploadedFile>,
    description: Option<String>,
}

/// Read a multipart upload form, collecting file parts named `file_field`
async fn read_upload_form(
    mut multipart: Multipart,
    file_field: &str,
) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Invalid multipart data: {}", e))
    })? {
        let name = field.name().unwrap_or("").to_string();

        if name == file_field {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content = field.bytes().await.map_err(|e| {
                warn!("Failed to read file content: {}", e);
                AppError::BadRequest(format!("Failed to read file: {}", e))
            })?;
            form.files.push(UploadedFile {
                file_name,
                content: content.to_vec(),
            });
        } else if name == "description" {
            let text = field.text().await.map_err(|e| {
                AppError::BadRequest(format!("Invalid description: {}", e))
            })?;
            form.description = Some(text);
        } else {
            debug!("Ignoring unknown multipart field: {}", name);
        }
    }

    Ok(form)
}

fn location(id: FileId) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&format!("{}/{}", RESOURCE_PATH, id)) {
        headers.insert(header::LOCATION, value);
    }
    headers
}

/// POST /api/files/single-file - Upload one file
pub async fn create_file(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    multipart: Multipart,
) -> Result<(StatusCode, HeaderMap, Json<FileDto>), AppError> {
    debug!("REST request to save File");
    let form = read_upload_form(multipart, "file").await?;
    let upload = match form.files.as_slice() {
        [upload] => upload,
        [] => return Err(AppError::BadRequest("No file provided".to_string())),
        _ => {
            return Err(AppError::BadRequest(
                "Expected exactly one file; use /multiple-files".to_string(),
            ))
        }
    };

    let result = FileService::new(&state)
        .save(upload, form.description.as_deref(), &user)
        .await?;
    let id = result
        .id
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Saved file has no id")))?;

    let mut response_headers = location(id);
    response_headers.extend(headers::entity_creation_alert(ENTITY_NAME, &id.to_string()));

    Ok((StatusCode::CREATED, response_headers, Json(result)))
}

/// POST /api/files/multiple-files - Upload several files with one description
pub async fn create_files(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    multipart: Multipart,
) -> Result<(StatusCode, HeaderMap, Json<Vec<FileDto>>), AppError> {
    debug!("REST request to save Files");
    let form = read_upload_form(multipart, "files").await?;
    if form.files.is_empty() {
        return Err(AppError::BadRequest("No files provided".to_string()));
    }

    let service = FileService::new(&state);
    let mut created = Vec::with_capacity(form.files.len());
    for upload in &form.files {
        created.push(
            service
                .save(upload, form.description.as_deref(), &user)
                .await?,
        );
    }

    let ids = created
        .iter()
        .filter_map(|dto| dto.id)
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",");

    Ok((
        StatusCode::CREATED,
        headers::entity_creation_alert(ENTITY_NAME, &ids),
        Json(created),
    ))
}

/// PUT /api/files - Update an existing file record
pub async fn update_file(
    State(state): State<SharedState>,
    Json(dto): Json<FileDto>,
) -> Result<(HeaderMap, Json<FileDto>), AppError> {
    debug!("REST request to update File : {:?}", dto);
    let result = FileService::new(&state).update(&dto).await?;
    let id = result.id.map(|id| id.to_string()).unwrap_or_default();
    Ok((headers::entity_update_alert(ENTITY_NAME, &id), Json(result)))
}

/// GET /api/files - Get a page of the current user's files
pub async fn list_files(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<(HeaderMap, Json<Vec<FileDto>>), AppError> {
    debug!("REST request to get a page of Files");
    let request = PageRequest::from_pairs(&params);
    let page = FileService::new(&state).find_all(&user, &request).await?;
    let response_headers = headers::pagination(&page, RESOURCE_PATH);
    Ok((response_headers, Json(page.content)))
}

/// GET /api/files/:id - Get one file record
pub async fn get_file(
    State(state): State<SharedState>,
    Path(id): Path<FileId>,
) -> Result<Json<FileDto>, AppError> {
    debug!("REST request to get File : {}", id);
    FileService::new(&state)
        .find_one(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::FileNotFound(id.to_string()))
}

/// DELETE /api/files/:id - Delete a file record and its content
pub async fn delete_file(
    State(state): State<SharedState>,
    Path(id): Path<FileId>,
) -> Result<(StatusCode, HeaderMap), AppError> {
    debug!("REST request to delete File : {}", id);
    FileService::new(&state).delete(id).await?;
    Ok((
        StatusCode::OK,
        headers::entity_deletion_alert(ENTITY_NAME, &id.to_string()),
    ))
}

/// GET /api/files/download/:id - Download stored content as an attachment
pub async fn download_file(
    State(state): State<SharedState>,
    Path(id): Path<FileId>,
) -> Result<Response<Body>, AppError> {
    let loaded = FileService::new(&state).load_file(id).await?;

    Response::builder()
        .header(header::CONTENT_TYPE, loaded.content_type)
        .header(
            header::CONTENT_DISPOSITION,
            headers::content_disposition(&loaded.file_name),
        )
        .header(header::CONTENT_LENGTH, loaded.content.len())
        .body(Body::from(loaded.content))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build response: {}", e)))
}
