//! REST client for the file API
//!
//! Typed wrappers over the file and user endpoints. Every call is a single
//! HTTP request; success and failure map directly to the response status,
//! with no retry. Dates are converted between wire strings and `DateTime` on
//! every read and write.

pub mod error;
pub mod files;
pub mod users;

pub use error::ClientError;
pub use files::FileClient;
pub use users::UserClient;

use crate::models::{File, FileId, UserDto};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::path::Path;

pub use crate::api::extract::LOGIN_HEADER;
pub use crate::api::headers::{ALERT_HEADER, ALERT_PARAMS_HEADER, TOTAL_COUNT_HEADER};

/// A full HTTP response: status, headers and the decoded body
#[derive(Debug, Clone)]
pub struct ClientResponse<T> {
    /// Response status
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Decoded body, `None` when the response had none
    pub body: Option<T>,
}

impl<T> ClientResponse<T> {
    /// Transform the body, keeping status and headers
    pub fn map_body<U>(self, f: impl FnOnce(T) -> U) -> ClientResponse<U> {
        ClientResponse {
            status: self.status,
            headers: self.headers,
            body: self.body.map(f),
        }
    }

    /// Take the body, failing when there is none
    pub fn into_body(self) -> Result<T, ClientError> {
        self.body.ok_or(ClientError::EmptyBody)
    }

    /// Value of `X-Total-Count`, when present
    pub fn total_count(&self) -> Option<u64> {
        self.header(TOTAL_COUNT_HEADER)?.parse().ok()
    }

    /// Alert translation key, when present
    pub fn alert(&self) -> Option<&str> {
        self.header(ALERT_HEADER)
    }

    /// Alert parameter, URL-decoded
    pub fn alert_param(&self) -> Option<String> {
        let raw = self.header(ALERT_PARAMS_HEADER)?;
        urlencoding::decode(raw).ok().map(|s| s.into_owned())
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }
}

/// Paging, sorting and filter options for list queries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    /// Zero-based page index
    pub page: Option<u32>,
    /// Page size
    pub size: Option<u32>,
    /// Sort criteria as `field,asc` / `field,desc`
    pub sort: Vec<String>,
    /// Additional filter parameters
    pub params: Vec<(String, String)>,
}

impl QueryOptions {
    /// Options for one page
    pub fn page(page: u32, size: u32) -> Self {
        Self {
            page: Some(page),
            size: Some(size),
            ..Default::default()
        }
    }

    /// Add a sort criterion
    pub fn sort_by(mut self, criterion: impl Into<String>) -> Self {
        self.sort.push(criterion.into());
        self
    }

    /// Query string pairs; `sort` repeats once per criterion
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(size) = self.size {
            pairs.push(("size".to_string(), size.to_string()));
        }
        for criterion in &self.sort {
            pairs.push(("sort".to_string(), criterion.clone()));
        }
        pairs.extend(self.params.iter().cloned());
        pairs
    }
}

/// A file to upload as one multipart part
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpload {
    /// File name sent with the part
    pub file_name: String,
    /// MIME type of the part
    pub content_type: Option<String>,
    /// File contents
    pub bytes: Vec<u8>,
}

impl FileUpload {
    /// Upload from in-memory contents, guessing the type from the name
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = mime_guess::from_path(&file_name)
            .first()
            .map(|mime| mime.to_string());
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Read a local file into an upload
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                ClientError::InvalidUpload(format!("No file name in {}", path.display()))
            })?
            .to_string();
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ClientError::InvalidUpload(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Ok(Self::new(file_name, bytes))
    }

    /// Convert into a multipart part
    pub fn into_part(self) -> Result<reqwest::multipart::Part, ClientError> {
        let part = reqwest::multipart::Part::bytes(self.bytes).file_name(self.file_name);
        match self.content_type {
            Some(content_type) => part
                .mime_str(&content_type)
                .map_err(|e| ClientError::InvalidUpload(format!("Bad content type: {}", e))),
            None => Ok(part),
        }
    }
}

/// File resource operations
#[async_trait]
pub trait FileApi: Send + Sync {
    /// Upload one file (`POST {base}/single-file`)
    async fn create(
        &self,
        upload: FileUpload,
        description: &str,
    ) -> Result<ClientResponse<File>, ClientError>;

    /// Upload several files with one description (`POST {base}/multiple-files`)
    async fn create_files(
        &self,
        uploads: Vec<FileUpload>,
        description: &str,
    ) -> Result<ClientResponse<Vec<File>>, ClientError>;

    /// Replace an existing record (`PUT {base}`)
    async fn update(&self, file: &File) -> Result<ClientResponse<File>, ClientError>;

    /// Fetch one record (`GET {base}/{id}`)
    async fn find(&self, id: FileId) -> Result<ClientResponse<File>, ClientError>;

    /// Fetch stored content (`GET {base}/download/{id}`)
    async fn download(&self, id: FileId) -> Result<Vec<u8>, ClientError>;

    /// List records (`GET {base}`)
    async fn query(&self, options: &QueryOptions) -> Result<ClientResponse<Vec<File>>, ClientError>;

    /// Delete a record (`DELETE {base}/{id}`)
    async fn delete(&self, id: FileId) -> Result<ClientResponse<()>, ClientError>;
}

/// User lookup for the owner field
#[async_trait]
pub trait UserApi: Send + Sync {
    /// List users (`GET /api/users`)
    async fn query(&self) -> Result<ClientResponse<Vec<UserDto>>, ClientError>;
}

/// Send a request and turn non-success statuses into `ClientError::Status`
pub(crate) async fn send(
    request: reqwest::RequestBuilder,
) -> Result<reqwest::Response, ClientError> {
    let response = request.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error body".to_string());
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or(body);

    tracing::error!(status_code = status.as_u16(), error_body = %message, "File API returned error status");
    Err(ClientError::Status { status, message })
}

/// Read a JSON body into a `ClientResponse`; an empty body yields `None`
pub(crate) async fn json_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<ClientResponse<T>, ClientError> {
    let status = response.status();
    let headers = response.headers().clone();
    let text = response.text().await?;

    let body = if text.trim().is_empty() {
        None
    } else {
        Some(serde_json::from_str(&text).map_err(|e| {
            ClientError::Decode(format!("{} - Response body: {}", e, text))
        })?)
    };

    Ok(ClientResponse {
        status,
        headers,
        body,
    })
}
