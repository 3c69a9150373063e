//! File record models
//!
//! Defines the in-memory `File` record, its JSON wire form `FileDto`, and the
//! date conversions applied whenever a record crosses the wire.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserId;

/// Identifier of a persisted file record
pub type FileId = i64;

/// A file record as held by callers
///
/// `id` is unset until the record has been persisted; its presence is what
/// distinguishes an update from a create.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct File {
    /// Database identifier, `None` for records not yet created
    pub id: Option<FileId>,
    /// File name as stored (the upload's cleaned file name)
    pub title: String,
    /// Free-form description entered by the user
    pub description: String,
    /// When the file was uploaded
    pub creation_date: Option<DateTime<Utc>>,
    /// Owner of the file
    pub user_id: Option<UserId>,
    /// Display name of the owner (read-only, filled in by the server)
    pub user_name: Option<String>,
}

/// JSON representation of a file record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDto {
    /// Database identifier
    #[serde(default)]
    pub id: Option<FileId>,
    /// File name
    #[serde(default)]
    pub title: Option<String>,
    /// Description
    #[serde(default)]
    pub description: Option<String>,
    /// Upload timestamp as an RFC 3339 string
    #[serde(default)]
    pub creation_date: Option<String>,
    /// Owner id
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Owner display name
    #[serde(default)]
    pub user_name: Option<String>,
}

impl File {
    /// Create an unsaved record with a title and description
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    /// Whether this record has not been persisted yet
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Convert to the wire form, serializing the date for the server
    pub fn to_dto(&self) -> FileDto {
        FileDto {
            id: self.id,
            title: Some(self.title.clone()),
            description: Some(self.description.clone()),
            creation_date: self.creation_date.map(format_wire_date),
            user_id: self.user_id,
            user_name: self.user_name.clone(),
        }
    }

    /// Build a record from the wire form, parsing the date
    ///
    /// A missing or unparseable date becomes `None`.
    pub fn from_dto(dto: FileDto) -> Self {
        Self {
            id: dto.id,
            title: dto.title.unwrap_or_default(),
            description: dto.description.unwrap_or_default(),
            creation_date: dto.creation_date.as_deref().and_then(parse_wire_date),
            user_id: dto.user_id,
            user_name: dto.user_name,
        }
    }
}

impl From<FileDto> for File {
    fn from(dto: FileDto) -> Self {
        File::from_dto(dto)
    }
}

impl From<&File> for FileDto {
    fn from(file: &File) -> Self {
        file.to_dto()
    }
}

/// Format a timestamp the way it travels on the wire (`2019-03-01T10:15:00.000Z`)
pub fn format_wire_date(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a wire timestamp, accepting any RFC 3339 offset
pub fn parse_wire_date(value: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(value.trim()) {
        Ok(date) => Some(date.with_timezone(&Utc)),
        Err(e) => {
            tracing::warn!(value = %value, error = %e, "Ignoring unparseable creation date");
            None
        }
    }
}
