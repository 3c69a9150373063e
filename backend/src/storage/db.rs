//! File database operations
//!
//! Handles all database interactions for file records and users.

use crate::error::AppError;
use crate::models::file::format_wire_date;
use crate::models::{FileDto, FileId, UserDto, UserId};
use crate::storage::page::{Page, PageRequest};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, SqlitePool};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info};

const FILE_COLUMNS: &str = "f.id, f.title, f.description, f.creation_date, f.user_id, \
     u.login AS user_login, u.first_name AS user_first_name";

/// A file row joined with its owner
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct FileRecord {
    /// Record id
    pub id: FileId,
    /// Stored file name
    pub title: String,
    /// Description
    pub description: Option<String>,
    /// Upload time (Unix timestamp, milliseconds)
    pub creation_date: Option<i64>,
    /// Owner id
    pub user_id: Option<UserId>,
    /// Owner login (joined)
    pub user_login: Option<String>,
    /// Owner first name (joined)
    pub user_first_name: Option<String>,
}

impl FileRecord {
    /// Get creation_date as DateTime
    pub fn creation_datetime(&self) -> Option<DateTime<Utc>> {
        self.creation_date
            .and_then(DateTime::from_timestamp_millis)
    }

    /// Map the row to its wire form
    pub fn to_dto(&self) -> FileDto {
        FileDto {
            id: Some(self.id),
            title: Some(self.title.clone()),
            description: self.description.clone(),
            creation_date: self.creation_datetime().map(format_wire_date),
            user_id: self.user_id,
            user_name: self.user_first_name.clone(),
        }
    }
}

/// Values for a new file row
#[derive(Debug, Clone)]
pub struct NewFile {
    /// Stored file name
    pub title: String,
    /// Description
    pub description: Option<String>,
    /// Upload time
    pub creation_date: DateTime<Utc>,
    /// Owner id
    pub user_id: UserId,
}

/// Database connection pool for file records
#[derive(Clone)]
pub struct FileDb {
    pool: SqlitePool,
}

impl FileDb {
    /// Initialize database connection pool
    ///
    /// # Arguments
    /// * `db_path` - Path to the SQLite database file
    ///
    /// # Returns
    /// * `Ok(FileDb)` if successful
    /// * `Err(AppError)` if connection failed
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        // Ensure parent directory exists
        if let Some(parent) = PathBuf::from(db_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::Internal(anyhow::anyhow!("Failed to create db directory: {}", e))
                })?;
            }
        }

        // SQLite connection string format: sqlite://path/to/db.db
        let connection_string = if db_path.starts_with("sqlite:") {
            db_path.to_string()
        } else {
            format!("sqlite:{}", db_path)
        };

        let options = SqliteConnectOptions::from_str(&connection_string)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid database path: {}", e)))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Failed to connect to database: {}", e))
            })?;

        info!("Connected to SQLite database at: {}", db_path);

        let db = Self { pool };
        db.run_migrations().await?;

        Ok(db)
    }

    /// Run database migrations
    async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations...");

        let migration_sql = include_str!("../../migrations/001_create_files.sql");

        for statement in split_statements(migration_sql) {
            sqlx::query(&statement)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::Internal(anyhow::anyhow!(
                        "Migration failed: {} - Statement: {}",
                        e,
                        statement.chars().take(100).collect::<String>()
                    ))
                })?;
        }

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get all users ordered by id
    pub async fn list_users(&self) -> Result<Vec<UserDto>, AppError> {
        let users = sqlx::query_as::<_, UserDto>(
            "SELECT id, login, first_name, last_name, email FROM users ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Get a user by login
    pub async fn find_user_by_login(&self, login: &str) -> Result<Option<UserDto>, AppError> {
        let user = sqlx::query_as::<_, UserDto>(
            "SELECT id, login, first_name, last_name, email FROM users WHERE login = ?",
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get a user by id
    pub async fn find_user(&self, id: UserId) -> Result<Option<UserDto>, AppError> {
        let user = sqlx::query_as::<_, UserDto>(
            "SELECT id, login, first_name, last_name, email FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Insert a file row and return its id
    pub async fn insert_file(&self, file: &NewFile) -> Result<FileId, AppError> {
        let result = sqlx::query(
            "INSERT INTO files (title, description, creation_date, user_id) VALUES (?, ?, ?, ?)",
        )
        .bind(&file.title)
        .bind(&file.description)
        .bind(file.creation_date.timestamp_millis())
        .bind(file.user_id)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!("Created file record: {}", id);
        Ok(id)
    }

    /// Get a file row by id
    pub async fn get_file(&self, id: FileId) -> Result<Option<FileRecord>, AppError> {
        let sql = format!(
            "SELECT {FILE_COLUMNS} FROM files f LEFT JOIN users u ON u.id = f.user_id WHERE f.id = ?"
        );
        let record = sqlx::query_as::<_, FileRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    /// Get one page of the files owned by a user
    pub async fn list_files_for_user(
        &self,
        user_id: UserId,
        request: &PageRequest,
    ) -> Result<Page<FileRecord>, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM files WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "SELECT {FILE_COLUMNS} FROM files f LEFT JOIN users u ON u.id = f.user_id \
             WHERE f.user_id = ? ORDER BY {} LIMIT ? OFFSET ?",
            request.order_by()
        );
        let content = sqlx::query_as::<_, FileRecord>(&sql)
            .bind(user_id)
            .bind(i64::from(request.size))
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(Page {
            content,
            total: u64::try_from(total).unwrap_or_default(),
            request: request.clone(),
        })
    }

    /// Overwrite the editable columns of a file row
    ///
    /// Returns false when no row has the given id.
    pub async fn update_file(
        &self,
        id: FileId,
        title: &str,
        description: Option<&str>,
        creation_date: Option<DateTime<Utc>>,
        user_id: Option<UserId>,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE files SET title = ?, description = ?, creation_date = ?, user_id = ? WHERE id = ?",
        )
        .bind(title)
        .bind(description)
        .bind(creation_date.map(|d| d.timestamp_millis()))
        .bind(user_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        debug!("Updated file record: {}", id);
        Ok(result.rows_affected() > 0)
    }

    /// Delete a file row
    ///
    /// Returns false when no row has the given id.
    pub async fn delete_file(&self, id: FileId) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM files WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!("Deleted file record: {}", id);
        Ok(result.rows_affected() > 0)
    }

}

/// Split a migration script into statements, dropping `--` comments
fn split_statements(sql: &str) -> Vec<String> {
    let mut cleaned_sql = String::new();
    for line in sql.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("--") {
            continue;
        }
        let without_comments = match trimmed.find("--") {
            Some(comment_pos) => &trimmed[..comment_pos],
            None => trimmed,
        };
        cleaned_sql.push_str(without_comments.trim());
        cleaned_sql.push(' ');
    }

    cleaned_sql
        .split(';')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::page::{SortField, SortOrder};
    use chrono::TimeZone;
    use tempfile::tempdir;

    async fn create_test_db() -> (FileDb, tempfile::TempDir) {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("test.db");
        let db = FileDb::new(path.to_str().unwrap())
            .await
            .expect("Failed to open database");
        (db, dir)
    }

    fn new_file(title: &str, user_id: UserId, ts: i64) -> NewFile {
        NewFile {
            title: title.to_string(),
            description: Some(format!("about {}", title)),
            creation_date: Utc.timestamp_opt(ts, 0).unwrap(),
            user_id,
        }
    }

    #[test]
    fn test_split_statements_strips_comments() {
        let statements = split_statements(
            "-- header\nCREATE TABLE a (x INTEGER); -- trailing\nINSERT INTO a VALUES (1);\n",
        );
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0], "CREATE TABLE a (x INTEGER)");
    }

    #[tokio::test]
    async fn test_seeded_users() {
        let (db, _dir) = create_test_db().await;
        let users = db.list_users().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].login, "admin");

        let user = db.find_user_by_login("user").await.unwrap().unwrap();
        assert_eq!(user.id, 2);
        assert!(db.find_user_by_login("ghost").await.unwrap().is_none());
        assert_eq!(db.find_user(1).await.unwrap().unwrap().login, "admin");
    }

    #[tokio::test]
    async fn test_insert_and_get_file() {
        let (db, _dir) = create_test_db().await;
        let id = db.insert_file(&new_file("a.txt", 2, 1_551_435_300)).await.unwrap();

        let record = db.get_file(id).await.unwrap().expect("record");
        assert_eq!(record.title, "a.txt");
        assert_eq!(record.user_login.as_deref(), Some("user"));

        let dto = record.to_dto();
        assert_eq!(dto.creation_date.as_deref(), Some("2019-03-01T10:15:00.000Z"));
        assert_eq!(dto.user_name.as_deref(), Some("User"));
    }

    #[tokio::test]
    async fn test_creation_date_keeps_milliseconds() {
        let (db, _dir) = create_test_db().await;
        let mut file = new_file("a.txt", 2, 0);
        file.creation_date = Utc.timestamp_millis_opt(1_551_435_300_123).unwrap();
        let id = db.insert_file(&file).await.unwrap();

        let dto = db.get_file(id).await.unwrap().unwrap().to_dto();
        assert_eq!(dto.creation_date.as_deref(), Some("2019-03-01T10:15:00.123Z"));
    }

    #[tokio::test]
    async fn test_list_files_for_user_paginates_and_filters_owner() {
        let (db, _dir) = create_test_db().await;
        for (i, title) in ["c.txt", "a.txt", "b.txt"].iter().enumerate() {
            db.insert_file(&new_file(title, 2, i as i64)).await.unwrap();
        }
        db.insert_file(&new_file("admin.txt", 1, 0)).await.unwrap();

        let request = PageRequest {
            page: 0,
            size: 2,
            sort: vec![SortOrder {
                field: SortField::Title,
                ascending: true,
            }],
        };
        let page = db.list_files_for_user(2, &request).await.unwrap();
        assert_eq!(page.total, 3);
        let titles: Vec<_> = page.content.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["a.txt", "b.txt"]);

        let second = db
            .list_files_for_user(2, &PageRequest { page: 1, ..request })
            .await
            .unwrap();
        assert_eq!(second.content.len(), 1);
        assert_eq!(second.content[0].title, "c.txt");
    }

    #[tokio::test]
    async fn test_update_and_delete_file() {
        let (db, _dir) = create_test_db().await;
        let id = db.insert_file(&new_file("a.txt", 2, 0)).await.unwrap();

        assert!(db
            .update_file(id, "renamed.txt", Some("new"), None, Some(1))
            .await
            .unwrap());
        let record = db.get_file(id).await.unwrap().unwrap();
        assert_eq!(record.title, "renamed.txt");
        assert_eq!(record.user_id, Some(1));
        assert!(record.creation_date.is_none());

        assert!(!db.update_file(999, "x", None, None, None).await.unwrap());
        assert!(db.delete_file(id).await.unwrap());
        assert!(!db.delete_file(id).await.unwrap());
        assert!(db.get_file(id).await.unwrap().is_none());
    }
}
