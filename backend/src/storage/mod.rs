//! Persistence layer
//!
//! SQLite holds file records and users; uploaded contents live on disk.

pub mod blobs;
pub mod db;
pub mod page;

pub use blobs::{clean_file_name, BlobStore};
pub use db::{FileDb, FileRecord, NewFile};
pub use page::{Page, PageRequest, SortField, SortOrder};
