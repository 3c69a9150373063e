//! Domain and wire models
//!
//! `File` is the in-memory record used by callers; `FileDto` is its JSON
//! representation on the wire. `UserDto` backs the owner selection list.

pub mod file;
pub mod user;

pub use file::{File, FileDto, FileId};
pub use user::{UserDto, UserId};
