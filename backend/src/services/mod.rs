//! Service layer for business logic
//!
//! File business rules (upload, relocation, deletion) kept apart from the
//! HTTP handlers.

pub mod files;
