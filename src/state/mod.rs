// State management module
// Handles routing, alerts, the file list and the file form

pub mod alerts;
pub mod app_state;
pub mod file_list;
pub mod file_update;
pub mod navigation;
pub mod resolver;

#[cfg(test)]
pub(crate) mod fakes;

pub use alerts::{Alert, Severity};
pub use app_state::AppState;
pub use file_list::FileListState;
pub use file_update::track_user_by_id;
pub use navigation::Route;
