// Application state management
// Contains the route stack, list and form state, and the actions the UI raises

use crate::state::alerts::{Alert, AlertService};
use crate::state::file_list::FileListState;
use crate::state::file_update::FileUpdateComponent;
use crate::state::navigation::{Navigator, Route, RouteStack};
use crate::state::resolver::resolve_file;
use file_manager_backend::client::{FileApi, FileUpload, UserApi};
use file_manager_backend::models::{File, FileId};
use std::path::PathBuf;
use std::sync::Arc;

/// Form component over the trait-object services the app runs with
pub type FileEditor = FileUpdateComponent<dyn FileApi, dyn UserApi>;

/// Maximum number of alerts kept on screen
const MAX_VISIBLE_ALERTS: usize = 5;

/// Something the user asked for in the last frame
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    /// Open a screen
    Open(Route),
    /// Leave the form without saving
    Back,
    /// Save the form
    Save,
    /// Queue a local file for upload
    Attach(PathBuf),
    /// Reload the list
    Refresh,
    /// Show another list page
    GoToPage(u32),
    /// Delete a file
    Delete(FileId),
    /// Save a file's content into the download directory
    Download(File),
}

/// UI-specific state
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Text of the "attach from path" field
    pub attach_path: String,
    /// File awaiting delete confirmation
    pub confirm_delete: Option<FileId>,
}

/// Main application state
pub struct AppState {
    files: Arc<dyn FileApi>,
    users: Arc<dyn UserApi>,
    /// Screen history
    pub routes: RouteStack,
    /// File list screen
    pub list: FileListState,
    /// Open form, if a form route is shown
    pub editor: Option<FileEditor>,
    /// Shared alert queue
    pub alerts: AlertService,
    /// Alerts currently on screen, newest last
    pub visible_alerts: Vec<Alert>,
    /// Where downloads are written
    pub download_dir: PathBuf,
    /// UI state preferences
    pub ui_state: UiState,
}

impl AppState {
    /// Create state over the given services, starting at the file list
    pub fn new(files: Arc<dyn FileApi>, users: Arc<dyn UserApi>, download_dir: PathBuf) -> Self {
        Self {
            files,
            users,
            routes: RouteStack::new(),
            list: FileListState::new(),
            editor: None,
            alerts: AlertService::new(),
            visible_alerts: Vec::new(),
            download_dir,
            ui_state: UiState::default(),
        }
    }

    /// Route currently shown
    pub fn current_route(&self) -> Route {
        self.routes.current()
    }

    /// Apply one UI action
    pub async fn handle(&mut self, action: UiAction) {
        tracing::debug!(?action, "Handling UI action");
        match action {
            UiAction::Open(route) => self.open(route).await,
            UiAction::Back => self.back(),
            UiAction::Save => self.save().await,
            UiAction::Attach(path) => self.attach(path).await,
            UiAction::Refresh => self.list.stale = true,
            UiAction::GoToPage(page) => self.list.go_to_page(page),
            UiAction::Delete(id) => {
                self.ui_state.confirm_delete = None;
                self.list.delete(&*self.files, id, &self.alerts).await;
            }
            UiAction::Download(file) => {
                match FileListState::download(&*self.files, &file, &self.download_dir).await {
                    Ok(path) => self
                        .alerts
                        .success(format!("Saved {} to {}", file.title, path.display())),
                    Err(e) => self.alerts.error(e.to_string()),
                }
            }
        }
        self.sync_route();
    }

    /// Reload the list when it is shown and out of date
    pub async fn refresh(&mut self) {
        if self.current_route() == Route::FileList && self.list.stale {
            self.list.load(&*self.files, &self.alerts).await;
        }
    }

    /// Move queued alerts on screen, keeping the newest few
    pub fn collect_alerts(&mut self) {
        self.visible_alerts.extend(self.alerts.drain());
        let overflow = self.visible_alerts.len().saturating_sub(MAX_VISIBLE_ALERTS);
        self.visible_alerts.drain(..overflow);
    }

    /// Dismiss an on-screen alert
    pub fn dismiss_alert(&mut self, index: usize) {
        if index < self.visible_alerts.len() {
            self.visible_alerts.remove(index);
        }
    }

    /// Show a screen; a form opened from another form takes its place
    async fn open(&mut self, route: Route) {
        if route == Route::FileList {
            self.routes.replace(route);
            return;
        }

        let resolved = match resolve_file(&*self.files, route.file_id()).await {
            Ok(file) => file,
            Err(e) => {
                self.alerts.error(e.to_string());
                return;
            }
        };

        let mut editor = FileUpdateComponent::new(
            Arc::clone(&self.files),
            Arc::clone(&self.users),
            self.alerts.clone(),
        );
        editor.init(resolved).await;
        self.editor = Some(editor);
        self.routes.replace(route);
    }

    fn back(&mut self) {
        match &self.editor {
            Some(editor) => editor.previous_state(&mut self.routes),
            None => self.routes.previous_state(),
        }
    }

    async fn save(&mut self) {
        if let Some(editor) = self.editor.as_mut() {
            editor.save(&mut self.routes).await;
        }
    }

    async fn attach(&mut self, path: PathBuf) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        match FileUpload::from_path(&path).await {
            Ok(upload) => {
                editor.attach(upload);
                self.ui_state.attach_path.clear();
            }
            Err(e) => self.alerts.error(e.to_string()),
        }
    }

    /// Drop the form once its route is gone and reload the list after edits
    fn sync_route(&mut self) {
        if self.current_route() == Route::FileList && self.editor.take().is_some() {
            self.list.stale = true;
        }
    }
}
