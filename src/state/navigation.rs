// Navigation
// Route stack for the file screens with history-back support

use file_manager_backend::models::FileId;

/// Screens of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Paged list of the user's files
    FileList,
    /// Upload form for a new file
    NewFile,
    /// Edit form for an existing file
    EditFile(FileId),
}

impl Route {
    /// Id the route resolves a file from, if any
    pub fn file_id(&self) -> Option<FileId> {
        match self {
            Route::EditFile(id) => Some(*id),
            _ => None,
        }
    }
}

/// Moves between screens
pub trait Navigator {
    /// Open a route, keeping the current one in history
    fn navigate(&mut self, route: Route);

    /// Go back to the previous route
    fn previous_state(&mut self);
}

/// History stack; the bottom entry is always the file list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteStack {
    history: Vec<Route>,
}

impl Default for RouteStack {
    fn default() -> Self {
        Self {
            history: vec![Route::FileList],
        }
    }
}

impl RouteStack {
    /// Start at the file list
    pub fn new() -> Self {
        Self::default()
    }

    /// Route currently shown
    pub fn current(&self) -> Route {
        self.history.last().copied().unwrap_or(Route::FileList)
    }

    /// Show `route` in place of the current form, if one is open
    pub fn replace(&mut self, route: Route) {
        if self.history.len() > 1 {
            self.history.pop();
        }
        self.navigate(route);
    }
}

impl Navigator for RouteStack {
    fn navigate(&mut self, route: Route) {
        if self.current() != route {
            self.history.push(route);
        }
    }

    fn previous_state(&mut self) {
        if self.history.len() > 1 {
            self.history.pop();
        }
    }
}
