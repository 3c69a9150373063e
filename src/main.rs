// File Manager GUI - Main Entry Point
// Native Rust GUI for uploading, editing, downloading and deleting files on a file manager server

mod config;
mod state;
mod ui;

use config::GuiConfig;
use eframe::egui;
use file_manager_backend::client::{FileClient, UserClient};
use state::AppState;
use std::sync::Arc;
use ui::render_app_layout;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = GuiConfig::from_env();
    tracing::info!("Configuration loaded: {:?}", config);

    // Network calls are awaited on this runtime from the UI thread
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {}", e);
            std::process::exit(1);
        }
    };

    // Configure window options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("File Manager")
            .with_inner_size([1000.0, 700.0])
            .with_min_inner_size([800.0, 600.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "File Manager",
        options,
        Box::new(move |_cc| Box::new(FileManagerApp::new(runtime, &config))),
    )
}

/// Main application struct
/// Owns the runtime the services run on and the application state
struct FileManagerApp {
    /// Runtime for blocking on service calls
    runtime: tokio::runtime::Runtime,
    /// Routes, list, form and alerts
    state: AppState,
}

impl FileManagerApp {
    /// Create the application against the configured server
    fn new(runtime: tokio::runtime::Runtime, config: &GuiConfig) -> Self {
        let http = reqwest::Client::new();
        let mut files = FileClient::new(http.clone(), &config.api_url);
        let mut users = UserClient::new(http, &config.api_url);
        if let Some(login) = &config.login {
            files = files.with_login(login.clone());
            users = users.with_login(login.clone());
        }

        Self {
            runtime,
            state: AppState::new(
                Arc::new(files),
                Arc::new(users),
                config.download_dir.clone(),
            ),
        }
    }
}

impl eframe::App for FileManagerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.runtime.block_on(self.state.refresh());
        self.state.collect_alerts();

        let actions = render_app_layout(ctx, &mut self.state);
        for action in actions {
            self.runtime.block_on(self.state.handle(action));
        }
        if !self.state.alerts.is_empty() || self.state.list.stale {
            ctx.request_repaint();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use state::Route;

    #[test]
    fn test_app_creation() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let config = GuiConfig {
            api_url: "http://127.0.0.1:9".to_string(),
            login: Some("admin".to_string()),
            download_dir: std::env::temp_dir(),
        };
        let app = FileManagerApp::new(runtime, &config);
        assert_eq!(app.state.current_route(), Route::FileList);
        assert!(app.state.editor.is_none());
        assert!(app.state.list.stale);
    }
}
