// Alert service
// Shared queue of user-facing messages; the UI drains it every frame

use file_manager_backend::client::ClientResponse;
use std::sync::{Arc, Mutex};

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation succeeded
    Success,
    /// Operation failed
    Error,
}

/// One user-facing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Severity of the message
    pub severity: Severity,
    /// Text shown to the user
    pub message: String,
}

/// Cloneable handle to the alert queue
#[derive(Debug, Clone, Default)]
pub struct AlertService {
    queue: Arc<Mutex<Vec<Alert>>>,
}

impl AlertService {
    /// Create an empty alert queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an error message
    pub fn error(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(alert = %message, "Error alert");
        self.push(Severity::Error, message);
    }

    /// Queue a success message
    pub fn success(&self, message: impl Into<String>) {
        self.push(Severity::Success, message.into());
    }

    /// Take every queued alert, oldest first
    pub fn drain(&self) -> Vec<Alert> {
        match self.queue.lock() {
            Ok(mut queue) => std::mem::take(&mut *queue),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    /// True when no alert is waiting
    pub fn is_empty(&self) -> bool {
        match self.queue.lock() {
            Ok(queue) => queue.is_empty(),
            Err(poisoned) => poisoned.into_inner().is_empty(),
        }
    }

    /// Queue the success message carried by a response's alert headers
    pub fn success_from<T>(&self, response: &ClientResponse<T>) {
        if let Some(message) = alert_text(response) {
            self.success(message);
        }
    }

    fn push(&self, severity: Severity, message: String) {
        let alert = Alert { severity, message };
        match self.queue.lock() {
            Ok(mut queue) => queue.push(alert),
            Err(poisoned) => poisoned.into_inner().push(alert),
        }
    }
}

/// Readable text for an `X-fileManagerApp-alert` key and its parameter
fn alert_text<T>(response: &ClientResponse<T>) -> Option<String> {
    let key = response.alert()?;
    let param = response.alert_param().unwrap_or_default();
    let action = key.rsplit('.').next().unwrap_or(key);
    Some(match action {
        "created" => format!("A new file is created with identifier {}", param),
        "updated" => format!("A file is updated with identifier {}", param),
        "deleted" => format!("A file is deleted with identifier {}", param),
        _ => key.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_returns_in_order_and_empties() {
        let alerts = AlertService::new();
        alerts.success("saved");
        alerts.error("failed");

        let drained = alerts.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].severity, Severity::Success);
        assert_eq!(drained[1].message, "failed");
        assert!(alerts.drain().is_empty());
    }

    #[test]
    fn test_success_from_alert_headers() {
        use file_manager_backend::client::{ALERT_HEADER, ALERT_PARAMS_HEADER};
        use reqwest::header::{HeaderMap, HeaderValue};

        let mut headers = HeaderMap::new();
        headers.insert(ALERT_HEADER, HeaderValue::from_static("fileManagerApp.file.deleted"));
        headers.insert(ALERT_PARAMS_HEADER, HeaderValue::from_static("7"));
        let response: ClientResponse<()> = ClientResponse {
            status: reqwest::StatusCode::OK,
            headers,
            body: None,
        };

        let alerts = AlertService::new();
        alerts.success_from(&response);
        alerts.success_from(&ClientResponse::<()> {
            status: reqwest::StatusCode::OK,
            headers: HeaderMap::new(),
            body: None,
        });

        let drained = alerts.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].message, "A file is deleted with identifier 7");
    }

    #[test]
    fn test_clones_share_queue() {
        let alerts = AlertService::new();
        let handle = alerts.clone();
        handle.error("from clone");
        assert_eq!(alerts.drain().len(), 1);
    }
}
