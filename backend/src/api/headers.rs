//! Response header helpers
//!
//! Alert headers carry a translation key (`fileManagerApp.file.created`) and
//! its parameter so a front-end can show a notification. Pagination headers
//! expose the total count and RFC 5988 navigation links.

use crate::storage::Page;
use axum::http::{HeaderMap, HeaderName, HeaderValue};

/// Application name used as the alert key prefix
pub const APPLICATION_NAME: &str = "fileManagerApp";

/// Header carrying the alert translation key
pub const ALERT_HEADER: &str = "x-filemanagerapp-alert";

/// Header carrying the alert parameter
pub const ALERT_PARAMS_HEADER: &str = "x-filemanagerapp-params";

/// Header carrying the total element count of a paged list
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

fn insert(headers: &mut HeaderMap, name: &'static str, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            headers.insert(HeaderName::from_static(name), value);
        }
        Err(e) => tracing::warn!(header = name, error = %e, "Dropping invalid header value"),
    }
}

/// Alert headers for a key and parameter
pub fn alert(message: &str, param: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    insert(&mut headers, ALERT_HEADER, message);
    insert(&mut headers, ALERT_PARAMS_HEADER, &urlencoding::encode(param));
    headers
}

/// Alert headers for a created entity
pub fn entity_creation_alert(entity_name: &str, param: &str) -> HeaderMap {
    alert(
        &format!("{}.{}.created", APPLICATION_NAME, entity_name),
        param,
    )
}

/// Alert headers for an updated entity
pub fn entity_update_alert(entity_name: &str, param: &str) -> HeaderMap {
    alert(
        &format!("{}.{}.updated", APPLICATION_NAME, entity_name),
        param,
    )
}

/// Alert headers for a deleted entity
pub fn entity_deletion_alert(entity_name: &str, param: &str) -> HeaderMap {
    alert(
        &format!("{}.{}.deleted", APPLICATION_NAME, entity_name),
        param,
    )
}

/// `X-Total-Count` and `Link` headers for a page served at `base_url`
pub fn pagination<T>(page: &Page<T>, base_url: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    insert(&mut headers, TOTAL_COUNT_HEADER, &page.total.to_string());

    let current = u64::from(page.request.page);
    let size = page.request.size;
    let last_page = page.total_pages().saturating_sub(1);
    let link = |p: u64, rel: &str| format!("<{}?page={}&size={}>; rel=\"{}\"", base_url, p, size, rel);

    let mut links = Vec::new();
    if current + 1 < page.total_pages() {
        links.push(link(current + 1, "next"));
    }
    if current > 0 {
        links.push(link(current - 1, "prev"));
    }
    links.push(link(last_page, "last"));
    links.push(link(0, "first"));

    insert(&mut headers, "link", &links.join(","));
    headers
}

/// `Content-Disposition` value for an attachment download
///
/// Non-ASCII names get an RFC 5987 `filename*` parameter next to a sanitized fallback.
pub fn content_disposition(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '"' | '\\' => '_',
            c if !c.is_ascii() => '_',
            _ => c,
        })
        .collect();

    if filename.is_ascii() && !filename.chars().any(|c| c.is_control() || c == '"' || c == '\\') {
        return format!("attachment; filename=\"{}\"", filename);
    }

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        sanitized,
        urlencoding::encode(filename)
    )
}
