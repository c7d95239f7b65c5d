//! Wire-level debugging via LOUD_WIRE environment variable.
//!
//! When `LOUD_WIRE` is set to any value, prints RPC requests and responses to
//! stderr with pretty formatting and colors.
//!
//! # Usage
//!
//! ```bash
//! LOUD_WIRE=1 DROPBOX_TOKEN=... cargo run --example list_folder
//! ```
//!
//! # Output Format
//!
//! - Green `>>>` for outgoing requests
//! - Red `<<<` for incoming responses
//! - Timestamps and request IDs for correlation

use super::error_helpers::truncate_for_context;
use crate::errors::DropboxError;
use colored::Colorize;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Request ID counter for correlating requests with responses
static REQUEST_COUNTER: AtomicUsize = AtomicUsize::new(1);

/// Cached check for whether LOUD_WIRE is enabled
static ENABLED: OnceLock<bool> = OnceLock::new();

/// Bodies that are not JSON are cut to this many bytes.
const RAW_BODY_LIMIT: usize = 500;

/// Check if LOUD_WIRE debugging is enabled.
///
/// Cached after the first call, so `LOUD_WIRE` must be set before the first
/// request is made.
#[must_use]
pub fn is_enabled() -> bool {
    *ENABLED.get_or_init(|| std::env::var("LOUD_WIRE").is_ok())
}

/// Get the next request ID for correlation.
#[must_use]
pub fn next_request_id() -> usize {
    REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed)
}

fn timestamp() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

/// Log prefix with timestamp and request ID.
fn prefix(request_id: usize) -> String {
    format!(
        "{} {} {}",
        "[LOUD_WIRE]".bold(),
        timestamp().dimmed(),
        format!("[REQ#{request_id}]").cyan()
    )
}

/// Renders a body for display: colored JSON when it parses, otherwise
/// (truncated) text.
fn render_body(body: &[u8]) -> Vec<String> {
    if let Ok(parsed) = serde_json::from_slice::<serde_json::Value>(body) {
        if let Ok(colored) = colored_json::to_colored_json_auto(&parsed) {
            return colored.lines().map(str::to_string).collect();
        }
        if let Ok(pretty) = serde_json::to_string_pretty(&parsed) {
            return pretty.lines().map(str::to_string).collect();
        }
    }
    let text = String::from_utf8_lossy(body);
    vec![truncate_for_context(&text, RAW_BODY_LIMIT)]
}

/// Log an outgoing RPC request.
pub fn log_request(request_id: usize, method: &str, url: &str, body: Option<&[u8]>) {
    if !is_enabled() {
        return;
    }

    let prefix = prefix(request_id);
    let direction = ">>>".green().bold();
    eprintln!("{prefix} {direction} {method} {url}");

    if let Some(body) = body {
        eprintln!("{prefix} {}:", "Body".green());
        for line in render_body(body) {
            eprintln!("{prefix} {line}");
        }
    }
}

/// Log an incoming HTTP response status.
pub fn log_response_status(request_id: usize, status: u16) {
    if !is_enabled() {
        return;
    }

    let prefix = prefix(request_id);
    let direction = "<<<".red().bold();
    let status_text = if (200..300).contains(&status) {
        status.to_string().green()
    } else {
        status.to_string().red()
    };
    eprintln!("{prefix} {direction} Status: {status_text}");
}

/// Log a successful response body.
pub fn log_response_body(request_id: usize, body: &[u8]) {
    if !is_enabled() {
        return;
    }

    let prefix = prefix(request_id);
    eprintln!("{prefix} {}:", "Body".red());
    for line in render_body(body) {
        eprintln!("{prefix} {line}");
    }
}

/// Log the error a request ended with.
pub fn log_error(request_id: usize, error: &DropboxError) {
    if !is_enabled() {
        return;
    }

    let prefix = prefix(request_id);
    eprintln!("{prefix} {} {error}", "Error:".red().bold());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ids_increase() {
        let first = next_request_id();
        let second = next_request_id();
        assert!(second > first);
    }

    #[test]
    fn test_render_body_pretty_prints_json() {
        let lines = render_body(br#"{"path":"/docs","cursor":"c1"}"#);
        assert!(lines.len() > 1);
        assert!(lines.iter().any(|l| l.contains("\"path\"")));
    }

    #[test]
    fn test_render_body_truncates_non_json() {
        let body = "x".repeat(2 * RAW_BODY_LIMIT);
        let lines = render_body(body.as_bytes());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].len(), RAW_BODY_LIMIT + 3);
    }

    #[test]
    fn test_timestamp_format() {
        let ts = timestamp();
        assert!(ts.ends_with('Z'));
        assert_eq!(ts.len(), "2026-01-01T00:00:00.000Z".len());
    }
}
