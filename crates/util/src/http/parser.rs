use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Return a hint for status codes that usually mean misconfigured credentials.
///
/// # Example
/// ```rust
/// use docsource_util::http::status_error_message;
///
/// let unauthorized = status_error_message(401).unwrap();
/// assert!(unauthorized.contains("GOOGLE_OAUTH_ACCESS_TOKEN"));
///
/// let forbidden = status_error_message(403).unwrap();
/// assert!(forbidden.contains("Forbidden"));
///
/// assert!(status_error_message(404).is_none());
/// ```
pub fn status_error_message(status_code: u16) -> Option<String> {
    match status_code {
        401 => Some("Unauthorized (401). Hint: set GOOGLE_OAUTH_ACCESS_TOKEN=... to a valid access token".into()),
        403 => Some("Forbidden (403). Hint: check that the caller can read documents in this project and database".into()),
        _ => None,
    }
}

/// Extract the human readable message from a Google API error body.
///
/// Error bodies look like `{"error": {"code": 404, "message": "...", "status": "NOT_FOUND"}}`.
/// Falls back to a whitespace-collapsed preview of the raw text.
///
/// # Example
/// ```rust
/// use docsource_util::http::api_error_message;
///
/// let body = r#"{"error": {"code": 404, "message": "Document not found", "status": "NOT_FOUND"}}"#;
/// assert_eq!(api_error_message(body), "NOT_FOUND: Document not found");
/// assert_eq!(api_error_message("upstream\nconnect error"), "upstream connect error");
/// ```
pub fn api_error_message(text: &str) -> String {
    let parsed = serde_json::from_str::<Value>(text).ok();
    let error = parsed.as_ref().and_then(|value| value.get("error"));
    let message = error.and_then(|error| error.get("message")).and_then(Value::as_str);
    let status = error.and_then(|error| error.get("status")).and_then(Value::as_str);

    match (status, message) {
        (Some(status), Some(message)) => format!("{status}: {message}"),
        (None, Some(message)) => message.to_string(),
        _ => truncate_response_preview(text, 200),
    }
}

/// Parse HTTP response text into JSON, providing detailed errors on failure.
///
/// Any parse error is decorated with the originating status code and a
/// truncated preview of the body so malformed payloads can be diagnosed.
pub fn parse_response_json_strict(text: &str, status: Option<StatusCode>) -> Result<Value, JsonParseError> {
    serde_json::from_str::<Value>(text).map_err(|error| {
        let status_note = status
            .map(|code| format!("status {code}"))
            .unwrap_or_else(|| "unknown status".to_string());
        let preview = truncate_response_preview(text, 200);

        JsonParseError::new(status_note, error, preview)
    })
}

fn truncate_response_preview(text: &str, limit: usize) -> String {
    if text.trim().is_empty() {
        return "<empty>".to_string();
    }

    let mut preview = String::new();
    for ch in text.chars() {
        if preview.len() >= limit {
            preview.push_str("...");
            break;
        }
        match ch {
            '\n' | '\r' | '\t' => {
                if !preview.ends_with(' ') {
                    preview.push(' ');
                }
            }
            _ => preview.push(ch),
        }
    }

    preview.trim().to_string()
}

/// Error returned when strict JSON parsing of an HTTP response fails.
#[derive(Debug, Error)]
#[error("failed to parse JSON response ({status_note}): {source}. body preview: {body_preview}")]
pub struct JsonParseError {
    status_note: String,
    #[source]
    source: serde_json::Error,
    body_preview: String,
}

impl JsonParseError {
    pub fn new(status_note: String, source: serde_json::Error, body_preview: String) -> Self {
        Self {
            status_note,
            source,
            body_preview,
        }
    }

    pub fn body_preview(&self) -> &str {
        &self.body_preview
    }
}
