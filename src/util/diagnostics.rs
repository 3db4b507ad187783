use crate::{BodySnippetConfig, Credentials};
use http::HeaderMap;

use super::redact::{redact_text, truncate_utf8};

pub(crate) fn request_id(headers: &HeaderMap) -> Option<Box<str>> {
    for name in ["x-arequestid", "x-request-id", "x-correlation-id"] {
        if let Some(value) = headers.get(name).and_then(|v| v.to_str().ok()) {
            let value = value.trim();
            if !value.is_empty() {
                return Some(value.to_string().into_boxed_str());
            }
        }
    }
    None
}

/// Bamboo reports REST failures as `{"message": "...", "status-code": 404}`.
pub(crate) fn extract_message(body: &[u8]) -> Option<Box<str>> {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) else {
        return None;
    };

    for key in ["message", "error", "errors"] {
        let msg = match value.get(key) {
            Some(serde_json::Value::String(msg)) => msg.trim(),
            Some(serde_json::Value::Array(items)) => {
                match items.first().and_then(|v| v.as_str()) {
                    Some(msg) => msg.trim(),
                    None => continue,
                }
            }
            _ => continue,
        };
        if !msg.is_empty() {
            return Some(msg.to_string().into_boxed_str());
        }
    }
    None
}

pub(crate) fn body_snippet(
    body: &[u8],
    config: BodySnippetConfig,
    credentials: Option<&Credentials>,
) -> Option<Box<str>> {
    if !config.enabled {
        return None;
    }

    let body = String::from_utf8_lossy(body);
    let snippet = truncate_utf8(&body, config.max_bytes).to_string();
    Some(redact_text(snippet, credentials).into_boxed_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_message_reads_bamboo_error_payload() {
        let body = br#"{"message":"Plan PROJ-X not found","status-code":404}"#;
        assert_eq!(
            extract_message(body).as_deref(),
            Some("Plan PROJ-X not found")
        );
        assert_eq!(extract_message(b"<html/>"), None);
    }

    #[test]
    fn body_snippet_is_disabled_on_request() {
        let config = BodySnippetConfig {
            enabled: false,
            max_bytes: 16,
        };
        assert_eq!(body_snippet(b"anything", config, None), None);
    }
}
