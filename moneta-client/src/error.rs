//! The client-side error taxonomy.
//!
//! Every failure a caller can see falls into one of these buckets, so a
//! command can pick its message without inspecting transport internals:
//! 401 ends the session globally, 5xx is transient, transport failures get
//! a connectivity message, and everything else carries the server's own
//! message for context-specific reporting.

use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server rejected the credentials or token. By the time a caller
    /// sees this, the session has already been invalidated.
    #[error("session is no longer valid")]
    Unauthorized,

    /// 5xx from the server. Transient; not retried automatically.
    #[error("internal server error, please try again later")]
    Server,

    /// Any other non-success status, with the server's message when the
    /// body carried one.
    #[error("{status}: {message}")]
    Status { status: StatusCode, message: String },

    /// No response was received at all (DNS, refused connection, timeout).
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The response arrived but its body was not the expected shape.
    #[error("could not decode response: {0}")]
    Decode(#[source] reqwest::Error),

    /// Writing a downloaded stream to the caller's sink failed.
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// True for failures where no usable response came back, so the caller
    /// should show a connectivity message rather than a server one.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}

/// Map an error status to the taxonomy. Success statuses never reach this.
pub(crate) fn classify_status(status: StatusCode, message: String) -> ApiError {
    if status == StatusCode::UNAUTHORIZED {
        ApiError::Unauthorized
    } else if status.is_server_error() {
        ApiError::Server
    } else {
        ApiError::Status { status, message }
    }
}

/// Pull a human-readable message out of an error body. The API wraps its
/// messages as `{"message": "..."}`; fall back to the raw text, then to
/// the status line.
pub(crate) fn extract_message(body: &str, status: StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_401_and_5xx() {
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED, String::new()),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR, String::new()),
            ApiError::Server
        ));
        assert!(matches!(
            classify_status(StatusCode::BAD_GATEWAY, String::new()),
            ApiError::Server
        ));
    }

    #[test]
    fn test_other_statuses_propagate_with_message() {
        let err = classify_status(StatusCode::CONFLICT, "category exists".to_string());
        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, StatusCode::CONFLICT);
                assert_eq!(message, "category exists");
            }
            other => panic!("expected Status, got {other:?}"),
        }
    }

    #[test]
    fn test_extract_message_variants() {
        assert_eq!(
            extract_message(r#"{"message":"email taken"}"#, StatusCode::CONFLICT),
            "email taken"
        );
        assert_eq!(
            extract_message("plain text error", StatusCode::BAD_REQUEST),
            "plain text error"
        );
        assert_eq!(extract_message("", StatusCode::NOT_FOUND), "Not Found");
    }
}
