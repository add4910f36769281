use thiserror::Error;

const MAX_DETAIL_CHARS: usize = 200;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Cannot connect to API: {0}")]
    Connection(String),

    #[error("Request timed out")]
    Timeout,

    #[error("API error {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Background runtime unavailable: {0}")]
    Runtime(String),
}

impl AppError {
    /// Whether a read-only request that failed this way may be attempted again.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::Connection(_) | AppError::Timeout => true,
            AppError::Status { status, .. } => *status >= 500,
            AppError::Decode(_) | AppError::Config(_) | AppError::Runtime(_) => false,
        }
    }

    /// Builds a status error from a response body, preferring the backend's
    /// `{"detail": ...}` field over the raw text.
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| match v.get("detail") {
                Some(serde_json::Value::String(s)) => Some(s.clone()),
                Some(other) => Some(other.to_string()),
                None => None,
            })
            .unwrap_or_else(|| body.chars().take(MAX_DETAIL_CHARS).collect());
        AppError::Status { status, detail }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AppError::Timeout
        } else if e.is_decode() {
            AppError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            AppError::Status {
                status: status.as_u16(),
                detail: e.to_string(),
            }
        } else {
            AppError::Connection(e.to_string())
        }
    }
}

impl From<url::ParseError> for AppError {
    fn from(e: url::ParseError) -> Self {
        AppError::Config(e.to_string())
    }
}

/// Local precondition failures. Nothing reaches the network when one of these
/// is returned.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("No email selected")]
    NothingSelected,

    #[error("No AI response generated yet. Processing may still be in progress.")]
    NotReady,

    #[error("Response is empty. Type a response first.")]
    EmptyDraft,

    #[error("Response is unchanged, nothing to save")]
    Unchanged,

    #[error("A reply for this email is already being processed")]
    InFlight,

    #[error("Please fill in Title, Category, and Content")]
    MissingFields,
}

/// Operator-facing failure kinds. Each wraps the transport error behind it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    #[error("Failed to load: {0}")]
    Load(AppError),

    #[error("Failed to save response: {0}")]
    Save(AppError),

    #[error("Failed to send response: {0}")]
    Dispatch(AppError),

    #[error("Failed to create knowledge base item: {0}")]
    Create(AppError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_detail_prefers_json_field() {
        let err = AppError::from_status(404, r#"{"detail":"Email not found"}"#);
        assert_eq!(
            err,
            AppError::Status {
                status: 404,
                detail: "Email not found".to_string()
            }
        );
    }

    #[test]
    fn status_detail_truncates_raw_body() {
        let body = "x".repeat(500);
        let AppError::Status { detail, .. } = AppError::from_status(502, &body) else {
            panic!("expected status error");
        };
        assert_eq!(detail.len(), 200);
    }

    #[test]
    fn only_server_side_and_transport_errors_are_transient() {
        assert!(AppError::Timeout.is_transient());
        assert!(AppError::Connection("refused".into()).is_transient());
        assert!(AppError::from_status(503, "").is_transient());
        assert!(!AppError::from_status(400, "").is_transient());
        assert!(!AppError::Decode("bad json".into()).is_transient());
        assert!(!AppError::Runtime("no threads".into()).is_transient());
    }
}
