use reqwest::StatusCode;

/// Failure of a single request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-success status. `message` is the text posted to the failure sink.
    #[error("{message}")]
    Status { status: StatusCode, message: String },
    /// No response was received.
    #[error("network request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),
    #[error("invalid request target '{target}': {source}")]
    InvalidTarget {
        target: String,
        #[source]
        source: url::ParseError,
    },
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
}

impl ApiError {
    /// Human-readable description, or `None` when the error renders as blank text.
    pub fn description(&self) -> Option<String> {
        let rendered = self.to_string();
        if rendered.trim().is_empty() {
            None
        } else {
            Some(rendered)
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// `API Error (<status>): <reason>. <body>`
pub(crate) fn status_message(status: StatusCode, body: &str) -> String {
    format!(
        "API Error ({}): {}. {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or_default(),
        body
    )
}
