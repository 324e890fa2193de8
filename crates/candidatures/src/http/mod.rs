//! JSON-over-HTTP access to the remote candidature API.
//!
//! [`ApiClient`] owns header defaults, status classification and error messages. It
//! reports every HTTP status failure to a [`FailureSink`] before returning the error, so
//! failures stay visible even when a caller ignores them.

mod client;
mod error;
mod query;

pub use client::{ApiClient, RequestOptions};
pub use error::ApiError;
pub use query::{build_query_string, QueryParams};
pub use reqwest::StatusCode;

/// Receives the user-facing description of every failed request.
pub trait FailureSink: Send + Sync {
    fn on_request_failure(&self, message: &str);
}

/// Sink for callers that surface failures some other way.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardFailures;

impl FailureSink for DiscardFailures {
    fn on_request_failure(&self, _message: &str) {}
}
