//! Client-side core for browsing and curating job-application records.
//!
//! - [`http`]: JSON request wrapper that classifies responses and reports failures.
//! - [`candidatures`]: observable store with list, detail, status and delete verbs.
//! - [`notifications`]: shared queue of auto-expiring user messages.
//! - [`format`]: pure presentation helpers.

pub mod candidatures;
pub mod config;
pub mod error;
pub mod format;
pub mod http;
pub mod notifications;
pub mod telemetry;
