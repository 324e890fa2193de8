//! Transient user-facing messages shared by every consumer of the client.
//!
//! The queue is created once at startup and handed to whoever needs to post or render
//! messages: the HTTP client receives it as its [`FailureSink`](crate::http::FailureSink),
//! a UI layer subscribes to it. Each entry dismisses itself after [`AUTO_DISMISS_AFTER`].

mod queue;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use queue::{NotificationQueue, AUTO_DISMISS_AFTER};

/// Monotonic identifier allocated by the queue, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NotificationId(pub u64);

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Severity of a notification. Errors are the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    Error,
    Warning,
    Info,
    Success,
}

impl NotificationKind {
    pub fn label(&self) -> &'static str {
        match self {
            NotificationKind::Error => "error",
            NotificationKind::Warning => "warning",
            NotificationKind::Info => "info",
            NotificationKind::Success => "success",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
}
