use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{Notification, NotificationId, NotificationKind};
use crate::http::FailureSink;

/// Lifetime of a notification that nobody dismisses.
pub const AUTO_DISMISS_AFTER: Duration = Duration::from_millis(5000);

const UNEXPECTED_ERROR: &str = "An unexpected error occurred";

/// Cloneable handle to one shared, ordered collection of notifications.
///
/// Clones observe and mutate the same entries. Expiry timers run on the ambient tokio
/// runtime; dropping the last handle aborts the timers still pending.
#[derive(Clone)]
pub struct NotificationQueue {
    inner: Arc<QueueInner>,
}

struct QueueInner {
    next_id: AtomicU64,
    entries: Mutex<Vec<Entry>>,
    changes: watch::Sender<Vec<Notification>>,
}

struct Entry {
    notification: Notification,
    expiry: Option<JoinHandle<()>>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        let (changes, _) = watch::channel(Vec::new());
        Self {
            inner: Arc::new(QueueInner {
                next_id: AtomicU64::new(1),
                entries: Mutex::new(Vec::new()),
                changes,
            }),
        }
    }

    /// Appends a notification and schedules its removal after [`AUTO_DISMISS_AFTER`].
    pub fn notify(&self, message: impl Into<String>, kind: NotificationKind) -> NotificationId {
        let id = NotificationId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let notification = Notification {
            id,
            message: message.into(),
            kind,
        };

        let mut entries = self.inner.lock();
        let expiry = self.schedule_expiry(id);
        entries.push(Entry {
            notification,
            expiry,
        });
        self.inner.publish(&entries);

        id
    }

    /// Shorthand for [`notify`](Self::notify) with [`NotificationKind::Error`].
    pub fn error(&self, message: impl Into<String>) -> NotificationId {
        self.notify(message, NotificationKind::Error)
    }

    /// Posts an error that escaped every other handler, falling back to a generic
    /// message when the error renders as blank text.
    pub fn report_unexpected(&self, err: &dyn std::error::Error) -> NotificationId {
        let message = err.to_string();
        if message.trim().is_empty() {
            self.error(UNEXPECTED_ERROR)
        } else {
            self.error(message)
        }
    }

    /// Removes the entry and cancels its timer. Returns `false` when the id is unknown,
    /// for instance because it already expired.
    pub fn remove(&self, id: NotificationId) -> bool {
        match self.inner.take(id) {
            Some(entry) => {
                if let Some(expiry) = entry.expiry {
                    expiry.abort();
                }
                true
            }
            None => false,
        }
    }

    /// Current entries in insertion order.
    pub fn snapshot(&self) -> Vec<Notification> {
        self.inner
            .lock()
            .iter()
            .map(|entry| entry.notification.clone())
            .collect()
    }

    /// Receiver that observes the full collection after every change.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Notification>> {
        self.inner.changes.subscribe()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn schedule_expiry(&self, id: NotificationId) -> Option<JoinHandle<()>> {
        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                warn!(%id, "no tokio runtime available, notification will not auto-dismiss");
                return None;
            }
        };

        let inner = Arc::downgrade(&self.inner);
        Some(runtime.spawn(async move {
            tokio::time::sleep(AUTO_DISMISS_AFTER).await;
            if let Some(inner) = inner.upgrade() {
                // The handle inside the taken entry points at this task; dropping it detaches.
                if inner.take(id).is_some() {
                    debug!(%id, "notification expired");
                }
            }
        }))
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NotificationQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationQueue")
            .field("pending", &self.len())
            .finish_non_exhaustive()
    }
}

impl FailureSink for NotificationQueue {
    fn on_request_failure(&self, message: &str) {
        self.error(message);
    }
}

impl QueueInner {
    fn lock(&self) -> MutexGuard<'_, Vec<Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn take(&self, id: NotificationId) -> Option<Entry> {
        let mut entries = self.lock();
        let position = entries
            .iter()
            .position(|entry| entry.notification.id == id)?;
        let entry = entries.remove(position);
        self.publish(&entries);
        Some(entry)
    }

    fn publish(&self, entries: &[Entry]) {
        self.changes.send_replace(
            entries
                .iter()
                .map(|entry| entry.notification.clone())
                .collect(),
        );
    }
}

impl Drop for QueueInner {
    fn drop(&mut self) {
        let entries = self
            .entries
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        for entry in entries.drain(..) {
            if let Some(expiry) = entry.expiry {
                expiry.abort();
            }
        }
    }
}
