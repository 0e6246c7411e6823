//! Toast/notification sink for user-facing messages.

use parking_lot::Mutex;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    fn info(&self, message: &str) {
        self.notify(Notification {
            level: Level::Info,
            message: message.to_owned(),
        });
    }

    fn success(&self, message: &str) {
        self.notify(Notification {
            level: Level::Success,
            message: message.to_owned(),
        });
    }

    fn error(&self, message: &str) {
        self.notify(Notification {
            level: Level::Error,
            message: message.to_owned(),
        });
    }
}

/// Writes notifications to the log only.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, n: Notification) {
        match n.level {
            Level::Error => tracing::warn!(message = %n.message, "user notification"),
            Level::Info | Level::Success => {
                tracing::info!(message = %n.message, "user notification");
            }
        }
    }
}

/// Collects notifications so a page can render them as toasts.
#[derive(Debug, Default)]
pub struct ToastBuffer {
    items: Mutex<Vec<Notification>>,
}

impl ToastBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all buffered notifications.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.items.lock())
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<Notification> {
        self.items.lock().clone()
    }
}

impl Notifier for ToastBuffer {
    fn notify(&self, notification: Notification) {
        LogNotifier.notify(notification.clone());
        self.items.lock().push(notification);
    }
}
