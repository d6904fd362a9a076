//! Notifications

use std::{cell::RefCell, fmt, rc::Rc};

use tracing::info;

/// A user-facing message emitted after a cart change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A product was added (or its quantity bumped).
    Added {
        /// Product display name
        name: String,
    },

    /// A product's line was removed.
    Removed {
        /// Product display name
        name: String,
    },

    /// The cart was emptied.
    Cleared,
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::Added { name } => write!(f, "{name} added to cart"),
            Notification::Removed { name } => write!(f, "{name} removed from cart"),
            Notification::Cleared => f.write_str("Cart cleared"),
        }
    }
}

/// Receives cart notifications, typically to show a toast.
pub trait Notifier {
    /// Deliver a notification.
    fn notify(&self, notification: &Notification);
}

/// Notifier that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _notification: &Notification) {}
}

/// Notifier that logs each message at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: &Notification) {
        info!(target: "satchel::notifications", "{notification}");
    }
}

/// Notifier that keeps every notification in memory.
///
/// Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    received: Rc<RefCell<Vec<Notification>>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything received so far, oldest first.
    pub fn received(&self) -> Vec<Notification> {
        self.received.borrow().clone()
    }

    /// Rendered messages received so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.received
            .borrow()
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        self.received.borrow_mut().push(notification.clone());
    }
}
