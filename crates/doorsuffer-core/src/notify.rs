//! Notification collaborator.
//!
//! Every user-visible signal the engine produces goes through the
//! [`Notifier`] trait as a single human-readable message; the engine never
//! consumes a return value. A GUI host typically installs a
//! [`BufferedNotifier`] and drains it on its own cadence.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// Fire-and-forget notification sink.
pub trait Notifier {
    fn notify(&self, message: &str, severity: Severity);
}

/// A queued notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
}

/// Queues notices for a host to poll and drain.
#[derive(Debug, Clone, Default)]
pub struct BufferedNotifier(Rc<RefCell<VecDeque<Notice>>>);

impl BufferedNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return all queued notices, oldest first.
    pub fn drain(&self) -> Vec<Notice> {
        self.0.borrow_mut().drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

impl Notifier for BufferedNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        self.0.borrow_mut().push_back(Notice {
            message: message.to_string(),
            severity,
        });
    }
}

/// Discards all notifications. For headless hosts and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _message: &str, _severity: Severity) {}
}
