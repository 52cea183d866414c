//! User-facing notices
//!
//! One reporting channel for everything the user should hear about: failed
//! requests, completed actions, partial loads. Subscribers (a status bar, a
//! toast area, the CLI) receive every [`Notice`]; each notice is also logged
//! through `tracing` at the matching level.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use tokio::sync::broadcast;
use uuid::Uuid;

/// How urgent a notice is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single message for the user
#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub id: Uuid,
    pub severity: Severity,
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Broadcasts notices to every subscriber
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: broadcast::Sender<Notice>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(64)
    }
}

impl Notifier {
    /// Create a notifier keeping up to `capacity` undelivered notices per subscriber
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.sender.subscribe()
    }

    /// Publish a notice and log it
    pub fn notify(&self, severity: Severity, message: impl Into<String>) -> Notice {
        let notice = Notice {
            id: Uuid::new_v4(),
            severity,
            message: message.into(),
            at: Utc::now(),
        };

        match severity {
            Severity::Info => tracing::info!(notice_id = %notice.id, "{}", notice.message),
            Severity::Warning => tracing::warn!(notice_id = %notice.id, "{}", notice.message),
            Severity::Error => tracing::error!(notice_id = %notice.id, "{}", notice.message),
        }

        // No subscribers is fine: the log line above is still written
        let _ = self.sender.send(notice.clone());
        notice
    }

    pub fn info(&self, message: impl Into<String>) -> Notice {
        self.notify(Severity::Info, message)
    }

    pub fn warning(&self, message: impl Into<String>) -> Notice {
        self.notify(Severity::Warning, message)
    }

    pub fn error(&self, message: impl Into<String>) -> Notice {
        self.notify(Severity::Error, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_notices_in_order() {
        let notifier = Notifier::default();
        let mut rx = notifier.subscribe();

        notifier.info("Patient saved");
        notifier.error("Could not load staff");

        let first = rx.recv().await.unwrap();
        assert_eq!(first.severity, Severity::Info);
        assert_eq!(first.message, "Patient saved");

        let second = rx.recv().await.unwrap();
        assert_eq!(second.severity, Severity::Error);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_notify_without_subscribers() {
        let notifier = Notifier::new(0);
        let notice = notifier.warning("nobody listening");
        assert_eq!(notice.severity, Severity::Warning);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
        assert_eq!(Severity::Warning.to_string(), "warning");
    }
}
