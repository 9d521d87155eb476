//! User-facing notifications.

use crate::error::AppError;
use chrono::{DateTime, Utc};

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// A mutation went through
    Success,
    /// Nothing went wrong, nothing happened either
    Info,
    /// Something failed
    Error,
}

/// A message shown to the user until dismissed or replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity
    pub level: Level,
    /// Text
    pub message: String,
    /// When it was raised
    pub at: DateTime<Utc>,
}

impl Notification {
    /// Success notification.
    #[must_use]
    pub fn success(message: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
            at,
        }
    }

    /// Informational notification.
    #[must_use]
    pub fn info(message: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            level: Level::Info,
            message: message.into(),
            at,
        }
    }

    /// Error notification; the failure is logged as it is raised.
    #[must_use]
    pub fn error(err: &AppError, at: DateTime<Utc>) -> Self {
        tracing::warn!(kind = ?err.kind(), error = %err, "Operation failed");
        Self {
            level: Level::Error,
            message: err.user_message(),
            at,
        }
    }

    /// Whether this is an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.level == Level::Error
    }
}
