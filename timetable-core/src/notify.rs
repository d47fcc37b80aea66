use std::time::Duration;

use chrono::{DateTime, Utc};

/// How long a notification stays on screen.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// Transient on-screen message, the only user-facing feedback channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self::raised_at(kind, message, Utc::now())
    }

    pub fn raised_at(
        kind: NotificationKind,
        message: impl Into<String>,
        raised_at: DateTime<Utc>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            raised_at,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, message)
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.raised_at + chrono::Duration::milliseconds(NOTIFICATION_TTL.as_millis() as i64)
    }

    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.raised_at && now < self.expires_at()
    }
}
