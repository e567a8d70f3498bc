use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

pub type ToastId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
    Warning,
}

/// Transient user-facing message. Toasts live only in memory and are never
/// written to the board file.
#[derive(Debug, Clone)]
pub struct Toast {
    pub id: ToastId,
    pub kind: ToastKind,
    pub title: String,
    pub message: String,

    // None keeps the toast up until it is dismissed by hand.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Toast {
    pub fn new(
        kind: ToastKind,
        title: impl Into<String>,
        message: impl Into<String>,
        ttl: Option<Duration>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            title: title.into(),
            message: message.into(),
            expires_at: ttl.map(|ttl| Utc::now() + ttl),
        }
    }

    pub fn expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|deadline| deadline <= now)
    }
}
