use std::time::Duration;

use crate::error::AtmError;

/// How long transient messages stay visible before the driver dismisses
/// them. Dismissal is best-effort and carried as data; the engine never
/// sleeps.
pub const MESSAGE_TTL: Duration = Duration::from_secs(3);
/// Extended duration for the post-operation balance confirmation.
pub const CONFIRM_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Error,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    pub ttl: Duration,
}

impl Notice {
    pub fn success(text: impl Into<String>, ttl: Duration) -> Self {
        Notice {
            kind: NoticeKind::Success,
            text: text.into(),
            ttl,
        }
    }

    pub fn error(error: &AtmError, ttl: Duration) -> Self {
        Notice {
            kind: NoticeKind::Error,
            text: error.to_string(),
            ttl,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoticeDelays {
    pub message: Duration,
    pub confirm: Duration,
}

impl Default for NoticeDelays {
    fn default() -> Self {
        NoticeDelays {
            message: MESSAGE_TTL,
            confirm: CONFIRM_TTL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_notices_render_the_catalog_text() {
        let notice = Notice::error(&AtmError::IncorrectPin, MESSAGE_TTL);
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.text, "05. The current PIN is incorrect.");
        assert_eq!(notice.ttl, Duration::from_secs(3));
    }

    #[test]
    fn default_delays() {
        let delays = NoticeDelays::default();
        assert_eq!(delays.message, Duration::from_secs(3));
        assert_eq!(delays.confirm, Duration::from_secs(4));
    }
}
