//! Toasts and the two auto-dismissing banners of the users panel.

use chrono::{DateTime, TimeDelta, Utc};

pub const TOAST_TTL: TimeDelta = TimeDelta::seconds(4);
pub const BANNER_TTL: TimeDelta = TimeDelta::seconds(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub expires_at: DateTime<Utc>,
}

impl Notice {
    fn new(kind: NoticeKind, message: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            kind,
            message: message.into(),
            expires_at,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notices {
    toasts: Vec<Notice>,
    success_banner: Option<Notice>,
    error_banner: Option<Notice>,
}

impl Notices {
    pub fn toast(&mut self, kind: NoticeKind, message: impl Into<String>, now: DateTime<Utc>) {
        self.toasts.push(Notice::new(kind, message, now + TOAST_TTL));
    }

    /// Replaces the current success banner and restarts its timer.
    pub fn success(&mut self, message: impl Into<String>, now: DateTime<Utc>) {
        self.success_banner = Some(Notice::new(NoticeKind::Success, message, now + BANNER_TTL));
    }

    /// Replaces the current error banner and restarts its timer.
    pub fn error(&mut self, message: impl Into<String>, now: DateTime<Utc>) {
        self.error_banner = Some(Notice::new(NoticeKind::Error, message, now + BANNER_TTL));
    }

    /// Drop everything whose deadline passed. Returns whether anything went away.
    pub fn expire(&mut self, now: DateTime<Utc>) -> bool {
        let before = self.len();
        self.toasts.retain(|toast| !toast.is_expired(now));
        if self.success_banner.as_ref().is_some_and(|b| b.is_expired(now)) {
            self.success_banner = None;
        }
        if self.error_banner.as_ref().is_some_and(|b| b.is_expired(now)) {
            self.error_banner = None;
        }
        self.len() != before
    }

    pub fn dismiss_success(&mut self) {
        self.success_banner = None;
    }

    pub fn dismiss_error(&mut self) {
        self.error_banner = None;
    }

    pub fn clear(&mut self) {
        self.toasts.clear();
        self.success_banner = None;
        self.error_banner = None;
    }

    pub fn toasts(&self) -> &[Notice] {
        &self.toasts
    }

    pub fn success_banner(&self) -> Option<&Notice> {
        self.success_banner.as_ref()
    }

    pub fn error_banner(&self) -> Option<&Notice> {
        self.error_banner.as_ref()
    }

    /// Earliest pending deadline, used to schedule the next repaint.
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.toasts
            .iter()
            .chain(self.success_banner.iter())
            .chain(self.error_banner.iter())
            .map(|notice| notice.expires_at)
            .min()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn len(&self) -> usize {
        self.toasts.len()
            + usize::from(self.success_banner.is_some())
            + usize::from(self.error_banner.is_some())
    }
}
