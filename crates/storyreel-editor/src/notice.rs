//! Transient user-facing notices.

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoticeId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: NoticeId,
    pub level: NoticeLevel,
    pub message: String,
    /// Editor clock time after which the notice disappears.
    pub expires_at: f64,
}

/// Notices ordered oldest first. Time is the editor clock in seconds.
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    notices: Vec<Notice>,
    ttl: f64,
    next_id: u64,
}

impl NoticeBoard {
    pub fn new(ttl: f64) -> Self {
        Self {
            notices: Vec::new(),
            ttl,
            next_id: 0,
        }
    }

    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>, now: f64) -> NoticeId {
        self.next_id += 1;
        let id = NoticeId(self.next_id);
        let message = message.into();
        debug!(?level, %message, "Notice posted");
        self.notices.push(Notice {
            id,
            level,
            message,
            expires_at: now + self.ttl,
        });
        id
    }

    /// Drop notices whose time is up.
    pub fn expire(&mut self, now: f64) {
        self.notices.retain(|n| n.expires_at > now);
    }

    pub fn dismiss(&mut self, id: NoticeId) {
        self.notices.retain(|n| n.id != id);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.notices.last()
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(6.0)
    }
}
