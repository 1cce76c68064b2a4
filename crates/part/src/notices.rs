//! Short-lived messages for the host to draw over the scene.
//!
//! Times are host seconds; the queue never reads a clock itself.

use serde::{Deserialize, Serialize};

/// How long a notice stays up unless told otherwise.
pub const DEFAULT_NOTICE_SECONDS: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Info,
    Success,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub text: String,
    pub severity: Severity,
    pub hide_at: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Notices {
    queue: Vec<Notice>,
}

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_for(&mut self, text: impl Into<String>, severity: Severity, now: f64, seconds: f64) {
        self.queue.push(Notice {
            text: text.into(),
            severity,
            hide_at: now + seconds,
        });
    }

    pub fn push(&mut self, text: impl Into<String>, severity: Severity, now: f64) {
        self.push_for(text, severity, now, DEFAULT_NOTICE_SECONDS);
    }

    pub fn error(&mut self, text: impl Into<String>, now: f64) {
        self.push(text, Severity::Error, now);
    }

    pub fn info(&mut self, text: impl Into<String>, now: f64) {
        self.push(text, Severity::Info, now);
    }

    pub fn success(&mut self, text: impl Into<String>, now: f64) {
        self.push(text, Severity::Success, now);
    }

    /// Drop every notice whose time is up.
    pub fn prune(&mut self, now: f64) {
        self.queue.retain(|n| now < n.hide_at);
    }

    /// Prune, then return what is left in arrival order.
    pub fn visible(&mut self, now: f64) -> &[Notice] {
        self.prune(now);
        &self.queue
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn last(&self) -> Option<&Notice> {
        self.queue.last()
    }
}
