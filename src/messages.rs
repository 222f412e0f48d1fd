use crate::models::{Message, Severity};
use std::time::{Duration, Instant};

pub const DEFAULT_MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Holds at most one banner message. A newer message replaces the older one,
/// and a message stops being shown once its timeout has passed.
#[derive(Debug)]
pub struct MessageSlot {
    timeout: Duration,
    current: Option<(Message, Instant)>,
}

impl MessageSlot {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            current: None,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn show(&mut self, text: impl Into<String>, severity: Severity) {
        self.show_at(text, severity, Instant::now());
    }

    pub fn show_at(&mut self, text: impl Into<String>, severity: Severity, now: Instant) {
        let message = Message {
            text: text.into(),
            severity,
        };
        self.current = Some((message, now));
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.show(text, Severity::Success);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.show(text, Severity::Error);
    }

    pub fn current(&self) -> Option<&Message> {
        self.current_at(Instant::now())
    }

    pub fn current_at(&self, now: Instant) -> Option<&Message> {
        self.current
            .as_ref()
            .filter(|(_, shown)| now.saturating_duration_since(*shown) < self.timeout)
            .map(|(message, _)| message)
    }

    /// Hand the live message to a page render, clearing the slot.
    pub fn take(&mut self) -> Option<Message> {
        let live = self.current().cloned();
        self.current = None;
        live
    }
}

impl Default for MessageSlot {
    fn default() -> Self {
        Self::new(DEFAULT_MESSAGE_TIMEOUT)
    }
}
