//! Operator-visible event log.
//!
//! Append-only between clears. Every appended line is also published to
//! subscribers so a front end can stream the log as it grows.

use std::fmt;

use chrono::{DateTime, Local};
use tokio::sync::broadcast;

/// Capacity of the subscriber channel.
const SUBSCRIBER_CAPACITY: usize = 256;

/// One line of the log.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub at: DateTime<Local>,
    pub text: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.at.format("%H:%M:%S"), self.text)
    }
}

/// The visible log.
#[derive(Debug)]
pub struct EventLog {
    entries: Vec<LogEntry>,
    tx: broadcast::Sender<LogEntry>,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLog {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(SUBSCRIBER_CAPACITY);
        Self {
            entries: Vec::new(),
            tx,
        }
    }

    /// Append a line stamped with the local time.
    pub fn push(&mut self, text: impl Into<String>) {
        let entry = LogEntry {
            at: Local::now(),
            text: text.into(),
        };
        tracing::debug!(line = %entry.text, "log");
        // No subscribers is fine
        let _ = self.tx.send(entry.clone());
        self.entries.push(entry);
    }

    /// Receive every line appended from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.tx.subscribe()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Line texts without timestamps.
    pub fn lines(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.text.as_str()).collect()
    }

    /// Whether any line has exactly this text.
    pub fn contains(&self, text: &str) -> bool {
        self.entries.iter().any(|e| e.text == text)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
