//! Operator-facing event log: bounded, append-only, severity-tagged.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Severity tag of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Ok,
    Warn,
    Error,
    Info,
}

impl Severity {
    fn level(self) -> log::Level {
        match self {
            Severity::Error => log::Level::Error,
            Severity::Warn => log::Level::Warn,
            Severity::Ok | Severity::Info => log::Level::Info,
        }
    }
}

/// A single human-readable log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub message: String,
    pub severity: Severity,
    /// Simulation time the entry was written (ms).
    pub at_ms: u64,
}

/// Most recent entries, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl EventLog {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, dropping the oldest once full. Mirrored to the
    /// `log` facade.
    pub fn push(&mut self, severity: Severity, message: impl Into<String>, at_ms: u64) {
        let message = message.into();
        log::log!(severity.level(), "[{at_ms} ms] {message}");
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            message,
            severity,
            at_ms,
        });
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether any retained entry contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|e| e.message.contains(needle))
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::with_capacity(80)
    }
}
