//! Operator-facing activity feed.
//!
//! Every notification the console raises (validation failures, create
//! results, refresh failures) goes through an [`ActivityFeed`]. Entries are
//! mirrored to stderr and broadcast to any subscriber, e.g. a UI layer that
//! shows them as alerts.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Capacity of the broadcast channel; slow subscribers lose older entries.
const FEED_CAPACITY: usize = 100;

/// Log level for operator display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single feed entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into() }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Error, message: message.into() }
    }

    /// Errors are the blocking notifications; the rest is informational.
    pub fn is_blocking(&self) -> bool {
        self.level == LogLevel::Error
    }
}

/// Broadcasts entries to all subscribers
#[derive(Debug, Clone)]
pub struct ActivityFeed {
    sender: broadcast::Sender<LogEntry>,
    echo: bool,
}

impl ActivityFeed {
    /// A feed that also prints every entry to stderr.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(FEED_CAPACITY);
        Self { sender, echo: true }
    }

    /// A feed that only broadcasts.
    pub fn quiet() -> Self {
        Self { echo: false, ..Self::new() }
    }

    /// Whether entries are mirrored to stderr.
    pub fn echoes(&self) -> bool {
        self.echo
    }

    /// Publish an entry
    pub fn log(&self, entry: LogEntry) {
        if self.echo {
            let prefix = match entry.level {
                LogLevel::Info => "   ",
                LogLevel::Success => "   ✓",
                LogLevel::Warning => "   ⚠️",
                LogLevel::Error => "   ❌",
            };
            eprintln!("{} {}", prefix, entry.message);
        }

        // No subscribers is fine
        let _ = self.sender.send(entry);
    }

    /// Get a receiver for new entries
    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.sender.subscribe()
    }

    pub fn info(&self, msg: impl Into<String>) {
        self.log(LogEntry::info(msg));
    }

    pub fn success(&self, msg: impl Into<String>) {
        self.log(LogEntry::success(msg));
    }

    pub fn warning(&self, msg: impl Into<String>) {
        self.log(LogEntry::warning(msg));
    }

    pub fn error(&self, msg: impl Into<String>) {
        self.log(LogEntry::error(msg));
    }
}

impl Default for ActivityFeed {
    fn default() -> Self {
        Self::new()
    }
}
