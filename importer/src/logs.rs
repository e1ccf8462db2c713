//! Progress log of an import run.
//!
//! Each pipeline stage ("Reading CSV file", "Checking column names",
//! "Dropping duplicate IDs", ...) reports through the `log_*` helpers. Entries
//! are printed to stdout and also published on [`LOG_BROADCASTER`], where a
//! library caller can [`subscribe`](LogBroadcaster::subscribe) to follow a run.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Entries buffered per subscriber. A run logs one line per stage plus one
/// per CSV column; a slower subscriber sees `Lagged` past this.
pub const RUN_LOG_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Stage started or detail line
    Info,
    /// Stage finished
    Success,
    /// Recoverable problem, e.g. an optional column is absent
    Warning,
}

impl LogLevel {
    fn marker(self) -> &'static str {
        match self {
            LogLevel::Info => "",
            LogLevel::Success => "✓",
            LogLevel::Warning => "⚠️",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Nesting under the previous stage line
    #[serde(default)]
    pub indent: u8,
}

impl LogEntry {
    fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self { level, message: message.into(), indent: 0 }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Warning, message)
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Console form: three spaces per indent level, then the level marker.
    pub fn render(&self) -> String {
        format!(
            "{}   {} {}",
            "   ".repeat(self.indent as usize),
            self.level.marker(),
            self.message
        )
    }
}

/// Run log shared by every pipeline stage.
pub static LOG_BROADCASTER: Lazy<LogBroadcaster> =
    Lazy::new(|| LogBroadcaster::with_capacity(RUN_LOG_CAPACITY));

pub struct LogBroadcaster {
    sender: broadcast::Sender<LogEntry>,
}

impl LogBroadcaster {
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Print an entry and publish it.
    pub fn log(&self, entry: LogEntry) {
        println!("{}", entry.render());

        // Err only means nobody is subscribed
        let _ = self.sender.send(entry);
    }

    /// Receiver for the entries logged from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.sender.subscribe()
    }
}

impl Default for LogBroadcaster {
    fn default() -> Self {
        Self::with_capacity(RUN_LOG_CAPACITY)
    }
}

pub fn log_info(msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::info(msg));
}

pub fn log_success(msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::success(msg));
}

pub fn log_warning(msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::warning(msg));
}

/// Detail line under a stage, e.g. one CSV column or one rename.
pub fn log_info_indent(msg: impl Into<String>, indent: u8) {
    LOG_BROADCASTER.log(LogEntry::info(msg).with_indent(indent));
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::TryRecvError;

    #[test]
    fn test_subscriber_receives_stage_entries() {
        let broadcaster = LogBroadcaster::default();
        let mut rx = broadcaster.subscribe();

        broadcaster.log(LogEntry::info("Checking column names"));
        broadcaster.log(LogEntry::warning("Column 'Scale' not found, skipping"));

        assert_eq!(rx.try_recv().unwrap(), LogEntry::info("Checking column names"));
        assert_eq!(rx.try_recv().unwrap().level, LogLevel::Warning);
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_log_without_subscribers() {
        let broadcaster = LogBroadcaster::default();
        broadcaster.log(LogEntry::success("nobody listening"));
    }

    #[test]
    fn test_slow_subscriber_lags() {
        let broadcaster = LogBroadcaster::with_capacity(2);
        let mut rx = broadcaster.subscribe();
        for i in 0..3 {
            broadcaster.log(LogEntry::info(format!("[{:2}] col", i)));
        }
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Lagged(1))));
    }

    #[test]
    fn test_render() {
        assert_eq!(LogEntry::info("[ 1] ID").with_indent(1).render(), "       [ 1] ID");
        assert_eq!(LogEntry::success("Read 2 rows").render(), "   ✓ Read 2 rows");
    }

    #[test]
    fn test_entry_serializes_lowercase_level() {
        let json = serde_json::to_value(LogEntry::warning("Dropped 1 rows")).unwrap();
        assert_eq!(json["level"], "warning");
        assert_eq!(json["message"], "Dropped 1 rows");
        assert_eq!(json["indent"], 0);
    }
}
