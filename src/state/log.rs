//! Log sink carried in the shared state.

use std::fmt;

/// Severity of a [`LogEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
        };
        write!(f, "{}", s)
    }
}

/// One line written by a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Step that was running, if any.
    pub step: Option<String>,
    pub level: LogLevel,
    pub message: String,
}

/// Records step output and forwards it to `tracing`.
#[derive(Debug, Default)]
pub struct StepLog {
    current: Option<String>,
    entries: Vec<LogEntry>,
}

impl StepLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn debug(&mut self, message: impl Into<String>) {
        self.write(LogLevel::Debug, message.into());
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.write(LogLevel::Info, message.into());
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.write(LogLevel::Warn, message.into());
    }

    /// All entries in write order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Attribute following entries to `step` (or to no step).
    pub(crate) fn set_current(&mut self, step: Option<&str>) {
        self.current = step.map(str::to_string);
    }

    fn write(&mut self, level: LogLevel, message: String) {
        let step = self.current.as_deref().unwrap_or("-");
        match level {
            LogLevel::Debug => tracing::debug!(step, "{}", message),
            LogLevel::Info => tracing::info!(step, "{}", message),
            LogLevel::Warn => tracing::warn!(step, "{}", message),
        }
        self.entries.push(LogEntry {
            step: self.current.clone(),
            level,
            message,
        });
    }
}
