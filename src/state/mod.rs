//! Shared state threaded through every step of a run.
//!
//! A [`State`] is created fresh for each run and handed to one step
//! handler at a time. It carries:
//!
//! - the read-only [`RunConfig`]
//! - a [`StepLog`] sink
//! - the append-only admin command and download [`Accumulator`]s
//! - free-form values steps leave for later steps

pub mod accumulator;
pub mod log;

pub use accumulator::{Accumulator, AccumulatorKind, Download, Validate};
pub use log::{LogEntry, LogLevel, StepLog};

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

use crate::config::RunConfig;
use crate::error::Result;

/// The mutable record passed to each step handler.
#[derive(Debug)]
pub struct State {
    config: RunConfig,
    log: StepLog,
    admin_commands: Accumulator<String>,
    downloads: Accumulator<Download>,
    values: BTreeMap<String, serde_json::Value>,
    started_at: DateTime<Utc>,
}

impl Default for State {
    fn default() -> Self {
        Self::new(RunConfig::default())
    }
}

impl State {
    /// Create the initial state for a run.
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            log: StepLog::new(),
            admin_commands: Accumulator::new(AccumulatorKind::AdminCommands),
            downloads: Accumulator::new(AccumulatorKind::Downloads),
            values: BTreeMap::new(),
            started_at: Utc::now(),
        }
    }

    /// Run configuration.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// When this state was created.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Log sink for the running step.
    pub fn log(&mut self) -> &mut StepLog {
        &mut self.log
    }

    /// Everything logged so far.
    pub fn log_entries(&self) -> &[LogEntry] {
        self.log.entries()
    }

    /// Queue a command for the elevated batch.
    pub fn queue_admin_command(&mut self, command: impl Into<String>) -> Result<()> {
        self.admin_commands.push(command.into())
    }

    /// Queue a file for the download batch.
    pub fn queue_download(&mut self, download: Download) -> Result<()> {
        self.downloads.push(download)
    }

    pub fn admin_commands(&self) -> &Accumulator<String> {
        &self.admin_commands
    }

    pub fn downloads(&self) -> &Accumulator<Download> {
        &self.downloads
    }

    /// Join every queued admin command into one script for a single
    /// elevated session. The script stops at the first failing command.
    ///
    /// Returns `None` when nothing was queued.
    pub fn admin_script(&self) -> Result<Option<String>> {
        self.admin_commands.validate()?;
        if self.admin_commands.is_empty() {
            return Ok(None);
        }
        let script = self
            .admin_commands
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" && ");
        Ok(Some(script))
    }

    /// Store a value for later steps, replacing any previous value.
    pub fn set_value(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Read a value left by an earlier step.
    pub fn value(&self, key: &str) -> Option<&serde_json::Value> {
        self.values.get(key)
    }

    /// Read a value and deserialize it, `None` if absent or of another shape.
    pub fn value_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.values
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}
