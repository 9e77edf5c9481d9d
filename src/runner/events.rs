//! Progress notifications emitted during a run.
//!
//! Events are delivered synchronously, on the scheduler's thread, in the
//! order the run produces them:
//!
//! ```text
//! PreStep(a) PostStep(a) PreStep(b) PostStep(b) ... End
//! PreStep(a) PostStep(a) PreStep(b) Error(b)                 (b failed)
//! ```

use std::fmt;
use std::time::Duration;

use crate::error::ProvisionError;
use crate::platform::HandlerKey;
use crate::state::State;
use crate::steps::StepDefinition;

/// What happened to a step that completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The handler for this key ran and succeeded.
    Executed(HandlerKey),
    /// No handler applies on this platform; the step counts as done.
    NoHandler,
    /// Dry run: the handler for this key (if any) would have run.
    DryRun(Option<HandlerKey>),
}

impl StepOutcome {
    /// Check if a handler was actually invoked.
    pub fn ran_handler(&self) -> bool {
        matches!(self, StepOutcome::Executed(_))
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::Executed(key) => write!(f, "ran {} handler", key),
            StepOutcome::NoHandler => f.write_str("no handler for this platform"),
            StepOutcome::DryRun(Some(key)) => write!(f, "would run {} handler", key),
            StepOutcome::DryRun(None) => f.write_str("would skip (no handler)"),
        }
    }
}

/// Progress events emitted during a run.
#[derive(Debug)]
pub enum Event<'a> {
    /// A step is about to start.
    PreStep {
        step: &'a StepDefinition,
        index: usize,
        total: usize,
    },
    /// A step finished successfully.
    PostStep {
        step: &'a StepDefinition,
        duration: Duration,
        outcome: StepOutcome,
    },
    /// A step failed; the run stops here.
    Error {
        error: &'a ProvisionError,
        step: &'a StepDefinition,
    },
    /// Every step completed.
    End { state: &'a State },
}

/// Payload-free discriminant of an [`Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    PreStep,
    PostStep,
    Error,
    End,
}

impl Event<'_> {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::PreStep { .. } => EventKind::PreStep,
            Event::PostStep { .. } => EventKind::PostStep,
            Event::Error { .. } => EventKind::Error,
            Event::End { .. } => EventKind::End,
        }
    }

    /// Name of the step this event is about.
    pub fn step_name(&self) -> Option<&str> {
        match self {
            Event::PreStep { step, .. }
            | Event::PostStep { step, .. }
            | Event::Error { step, .. } => Some(step.name()),
            Event::End { .. } => None,
        }
    }
}

type Subscriber<'a> = Box<dyn FnMut(&Event<'_>) + 'a>;

/// Fans events out to subscribers, in subscription order.
#[derive(Default)]
pub struct Notifier<'a> {
    subscribers: Vec<Subscriber<'a>>,
}

impl<'a> Notifier<'a> {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    /// Register a subscriber.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&Event<'_>) + 'a) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Log the event and deliver it to every subscriber.
    pub fn notify(&mut self, event: &Event<'_>) {
        log_event(event);
        for subscriber in &mut self.subscribers {
            subscriber(event);
        }
    }
}

impl fmt::Debug for Notifier<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

fn log_event(event: &Event<'_>) {
    match event {
        Event::PreStep { step, index, total } => {
            tracing::info!("[{}/{}] {}", index + 1, total, step.name());
        }
        Event::PostStep {
            step,
            duration,
            outcome,
        } => {
            tracing::debug!(
                "Step '{}' finished in {}ms ({})",
                step.name(),
                duration.as_millis(),
                outcome
            );
        }
        Event::Error { error, step } => {
            tracing::warn!("Step '{}' errored: {}", step.name(), error);
        }
        Event::End { state } => {
            tracing::info!(
                "Provisioning complete: {} admin commands, {} downloads queued",
                state.admin_commands().len(),
                state.downloads().len()
            );
        }
    }
}
