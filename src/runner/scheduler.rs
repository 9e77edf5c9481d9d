//! Sequential step execution.

use std::time::{Duration, Instant};

use crate::error::{ProvisionError, Result};
use crate::platform::Platform;
use crate::state::State;
use crate::steps::StepRegistry;

use super::events::{Event, Notifier, StepOutcome};
use super::plan::{Plan, PlanEntry};

/// Where a [`Scheduler`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Resolving,
    Running,
    Succeeded,
    Failed,
}

impl RunPhase {
    /// Check if this is a terminal state (no more changes expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunPhase::Succeeded | RunPhase::Failed)
    }
}

/// Record of one completed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub name: String,
    pub outcome: StepOutcome,
    pub duration: Duration,
}

impl StepRecord {
    /// Generate a summary line for display.
    pub fn summary_line(&self) -> String {
        match self.outcome {
            StepOutcome::Executed(_) => {
                format!("✓ {} ({})", self.name, format_duration(self.duration))
            }
            StepOutcome::NoHandler => format!("⊘ {} (not needed on this platform)", self.name),
            StepOutcome::DryRun(_) => format!("○ {} ({})", self.name, self.outcome),
        }
    }
}

/// Result of a successful run.
#[derive(Debug)]
pub struct RunReport {
    /// The state after the last step.
    pub state: State,
    /// Every step, in execution order.
    pub steps: Vec<StepRecord>,
    /// Total duration.
    pub duration: Duration,
}

impl RunReport {
    /// Names of steps whose handler actually ran.
    pub fn executed(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter(|r| r.outcome.ran_handler())
            .map(|r| r.name.as_str())
            .collect()
    }
}

/// Runs the steps of a registry in dependency order.
///
/// # Example
///
/// ```
/// use rigup::runner::Scheduler;
/// use rigup::state::State;
/// use rigup::steps::{StepDefinition, StepRegistry};
///
/// let mut registry = StepRegistry::new();
/// registry
///     .add(StepDefinition::new("detect").on_all(|state| {
///         state.set_value("os_version", "14.2");
///         Ok(())
///     }))
///     .unwrap();
///
/// let mut scheduler = Scheduler::new(&registry);
/// let report = scheduler.run(State::default()).unwrap();
/// assert_eq!(report.state.value_as::<String>("os_version").as_deref(), Some("14.2"));
/// ```
#[derive(Debug)]
pub struct Scheduler<'a> {
    registry: &'a StepRegistry,
    notifier: Notifier<'a>,
    phase: RunPhase,
}

impl<'a> Scheduler<'a> {
    /// Create a scheduler for the given registry.
    pub fn new(registry: &'a StepRegistry) -> Self {
        Self {
            registry,
            notifier: Notifier::new(),
            phase: RunPhase::Idle,
        }
    }

    /// Register a progress subscriber.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&Event<'_>) + 'a) -> &mut Self {
        self.notifier.subscribe(subscriber);
        self
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Compute the execution order without running anything.
    pub fn resolve_order(&self) -> Result<Vec<String>> {
        self.registry.resolve_order()
    }

    /// Describe what a run would do on `platform`, without side effects.
    pub fn plan(&self, platform: Option<Platform>) -> Result<Plan> {
        let order = self.registry.resolve_order()?;
        let entries = order
            .iter()
            .filter_map(|name| self.registry.get(name))
            .map(|step| PlanEntry {
                name: step.name().to_string(),
                description: step.description().to_string(),
                dependencies: self.registry.effective_dependencies(step),
                handler: step.dispatch(platform).map(|(key, _)| key),
            })
            .collect();
        Ok(Plan { platform, entries })
    }

    /// Run every step in order, threading `state` through them.
    ///
    /// Stops at the first failing step: later steps never start and work
    /// already done is not rolled back.
    ///
    /// # Errors
    ///
    /// - Resolution errors, before any event is emitted
    /// - `Execution` naming the step whose handler failed
    pub fn run(&mut self, mut state: State) -> Result<RunReport> {
        let start = Instant::now();

        self.phase = RunPhase::Resolving;
        let order = match self.registry.resolve_order() {
            Ok(order) => order,
            Err(e) => {
                tracing::warn!("Could not resolve step order: {}", e);
                self.phase = RunPhase::Failed;
                return Err(e);
            }
        };

        let platform = state.config().effective_platform();
        let dry_run = state.config().dry_run;
        tracing::debug!(
            "Running {} steps (platform: {}, dry run: {})",
            order.len(),
            platform.map_or("unknown", |p| p.as_str()),
            dry_run
        );

        self.phase = RunPhase::Running;
        let total = order.len();
        let mut records = Vec::with_capacity(total);

        for (index, name) in order.iter().enumerate() {
            let Some(step) = self.registry.get(name) else {
                // The order is computed from this registry.
                continue;
            };

            self.notifier.notify(&Event::PreStep { step, index, total });

            state.log().set_current(Some(step.name()));
            let step_start = Instant::now();
            let handler = step.dispatch(platform);

            let result = match (handler, dry_run) {
                (_, true) => Ok(StepOutcome::DryRun(handler.map(|(key, _)| key))),
                (None, false) => Ok(StepOutcome::NoHandler),
                (Some((key, run)), false) => run(&mut state)
                    .map(|()| StepOutcome::Executed(key))
                    .map_err(|source| ProvisionError::Execution {
                        step: step.name().to_string(),
                        description: step.description().to_string(),
                        source,
                    }),
            };
            state.log().set_current(None);

            match result {
                Ok(outcome) => {
                    let duration = step_start.elapsed();
                    self.notifier.notify(&Event::PostStep {
                        step,
                        duration,
                        outcome,
                    });
                    records.push(StepRecord {
                        name: step.name().to_string(),
                        outcome,
                        duration,
                    });
                }
                Err(error) => {
                    self.phase = RunPhase::Failed;
                    self.notifier.notify(&Event::Error {
                        error: &error,
                        step,
                    });
                    return Err(error);
                }
            }
        }

        self.phase = RunPhase::Succeeded;
        self.notifier.notify(&Event::End { state: &state });

        Ok(RunReport {
            state,
            steps: records,
            duration: start.elapsed(),
        })
    }
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs == 0 {
        format!("{}ms", millis)
    } else if secs < 60 {
        format!("{}.{}s", secs, millis / 100)
    } else {
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{}m {}s", mins, secs)
    }
}
