//! Step execution orchestration.

pub mod dependency;
pub mod events;
pub mod plan;
pub mod scheduler;

pub use dependency::{DependencyGraph, DependencyGraphBuilder};
pub use events::{Event, EventKind, Notifier, StepOutcome};
pub use plan::{Plan, PlanEntry};
pub use scheduler::{RunPhase, RunReport, Scheduler, StepRecord};
