//! rigup - dependency-ordered local machine provisioning.
//!
//! Provisioning is described as a set of named steps. Each step declares
//! the steps it depends on and one handler per platform (or one for all
//! platforms). rigup resolves a deterministic order, then runs the steps
//! one at a time, threading a shared [`State`](state::State) through them.
//!
//! # Modules
//!
//! - [`config`] - Run configuration loading
//! - [`error`] - Error types and result aliases
//! - [`logging`] - Tracing subscriber setup
//! - [`platform`] - Platform tokens and handler dispatch
//! - [`runner`] - Dependency resolution, scheduling and progress events
//! - [`state`] - Shared state and the admin command / download accumulators
//! - [`steps`] - Step definitions and the step registry
//!
//! # Example
//!
//! ```
//! use rigup::runner::Scheduler;
//! use rigup::state::{AccumulatorKind, State};
//! use rigup::steps::{StepDefinition, StepRegistry};
//!
//! let mut registry = StepRegistry::new();
//! registry
//!     .add(
//!         StepDefinition::new("hosts")
//!             .produces(AccumulatorKind::AdminCommands)
//!             .on_all(|state| {
//!                 state.queue_admin_command("echo '127.0.0.1 app.test' >> /etc/hosts")?;
//!                 Ok(())
//!             }),
//!     )
//!     .unwrap();
//! registry
//!     .add(
//!         StepDefinition::new("sudo")
//!             .barrier(AccumulatorKind::AdminCommands)
//!             .on_all(|state| {
//!                 let script = state.admin_script()?;
//!                 state.set_value("sudo_script", script);
//!                 Ok(())
//!             }),
//!     )
//!     .unwrap();
//!
//! let report = Scheduler::new(&registry).run(State::default()).unwrap();
//! assert_eq!(report.executed(), vec!["hosts", "sudo"]);
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod platform;
pub mod runner;
pub mod state;
pub mod steps;

pub use error::{ErrorKind, ProvisionError, Result};
