//! Step definitions and the registry that collects them.
//!
//! - [`StepDefinition`] - A named step with dependencies and per-platform handlers
//! - [`Handler`] - The body of a step
//! - [`StepRegistry`] - The validated set of steps for one run

pub mod definition;
pub mod registry;

pub use definition::{Handler, StepDefinition};
pub use registry::StepRegistry;
