//! Step registry for a single provisioning run.

use std::collections::HashMap;

use crate::error::{ProvisionError, Result};
use crate::runner::dependency::DependencyGraph;
use crate::steps::definition::StepDefinition;

/// The set of steps one run will execute.
///
/// Many independent call sites contribute steps to the same registry
/// before the run starts. Registries are plain values, so several can
/// coexist in one process.
///
/// # Example
///
/// ```
/// use rigup::steps::{StepDefinition, StepRegistry};
///
/// let mut registry = StepRegistry::new();
/// registry.add(StepDefinition::new("detect-os").on_all(|_| Ok(()))).unwrap();
/// registry
///     .add(StepDefinition::new("hosts").depends_on("detect-os").on_all(|_| Ok(())))
///     .unwrap();
///
/// assert_eq!(registry.resolve_order().unwrap(), vec!["detect-os", "hosts"]);
/// ```
#[derive(Debug, Default)]
pub struct StepRegistry {
    steps: Vec<StepDefinition>,
    index: HashMap<String, usize>,
}

impl StepRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and register a step.
    ///
    /// # Errors
    ///
    /// Returns `Registration` naming the offending field when the name is
    /// empty or already taken, a dependency name is empty, the step has no
    /// handler, or a barrier step produces the accumulator it waits on.
    pub fn add(&mut self, step: StepDefinition) -> Result<()> {
        let invalid = |field: &'static str, message: String| ProvisionError::Registration {
            step: step.name().to_string(),
            field,
            message,
        };

        if step.name().trim().is_empty() {
            return Err(invalid("name", "must not be empty".to_string()));
        }
        if self.index.contains_key(step.name()) {
            return Err(invalid("name", "is already registered".to_string()));
        }
        if let Some(position) = step.dependencies().iter().position(|d| d.trim().is_empty()) {
            return Err(invalid(
                "dependencies",
                format!("entry {} is an empty step name", position),
            ));
        }
        if step.handlers().is_empty() {
            return Err(invalid(
                "handlers",
                "must define a handler for `all` or at least one platform".to_string(),
            ));
        }
        if let Some(kind) = step.barrier_for() {
            if step.is_producer_of(kind) {
                return Err(invalid(
                    "barrier",
                    format!("cannot wait on {} while producing them", kind),
                ));
            }
        }

        tracing::debug!("Registered step '{}'", step.name());
        self.index.insert(step.name().to_string(), self.steps.len());
        self.steps.push(step);
        Ok(())
    }

    /// All steps in registration order.
    pub fn list(&self) -> &[StepDefinition] {
        &self.steps
    }

    /// Number of registered steps.
    pub fn count(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Look up a step by name.
    pub fn get(&self, name: &str) -> Option<&StepDefinition> {
        self.index.get(name).map(|&i| &self.steps[i])
    }

    /// Check if a step is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Dependencies the resolver will use for `step`.
    ///
    /// Declared dependencies first, then, for a barrier step, every other
    /// registered producer of its accumulator in registration order.
    pub fn effective_dependencies(&self, step: &StepDefinition) -> Vec<String> {
        let mut deps: Vec<String> = step.dependencies().to_vec();
        if let Some(kind) = step.barrier_for() {
            for producer in &self.steps {
                if producer.name() != step.name()
                    && producer.is_producer_of(kind)
                    && !deps.iter().any(|d| d == producer.name())
                {
                    deps.push(producer.name().to_string());
                }
            }
        }
        deps
    }

    /// Build the dependency graph of the registered steps.
    pub fn graph(&self) -> DependencyGraph {
        let mut builder = DependencyGraph::builder();
        for step in &self.steps {
            builder = builder.add_step(step.name(), self.effective_dependencies(step));
        }
        builder.build()
    }

    /// Compute the execution order without running anything.
    pub fn resolve_order(&self) -> Result<Vec<String>> {
        self.graph().topological_order()
    }
}
