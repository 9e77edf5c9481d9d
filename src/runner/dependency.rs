//! Dependency graph for step execution ordering.

use std::collections::HashMap;

use crate::error::{ProvisionError, Result};

/// Represents the dependency relationships between steps.
///
/// Built fresh for every resolution and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Step names in registration order.
    steps: Vec<String>,
    /// Map of step name to its direct dependencies, in declaration order.
    dependencies: HashMap<String, Vec<String>>,
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    InProgress,
    Done,
}

impl DependencyGraph {
    /// Create a new dependency graph builder.
    pub fn builder() -> DependencyGraphBuilder {
        DependencyGraphBuilder::new()
    }

    /// Get the direct dependencies of a step.
    pub fn dependencies_of(&self, step: &str) -> Option<&[String]> {
        self.dependencies.get(step).map(Vec::as_slice)
    }

    /// Check if a step exists in the graph.
    pub fn contains(&self, step: &str) -> bool {
        self.dependencies.contains_key(step)
    }

    /// All step names, in registration order.
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    /// Get the number of steps in the graph.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns steps in topological order (dependencies before dependents).
    ///
    /// Depth-first over the steps in registration order, emitting each step
    /// once all of its dependencies are emitted. Steps with no ordering
    /// constraint between them keep their registration order.
    ///
    /// # Errors
    ///
    /// - `Cycle` with the full loop, e.g. `a -> b -> c -> a`
    /// - `MissingDependency` naming the declaring step and the unknown name
    pub fn topological_order(&self) -> Result<Vec<String>> {
        self.walk(false)
    }

    /// Find a cycle in the graph, returning the path if one exists.
    ///
    /// Edges to unknown steps are ignored, so a missing dependency elsewhere
    /// does not hide a loop.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        match self.walk(true) {
            Err(ProvisionError::Cycle { cycle }) => Some(cycle),
            _ => None,
        }
    }

    fn walk(&self, skip_missing: bool) -> Result<Vec<String>> {
        let mut marks: HashMap<&str, Mark> = HashMap::with_capacity(self.steps.len());
        let mut order = Vec::with_capacity(self.steps.len());
        // Current DFS path: each step with the index of its next dependency.
        let mut stack: Vec<(&str, usize)> = Vec::new();

        for root in &self.steps {
            if marks.contains_key(root.as_str()) {
                continue;
            }
            marks.insert(root.as_str(), Mark::InProgress);
            stack.push((root.as_str(), 0));

            while let Some(&(node, next)) = stack.last() {
                let deps = self.dependencies_of(node).unwrap_or(&[]);
                let Some(dep) = deps.get(next) else {
                    stack.pop();
                    marks.insert(node, Mark::Done);
                    order.push(node.to_string());
                    continue;
                };
                if let Some(top) = stack.last_mut() {
                    top.1 += 1;
                }

                if !self.contains(dep) {
                    if skip_missing {
                        continue;
                    }
                    return Err(ProvisionError::MissingDependency {
                        step: node.to_string(),
                        dependency: dep.clone(),
                    });
                }

                match marks.get(dep.as_str()) {
                    Some(Mark::Done) => {}
                    Some(Mark::InProgress) => {
                        // `dep` is on the current path: report the loop back to it
                        let start = stack.iter().position(|(s, _)| *s == dep.as_str()).unwrap_or(0);
                        let mut cycle: Vec<String> =
                            stack[start..].iter().map(|(s, _)| s.to_string()).collect();
                        cycle.push(dep.clone());
                        return Err(ProvisionError::Cycle { cycle });
                    }
                    None => {
                        marks.insert(dep.as_str(), Mark::InProgress);
                        stack.push((dep.as_str(), 0));
                    }
                }
            }
        }

        Ok(order)
    }
}

/// Builder for constructing a DependencyGraph.
#[derive(Debug, Default)]
pub struct DependencyGraphBuilder {
    steps: Vec<String>,
    dependencies: HashMap<String, Vec<String>>,
}

impl DependencyGraphBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a step with its dependencies.
    ///
    /// Adding the same step twice extends its dependency list.
    pub fn add_step(mut self, name: impl Into<String>, depends_on: Vec<String>) -> Self {
        let name = name.into();
        if !self.dependencies.contains_key(&name) {
            self.steps.push(name.clone());
        }
        let deps = self.dependencies.entry(name).or_default();
        for dep in depends_on {
            if !deps.contains(&dep) {
                deps.push(dep);
            }
        }
        self
    }

    /// Build the dependency graph.
    ///
    /// Unknown dependencies are reported when the order is computed.
    pub fn build(self) -> DependencyGraph {
        DependencyGraph {
            steps: self.steps,
            dependencies: self.dependencies,
        }
    }
}
