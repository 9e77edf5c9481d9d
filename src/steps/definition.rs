//! Step definitions.

use std::fmt;

use crate::platform::{HandlerKey, HandlerTable, Platform};
use crate::state::{AccumulatorKind, State};

/// A step body.
///
/// Handlers receive exclusive access to the shared state for the duration
/// of the call. Any concurrency a handler uses internally must be joined
/// before it returns.
pub type Handler = Box<dyn Fn(&mut State) -> anyhow::Result<()>>;

/// A named unit of provisioning work.
///
/// # Example
///
/// ```
/// use rigup::platform::Platform;
/// use rigup::steps::StepDefinition;
///
/// let step = StepDefinition::new("hosts")
///     .with_description("Point local domains at 127.0.0.1")
///     .depends_on("detect-os")
///     .on(Platform::Win32, |state| {
///         state.queue_admin_command(r"attrib -r C:\Windows\System32\drivers\etc\hosts")?;
///         Ok(())
///     })
///     .on_all(|state| {
///         state.queue_admin_command("chmod 644 /etc/hosts")?;
///         Ok(())
///     });
///
/// assert_eq!(step.name(), "hosts");
/// assert_eq!(step.handlers().len(), 2);
/// ```
pub struct StepDefinition {
    name: String,
    description: String,
    dependencies: Vec<String>,
    handlers: HandlerTable<Handler>,
    produces: Vec<AccumulatorKind>,
    barrier: Option<AccumulatorKind>,
}

impl StepDefinition {
    /// Start a definition with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            dependencies: Vec::new(),
            handlers: HandlerTable::new(),
            produces: Vec::new(),
            barrier: None,
        }
    }

    /// Human-readable description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add one dependency.
    pub fn depends_on(mut self, step: impl Into<String>) -> Self {
        self.dependencies.push(step.into());
        self
    }

    /// Add several dependencies.
    pub fn depends_on_all<I, S>(mut self, steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies.extend(steps.into_iter().map(Into::into));
        self
    }

    /// Set the handler for a platform (or for [`HandlerKey::All`]).
    pub fn on<F>(mut self, key: impl Into<HandlerKey>, handler: F) -> Self
    where
        F: Fn(&mut State) -> anyhow::Result<()> + 'static,
    {
        self.handlers.insert(key.into(), Box::new(handler));
        self
    }

    /// Set the fallback handler used when no platform-specific one exists.
    pub fn on_all<F>(self, handler: F) -> Self
    where
        F: Fn(&mut State) -> anyhow::Result<()> + 'static,
    {
        self.on(HandlerKey::All, handler)
    }

    /// Mark this step as pushing onto the given accumulator.
    pub fn produces(mut self, kind: AccumulatorKind) -> Self {
        if !self.produces.contains(&kind) {
            self.produces.push(kind);
        }
        self
    }

    /// Make this step run after every registered producer of `kind`.
    ///
    /// The producer dependencies are computed when the order is resolved,
    /// in addition to any declared with [`depends_on`](Self::depends_on).
    pub fn barrier(mut self, kind: AccumulatorKind) -> Self {
        self.barrier = Some(kind);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Declared dependencies, in declaration order.
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn handlers(&self) -> &HandlerTable<Handler> {
        &self.handlers
    }

    /// Accumulators this step pushes onto.
    pub fn produced(&self) -> &[AccumulatorKind] {
        &self.produces
    }

    /// Accumulator this step waits on, if it is a barrier.
    pub fn barrier_for(&self) -> Option<AccumulatorKind> {
        self.barrier
    }

    /// Check if this step pushes onto `kind`.
    pub fn is_producer_of(&self, kind: AccumulatorKind) -> bool {
        self.produces.contains(&kind)
    }

    /// Pick the handler for `platform`: exact match, then `all`, then none.
    ///
    /// With no known platform only the `all` handler can match.
    pub fn dispatch(&self, platform: Option<Platform>) -> Option<(HandlerKey, &Handler)> {
        match platform {
            Some(platform) => self.handlers.select(platform),
            None => self.handlers.fallback().map(|h| (HandlerKey::All, h)),
        }
    }
}

impl fmt::Debug for StepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("dependencies", &self.dependencies)
            .field("handlers", &self.handlers.keys())
            .field("produces", &self.produces)
            .field("barrier", &self.barrier)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut State) -> anyhow::Result<()> {
        Ok(())
    }

    #[test]
    fn builder_collects_fields() {
        let step = StepDefinition::new("node")
            .with_description("Install Node.js")
            .depends_on("downloads")
            .depends_on_all(["hosts", "detect-os"])
            .on(Platform::Darwin, noop)
            .produces(AccumulatorKind::Downloads)
            .produces(AccumulatorKind::Downloads);

        assert_eq!(step.name(), "node");
        assert_eq!(step.description(), "Install Node.js");
        assert_eq!(
            step.dependencies(),
            ["downloads", "hosts", "detect-os"]
        );
        assert_eq!(step.produced(), [AccumulatorKind::Downloads]);
        assert!(step.is_producer_of(AccumulatorKind::Downloads));
        assert!(!step.is_producer_of(AccumulatorKind::AdminCommands));
        assert_eq!(step.barrier_for(), None);
    }

    #[test]
    fn dispatch_prefers_exact_platform() {
        let step = StepDefinition::new("shell")
            .on(Platform::Linux, noop)
            .on_all(noop);

        let (key, _) = step.dispatch(Some(Platform::Linux)).unwrap();
        assert_eq!(key, HandlerKey::Only(Platform::Linux));
        let (key, _) = step.dispatch(Some(Platform::Darwin)).unwrap();
        assert_eq!(key, HandlerKey::All);
        let (key, _) = step.dispatch(None).unwrap();
        assert_eq!(key, HandlerKey::All);
    }

    #[test]
    fn dispatch_none_without_match() {
        let step = StepDefinition::new("registry").on(Platform::Win32, noop);
        assert!(step.dispatch(Some(Platform::Darwin)).is_none());
        assert!(step.dispatch(None).is_none());
    }

    #[test]
    fn debug_lists_handler_keys() {
        let step = StepDefinition::new("x").on_all(noop);
        let debug = format!("{:?}", step);
        assert!(debug.contains("All"));
        assert!(debug.contains("\"x\""));
    }
}
