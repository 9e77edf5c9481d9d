//! Dry-run description of a provisioning run.

use std::fmt;

use crate::platform::{HandlerKey, Platform};

/// One resolved step and the handler it would dispatch to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    pub name: String,
    pub description: String,
    /// Effective dependencies, barrier producers included.
    pub dependencies: Vec<String>,
    /// Handler that would run, `None` if the step is skipped on this platform.
    pub handler: Option<HandlerKey>,
}

/// The resolved order of a run, annotated for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub platform: Option<Platform>,
    pub entries: Vec<PlanEntry>,
}

impl Plan {
    /// Step names in execution order.
    pub fn order(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let platform = self.platform.map_or("unknown", |p| p.as_str());
        writeln!(f, "Plan for {} ({} steps):", platform, self.entries.len())?;

        for (index, entry) in self.entries.iter().enumerate() {
            write!(f, "{:>3}. {}", index + 1, entry.name)?;
            if !entry.description.is_empty() {
                write!(f, " - {}", entry.description)?;
            }
            match entry.handler {
                Some(key) => write!(f, " [{}]", key)?,
                None => write!(f, " [skipped]")?,
            }
            if !entry.dependencies.is_empty() {
                write!(f, " (after {})", entry.dependencies.join(", "))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_steps_in_order() {
        let plan = Plan {
            platform: Some(Platform::Darwin),
            entries: vec![
                PlanEntry {
                    name: "detect".into(),
                    description: "Detect OS version".into(),
                    dependencies: vec![],
                    handler: Some(HandlerKey::All),
                },
                PlanEntry {
                    name: "winget".into(),
                    description: String::new(),
                    dependencies: vec!["detect".into()],
                    handler: None,
                },
            ],
        };

        let text = plan.to_string();
        assert!(text.starts_with("Plan for darwin (2 steps):"));
        assert!(text.contains("  1. detect - Detect OS version [all]"));
        assert!(text.contains("  2. winget [skipped] (after detect)"));
        assert_eq!(plan.order(), vec!["detect", "winget"]);
        assert_eq!(plan.len(), 2);
    }

    #[test]
    fn empty_plan_with_unknown_platform() {
        let plan = Plan {
            platform: None,
            entries: vec![],
        };
        assert!(plan.is_empty());
        assert_eq!(plan.to_string(), "Plan for unknown (0 steps):\n");
    }
}
