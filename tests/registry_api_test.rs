//! Integration tests for the step registry and order resolution.

use rigup::platform::Platform;
use rigup::steps::{StepDefinition, StepRegistry};
use rigup::ProvisionError;

fn step(name: &str, deps: &[&str]) -> StepDefinition {
    StepDefinition::new(name)
        .depends_on_all(deps.iter().copied())
        .on_all(|_| Ok(()))
}

fn registry_of(steps: Vec<StepDefinition>) -> StepRegistry {
    let mut registry = StepRegistry::new();
    for s in steps {
        registry.add(s).unwrap();
    }
    registry
}

#[test]
fn unconstrained_steps_keep_registration_order() {
    let registry = registry_of(vec![step("C", &[]), step("A", &[]), step("B", &[])]);
    assert_eq!(registry.resolve_order().unwrap(), vec!["C", "A", "B"]);
}

#[test]
fn dependencies_resolve_before_dependents() {
    let registry = registry_of(vec![
        step("testing2", &[]),
        step("testing3", &["testing2"]),
        step("testing", &["testing3", "testing2"]),
    ]);
    assert_eq!(
        registry.resolve_order().unwrap(),
        vec!["testing2", "testing3", "testing"]
    );
}

#[test]
fn two_step_cycle_names_both_steps() {
    let registry = registry_of(vec![step("A", &["B"]), step("B", &["A"])]);

    let err = registry.resolve_order().unwrap_err();
    assert!(err.is_resolution());
    match err {
        ProvisionError::Cycle { cycle } => {
            assert!(cycle.contains(&"A".to_string()));
            assert!(cycle.contains(&"B".to_string()));
            assert_eq!(cycle.first(), cycle.last());
        }
        other => panic!("expected cycle, got {other}"),
    }
}

#[test]
fn missing_dependency_is_reported_at_resolution_not_registration() {
    let mut registry = StepRegistry::new();
    registry.add(step("A", &["ghost"])).unwrap();

    let err = registry.resolve_order().unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("'A'"));
    assert!(msg.contains("'ghost'"));
}

#[test]
fn resolved_order_is_a_valid_permutation() {
    let registry = registry_of(vec![
        step("consumer", &["p2", "p1"]),
        step("p2", &["p1", "detect"]),
        step("p1", &[]),
        step("detect", &[]),
        step("report", &["consumer"]),
    ]);

    let order = registry.resolve_order().unwrap();
    assert_eq!(order.len(), registry.count());
    for s in registry.list() {
        let at = order.iter().position(|n| n == s.name()).unwrap();
        for dep in s.dependencies() {
            let dep_at = order.iter().position(|n| n == dep).unwrap();
            assert!(dep_at < at, "{} must precede {}", dep, s.name());
        }
    }
}

#[test]
fn resolution_is_repeatable() {
    let registry = registry_of(vec![
        step("z", &[]),
        step("y", &["z"]),
        step("x", &[]),
        step("w", &["x", "y"]),
    ]);
    let first = registry.resolve_order().unwrap();
    for _ in 0..10 {
        assert_eq!(registry.resolve_order().unwrap(), first);
    }
}

#[test]
fn step_without_any_handler_is_rejected_at_add() {
    let mut registry = StepRegistry::new();
    let err = registry
        .add(StepDefinition::new("orphan").with_description("Does nothing"))
        .unwrap_err();
    assert!(matches!(
        err,
        ProvisionError::Registration {
            field: "handlers",
            ..
        }
    ));
}

#[test]
fn registries_are_independent() {
    let mut first = StepRegistry::new();
    let mut second = StepRegistry::new();
    first.add(step("shared", &[])).unwrap();
    second.add(step("shared", &[])).unwrap();
    second
        .add(StepDefinition::new("only-mac").on(Platform::Darwin, |_| Ok(())))
        .unwrap();

    assert_eq!(first.count(), 1);
    assert_eq!(second.count(), 2);
}
