//! Library integration tests.

use rigup::{ErrorKind, ProvisionError};

#[test]
fn error_types_are_public() {
    let err = ProvisionError::MissingDependency {
        step: "A".into(),
        dependency: "ghost".into(),
    };
    assert!(err.to_string().contains("ghost"));
    assert_eq!(err.kind(), ErrorKind::Resolution);
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> rigup::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn validation_error_propagates_through_anyhow() {
    fn queue_empty(state: &mut rigup::state::State) -> anyhow::Result<()> {
        state.queue_admin_command("")?;
        Ok(())
    }

    let mut state = rigup::state::State::default();
    let err = queue_empty(&mut state).unwrap_err();
    let inner = err.downcast_ref::<ProvisionError>().unwrap();
    assert_eq!(inner.kind(), ErrorKind::Validation);
}
