/*!
 * Guard Integration Tests
 *
 * Real-world scenarios combining multiple guard types
 */

use miette::Diagnostic;
use pretty_assertions::assert_eq;
use scope_exit::core::guard::*;
use scope_exit::monitoring::{init_tracing_with, span_scope, TracingConfig};
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};

fn init_test_tracing() {
    init_tracing_with(TracingConfig {
        default_filter: "trace".to_string(),
        json: false,
    });
}

/// Opens `n` resources, failing at `fail_at`, with per-resource cleanup
fn open_all(n: usize, fail_at: Option<usize>, log: &RefCell<Vec<String>>) -> Result<(), String> {
    let mut stack = GuardStack::new();

    for id in 0..n {
        if Some(id) == fail_at {
            return Err(format!("open {} failed", id));
        }
        log.borrow_mut().push(format!("open {}", id));
        stack.push(make_exit_guard(move || log.borrow_mut().push(format!("close {}", id))));
    }

    stack.release_all();
    Ok(())
}

#[test]
fn test_guard_stack_unwinds_partial_setup() {
    init_test_tracing();
    let log = RefCell::new(Vec::new());

    assert_eq!(open_all(4, Some(3), &log), Err("open 3 failed".to_string()));
    assert_eq!(
        *log.borrow(),
        vec!["open 0", "open 1", "open 2", "close 2", "close 1", "close 0"]
    );

    log.borrow_mut().clear();
    assert_eq!(open_all(2, None, &log), Ok(()));
    assert_eq!(*log.borrow(), vec!["open 0", "open 1"]);
}

#[test]
fn test_mixed_guards_in_stack_during_panic() {
    init_test_tracing();
    let log = RefCell::new(Vec::new());

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let _stack = GuardStack::new()
            .add(make_exit_guard(|| log.borrow_mut().push("unlock")))
            .add(ObservableGuard::wrap(
                make_fail_guard(|| log.borrow_mut().push("rollback")),
                "rollback",
            ))
            .add(make_success_guard(|| log.borrow_mut().push("commit")));
        panic!("write failed");
    }));

    assert!(result.is_err());
    assert_eq!(*log.borrow(), vec!["rollback", "unlock"]);
}

#[test]
fn test_observable_guard_inside_span() {
    init_test_tracing();
    let log = RefCell::new(Vec::new());
    {
        let span = span_scope("flush");
        let _entered = span.enter();
        let guard = ObservableGuard::wrap(make_exit_guard(|| log.borrow_mut().push("flush")), "flush");
        assert_eq!(guard.metadata().resource_type, "scope_exit");
        assert_eq!(guard.metadata().label, Some("flush"));
    }
    assert_eq!(*log.borrow(), vec!["flush"]);
}

#[test]
fn test_nested_stacks_release_independently() {
    let log = RefCell::new(Vec::new());
    {
        let mut outer = GuardStack::new();
        outer.push(make_exit_guard(|| log.borrow_mut().push("outer")));

        let mut inner = GuardStack::new();
        inner.push(make_exit_guard(|| log.borrow_mut().push("inner")));
        inner.release_all();

        outer.push(inner);
        assert_eq!(outer.guard_types(), vec!["scope_exit", "guard_stack"]);
        assert_eq!(outer.armed_count(), 1);
    }
    assert_eq!(*log.borrow(), vec!["outer"]);
}

#[test]
fn test_guard_error_serialization() {
    let err = GuardError::ConstructionFailed("clone refused".to_string());
    let json = serde_json::to_string(&err).unwrap();
    assert_eq!(
        json,
        r#"{"error_type":"construction_failed","details":"clone refused"}"#
    );

    let back: GuardError = serde_json::from_str(&json).unwrap();
    assert_eq!(back, err);

    let released = serde_json::to_string(&GuardError::AlreadyReleased).unwrap();
    assert_eq!(released, r#"{"error_type":"already_released"}"#);
}

#[test]
fn test_guard_error_diagnostics() {
    let err = GuardError::AlreadyReleased;
    let code = err.code().map(|c| c.to_string());
    assert_eq!(code.as_deref(), Some("guard::already_released"));
    assert!(err.help().is_some());
}

#[test]
fn test_exit_kind_serialization() {
    assert_eq!(serde_json::to_string(&ExitKind::Abnormal).unwrap(), r#""abnormal""#);
    assert_eq!(ExitKind::Normal.to_string(), "normal");
}
