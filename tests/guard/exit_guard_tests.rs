/*!
 * Exit Guard Tests
 */

use pretty_assertions::assert_eq;
use scope_exit::core::guard::*;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

thread_local! {
    static COUNT: Cell<i32> = const { Cell::new(0) };
}

fn count() -> i32 {
    COUNT.with(Cell::get)
}

fn set_count(value: i32) {
    COUNT.with(|c| c.set(value));
}

fn decrement() {
    COUNT.with(|c| c.set(c.get() - 1));
}

/// Distinguishable payload raised by a failing clone
#[derive(Debug, PartialEq, Eq)]
struct CloneFailed(i32);

struct PanicOnClone;

impl Clone for PanicOnClone {
    fn clone(&self) -> Self {
        panic::panic_any(CloneFailed(42))
    }
}

/// Move-only capture: neither Clone nor Copy
struct Handle(u32);

#[test]
fn test_move_only_action_runs_once() {
    set_count(1);
    {
        let handle = Handle(7);
        let _guard: ExitGuard<_> = ScopeGuard::new(move || {
            assert_eq!(handle.0, 7);
            decrement();
        });
    }
    assert_eq!(count(), 0);
}

#[test]
fn test_stateless_guard_sizes() {
    let owned = make_exit_guard(|| decrement());
    let action = || decrement();
    let borrowed = make_exit_guard_ref(&action);

    assert_eq!(std::mem::size_of_val(&owned), std::mem::size_of::<bool>());
    assert_eq!(std::mem::size_of_val(&borrowed), std::mem::size_of::<usize>());

    set_count(2);
    drop(owned);
    drop(borrowed);
    assert_eq!(count(), 0);
}

#[test]
fn test_copyable_actions_each_run_once() {
    set_count(5);
    {
        let f = || decrement();
        let _guard1: ExitGuard<_> = ScopeGuard::new(f);
        let _guard2 = make_exit_guard_ref(&f);
        let _guard3: ExitGuard<_> = ScopeGuard::cloned_from(&f);
        let _guard4 = make_exit_guard(f);
        let _guard5 = make_exit_guard_cloned(&f);
    }
    assert_eq!(count(), 0);
}

#[test]
fn test_panicking_clone_runs_source_then_propagates() {
    set_count(1);
    let token = PanicOnClone;
    let f = move || {
        let _ = &token;
        decrement();
    };

    let caught = panic::catch_unwind(AssertUnwindSafe(|| {
        let _guard: ExitGuard<_> = ScopeGuard::cloned_from(&f);
        panic!("guard construction must not succeed");
    }));

    let payload = caught.expect_err("clone panic must propagate");
    assert_eq!(payload.downcast_ref::<CloneFailed>(), Some(&CloneFailed(42)));
    assert_eq!(count(), 0);
}

#[test]
fn test_panicking_clone_in_fail_and_success_guards() {
    set_count(2);
    let token = PanicOnClone;
    let f = move || {
        let _ = &token;
        decrement();
    };

    let fail = panic::catch_unwind(AssertUnwindSafe(|| {
        let _guard: FailGuard<_> = ScopeGuard::cloned_from(&f);
    }));
    let success = panic::catch_unwind(AssertUnwindSafe(|| {
        let _guard: SuccessGuard<_> = ScopeGuard::cloned_from(&f);
    }));

    assert!(fail.is_err());
    assert!(success.is_err());
    assert_eq!(count(), 0);
}

#[test]
fn test_try_cloned_reports_error_after_running_source() {
    set_count(1);
    let token = PanicOnClone;
    let f = move || {
        let _ = &token;
        decrement();
    };

    let result = ExitGuard::try_cloned(&f);

    match result {
        Err(GuardError::ConstructionFailed(reason)) => {
            assert_eq!(reason, "non-string panic payload");
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
    assert_eq!(count(), 0);
}

#[test]
fn test_try_from_source() {
    let ran = Cell::new(0);
    let source = || ran.set(ran.get() + 1);

    let refused: Result<ExitGuard<fn()>, String> =
        ScopeGuard::try_from_source(source, |_| Err("no slot".to_string()));
    assert_eq!(refused.err(), Some("no slot".to_string()));
    assert_eq!(ran.get(), 1);

    let built: Result<ExitGuard<_>, String> =
        ScopeGuard::try_from_source(source, |_| Ok(|| ran.set(ran.get() + 10)));
    assert_eq!(ran.get(), 1);
    drop(built);
    assert_eq!(ran.get(), 11);
}

#[test]
fn test_release_before_scope_end() {
    set_count(1);
    {
        let mut guard = make_exit_guard(|| decrement());
        guard.release();
    }
    assert_eq!(count(), 1);
}

#[test]
fn test_moved_guard_runs_once() {
    let counter = Rc::new(Cell::new(0));
    let make = |counter: Rc<Cell<i32>>| make_exit_guard(move || counter.set(counter.get() + 1));

    let guard = make(counter.clone());
    let moved = guard;
    let boxed = Box::new(moved);
    let stashed = vec![boxed];
    drop(stashed);

    assert_eq!(counter.get(), 1);
}

#[test]
fn test_transfer_copies_and_disarms_source() {
    let counter = Rc::new(Cell::new(0));
    let c = counter.clone();
    let mut source = make_exit_guard(move || c.set(c.get() + 1));

    let target = source.transfer();
    assert!(!source.is_armed());
    assert!(target.is_armed());

    drop(target);
    assert_eq!(counter.get(), 1);
    drop(source);
    assert_eq!(counter.get(), 1);
}

#[test]
fn test_nested_guards_fire_in_reverse_order() {
    let log = RefCell::new(Vec::new());
    {
        let _a = make_exit_guard(|| log.borrow_mut().push("a"));
        let _b = make_exit_guard(|| log.borrow_mut().push("b"));
        {
            let _inner = make_exit_guard(|| log.borrow_mut().push("inner"));
        }
        let _c = make_exit_guard(|| log.borrow_mut().push("c"));
    }
    assert_eq!(*log.borrow(), vec!["inner", "c", "b", "a"]);
}

#[test]
fn test_exit_guard_fires_on_early_return_and_break() {
    let count = Cell::new(0);

    let early = |bail: bool| -> Option<()> {
        let _guard = make_exit_guard(|| count.set(count.get() + 1));
        if bail {
            return None;
        }
        Some(())
    };
    assert_eq!(early(true), None);
    assert_eq!(early(false), Some(()));

    for i in 0..3 {
        let _guard = make_exit_guard(|| count.set(count.get() + 1));
        if i == 1 {
            break;
        }
    }

    assert_eq!(count.get(), 4);
}

#[test]
fn test_exit_guard_fires_while_unwinding() {
    let count = Cell::new(0);
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let _guard = make_exit_guard(|| count.set(count.get() + 1));
        panic!("unwind");
    }));
    assert!(result.is_err());
    assert_eq!(count.get(), 1);
}

#[test]
fn test_panicking_action_propagates_on_normal_exit() {
    let result = panic::catch_unwind(|| {
        let _guard = make_exit_guard(|| panic::panic_any(CloneFailed(7)));
    });
    let payload = result.expect_err("action panic must propagate");
    assert_eq!(payload.downcast_ref::<CloneFailed>(), Some(&CloneFailed(7)));
}
