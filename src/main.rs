/*!
 * Scope Exit - Demo Driver
 *
 * Walks the guard family through the callable shapes it supports:
 * - Move-only actions
 * - Clonable actions, with and without a panicking clone
 * - Reference-bound actions
 * - Failure and success classification
 */

use anyhow::{ensure, Result};
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use tracing::info;

use scope_exit::core::guard::{
    make_exit_guard, make_exit_guard_ref, make_fail_guard, make_success_guard, ExitGuard,
    ExitGuardRef, ScopeGuard,
};
use scope_exit::monitoring::span_scope;

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

/// Clone always panics with this payload
#[derive(Debug, PartialEq, Eq)]
struct CloneFailed(i32);

struct PanicOnClone;

impl Clone for PanicOnClone {
    fn clone(&self) -> Self {
        panic::panic_any(CloneFailed(42))
    }
}

/// Run `f` with the panic hook silenced, then restore the previous hook
fn with_quiet_panics<R>(f: impl FnOnce() -> R) -> R {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let result = f();
    panic::set_hook(previous);
    result
}

fn move_only_actions() -> Result<()> {
    let scope = span_scope("move_only");
    let _entered = scope.enter();

    set_count(3);
    {
        let token = String::from("move-only capture");
        let _guard1: ExitGuard<_> = ScopeGuard::new(move || {
            let _ = &token;
            decrement();
        });
        let f = || decrement();
        let guard2: ExitGuardRef<'_, _> = ScopeGuard::borrowed(&f);
        ensure!(
            std::mem::size_of_val(&guard2) == std::mem::size_of::<usize>(),
            "reference-bound guard must be one address wide"
        );
        let _guard3 = make_exit_guard(|| decrement());
    }
    ensure!(count() == 0, "expected every action to run once, count = {}", count());
    info!("move-only actions ran once each");
    Ok(())
}

fn cloned_actions() -> Result<()> {
    let scope = span_scope("cloned");
    let _entered = scope.enter();

    set_count(3);
    {
        let f = || decrement();
        let _guard1: ExitGuard<_> = ScopeGuard::cloned_from(&f);
        let _guard2 = make_exit_guard_ref(&f);
        let _guard3 = make_exit_guard(f);
    }
    ensure!(count() == 0, "expected every action to run once, count = {}", count());
    info!("cloned actions ran once each");
    Ok(())
}

fn panicking_clone() -> Result<()> {
    let scope = span_scope("panicking_clone");
    let _entered = scope.enter();

    set_count(2);
    let token = PanicOnClone;
    let f = move || {
        let _ = &token;
        decrement();
    };

    let caught = with_quiet_panics(|| {
        panic::catch_unwind(AssertUnwindSafe(|| {
            let _guard: ExitGuard<_> = ScopeGuard::cloned_from(&f);
            unreachable!("clone must panic");
        }))
    });
    let payload = caught.err().and_then(|p| p.downcast::<CloneFailed>().ok());
    ensure!(
        payload.as_deref() == Some(&CloneFailed(42)),
        "clone panic must propagate unchanged"
    );
    ensure!(count() == 1, "source action must run before unwinding");
    info!("panicking clone ran the source action and propagated");

    let err = match with_quiet_panics(|| ExitGuard::try_cloned(&f)) {
        Ok(_) => anyhow::bail!("clone must fail"),
        Err(e) => e,
    };
    ensure!(count() == 0, "source action must run before the error is returned");
    info!(error = %err, "fallible construction reported the failed clone");
    Ok(())
}

fn conditional_actions() -> Result<()> {
    let scope = span_scope("conditional");
    let _entered = scope.enter();

    let failed = Cell::new(0);
    let succeeded = Cell::new(0);

    {
        let _fail = make_fail_guard(|| failed.set(failed.get() + 1));
        let _success = make_success_guard(|| succeeded.set(succeeded.get() + 1));
    }
    ensure!(failed.get() == 0 && succeeded.get() == 1, "normal exit misclassified");

    let caught = with_quiet_panics(|| {
        panic::catch_unwind(AssertUnwindSafe(|| {
            let _fail = make_fail_guard(|| failed.set(failed.get() + 1));
            let _success = make_success_guard(|| succeeded.set(succeeded.get() + 1));
            panic!("abnormal exit");
        }))
    });
    ensure!(caught.is_err(), "panic must propagate");
    ensure!(failed.get() == 1 && succeeded.get() == 1, "abnormal exit misclassified");

    let outcome: Result<(), &str> = Err("write rejected");
    let settled = make_fail_guard(|| failed.set(failed.get() + 1)).settle(outcome);
    ensure!(settled.is_err() && failed.get() == 2, "Err outcome must fire a fail guard");

    info!(
        failed = failed.get(),
        succeeded = succeeded.get(),
        "conditional guards classified every exit"
    );
    Ok(())
}

fn main() -> Result<()> {
    scope_exit::init_tracing();

    info!("Scope exit demo starting...");
    move_only_actions()?;
    cloned_actions()?;
    panicking_clone()?;
    conditional_actions()?;
    info!("All scenarios passed");
    Ok(())
}
