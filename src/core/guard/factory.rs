/*!
 * Guard Factories
 *
 * Infer the stored action type from the argument and build the guard
 */

use super::action::{BorrowedAction, OwnedAction};
use super::policy::{ExitPolicy, OnFailure, OnSuccess};
use super::scope::{
    ExitGuard, ExitGuardRef, FailGuard, FailGuardRef, ScopeGuard, SuccessGuard, SuccessGuardRef,
};

/// Build an owning guard for any policy
#[inline]
pub fn make_guard<P: ExitPolicy, F: FnMut()>(action: F) -> ScopeGuard<OwnedAction<F>, P> {
    ScopeGuard::new(action)
}

/// Build a reference-bound guard for any policy
#[inline]
pub fn make_guard_ref<P: ExitPolicy, F: Fn() + ?Sized>(
    action: &F,
) -> ScopeGuard<BorrowedAction<'_, F>, P> {
    ScopeGuard::borrowed(action)
}

/// Build an owning guard over a clone of `source` for any policy
///
/// If the clone panics, `source` runs once and the panic resumes.
#[inline]
pub fn make_guard_cloned<P: ExitPolicy, F: Clone + Fn()>(
    source: &F,
) -> ScopeGuard<OwnedAction<F>, P> {
    ScopeGuard::cloned_from(source)
}

/// Run `action` whenever the current scope exits
///
/// Takes the action by value. To keep `action` and guard a copy of it,
/// use [`make_exit_guard_cloned`], which still runs the action if the
/// copy panics.

#[inline]
pub fn make_exit_guard<F: FnMut()>(action: F) -> ExitGuard<F> {
    ScopeGuard::new(action)
}

/// Run `action` only if the current scope exits by unwinding
#[inline]
pub fn make_fail_guard<F: FnMut()>(action: F) -> FailGuard<F> {
    make_guard::<OnFailure, F>(action)
}

/// Run `action` only if the current scope exits normally
#[inline]
pub fn make_success_guard<F: FnMut()>(action: F) -> SuccessGuard<F> {
    make_guard::<OnSuccess, F>(action)
}

/// Run a clone of `source` whenever the current scope exits
#[inline]
pub fn make_exit_guard_cloned<F: Clone + Fn()>(source: &F) -> ExitGuard<F> {
    ScopeGuard::cloned_from(source)
}

/// Run a clone of `source` only if the current scope exits by unwinding
#[inline]
pub fn make_fail_guard_cloned<F: Clone + Fn()>(source: &F) -> FailGuard<F> {
    make_guard_cloned::<OnFailure, F>(source)
}

/// Run a clone of `source` only if the current scope exits normally
#[inline]
pub fn make_success_guard_cloned<F: Clone + Fn()>(source: &F) -> SuccessGuard<F> {
    make_guard_cloned::<OnSuccess, F>(source)
}

#[inline]
pub fn make_exit_guard_ref<F: Fn() + ?Sized>(action: &F) -> ExitGuardRef<'_, F> {
    ScopeGuard::borrowed(action)
}

#[inline]
pub fn make_fail_guard_ref<F: Fn() + ?Sized>(action: &F) -> FailGuardRef<'_, F> {
    make_guard_ref::<OnFailure, F>(action)
}

#[inline]
pub fn make_success_guard_ref<F: Fn() + ?Sized>(action: &F) -> SuccessGuardRef<'_, F> {
    make_guard_ref::<OnSuccess, F>(action)
}
