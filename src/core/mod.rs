/*!
 * Core Module
 * Scope guard family and its error types
 */

pub mod guard;

// Re-export for convenience
pub use guard::{
    make_exit_guard, make_exit_guard_cloned, make_exit_guard_ref, make_fail_guard,
    make_fail_guard_cloned, make_fail_guard_ref, make_success_guard, make_success_guard_cloned,
    make_success_guard_ref, ExitGuard, ExitGuardRef, FailGuard, FailGuardRef,
    Guard, GuardError, GuardResult, GuardStack, ObservableGuard, ScopeGuard, SuccessGuard,
    SuccessGuardRef,
};
