/*!
 * Scope Exit Library
 * Scope guards that run an action when control leaves a scope
 */

pub mod core;
pub mod monitoring;

// Re-exports
pub use crate::core::guard::{
    make_exit_guard, make_exit_guard_cloned, make_exit_guard_ref, make_fail_guard,
    make_fail_guard_cloned, make_fail_guard_ref, make_guard, make_guard_cloned, make_guard_ref,
    make_success_guard, make_success_guard_cloned, make_success_guard_ref, Always, ExitGuard, ExitGuardRef,
    ExitKind, ExitPolicy, FailGuard, FailGuardRef, Guard, GuardError, GuardResult, GuardStack,
    ObservableGuard, OnFailure, OnSuccess, ScopeGuard, SuccessGuard, SuccessGuardRef,
};
pub use monitoring::init_tracing;
