/*!
 * Scope Guards
 *
 * Bind an exit action to the lifetime of a lexical scope.
 *
 * ## Design Principles
 *
 * 1. **At Most Once**: An action runs at most once per guard chain, across moves
 * 2. **Policy As Type**: When to run is a type parameter, not a runtime flag
 * 3. **Owned Or Borrowed**: Guards own their action or bind to one by address
 * 4. **No Lost Cleanup**: A guard that fails to build runs the action itself
 * 5. **Zero-Cost**: An owning guard over a stateless action is one flag wide
 *
 * ## Guard Types
 *
 * - **ExitGuard**: Runs on every exit
 * - **FailGuard**: Runs only when the scope exits abnormally
 * - **SuccessGuard**: Runs only when the scope exits normally
 * - **GuardStack**: Runtime-sized set of guards, fired in LIFO order
 * - **ObservableGuard**: Any guard plus lifecycle tracing
 *
 * ## Example
 *
 * ```rust
 * use scope_exit::core::guard::{make_exit_guard, make_success_guard};
 * use std::cell::RefCell;
 *
 * let log = RefCell::new(Vec::new());
 * {
 *     let _unlock = make_exit_guard(|| log.borrow_mut().push("unlock"));
 *     let _commit = make_success_guard(|| log.borrow_mut().push("commit"));
 * }
 * // Reverse construction order
 * assert_eq!(*log.borrow(), ["commit", "unlock"]);
 * ```
 */

mod action;
mod factory;
mod macros;
mod observe;
mod policy;
mod scope;
mod stack;
mod traits;

pub use action::{BorrowedAction, ExitAction, OwnedAction};
pub use factory::{
    make_exit_guard, make_exit_guard_cloned, make_exit_guard_ref, make_fail_guard,
    make_fail_guard_cloned, make_fail_guard_ref, make_guard, make_guard_cloned, make_guard_ref,
    make_success_guard, make_success_guard_cloned, make_success_guard_ref,
};
pub use observe::{GuardMetadata, ObservableGuard};
pub use policy::{Always, ExitKind, ExitPolicy, OnFailure, OnSuccess, UnwindBaseline};
pub use scope::{
    ExitGuard, ExitGuardRef, FailGuard, FailGuardRef, ScopeGuard, SuccessGuard, SuccessGuardRef,
};
pub use stack::GuardStack;
pub use traits::Guard;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::any::Any;
use thiserror::Error;

/// Result type for guard operations
pub type GuardResult<T> = Result<T, GuardError>;

/// Errors that can occur during guard operations
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum GuardError {
    #[error("Guard already released")]
    #[diagnostic(
        code(guard::already_released),
        help("The action was cancelled or has already run. Check is_armed() first.")
    )]
    AlreadyReleased,

    #[error("Guard construction failed: {0}")]
    #[diagnostic(
        code(guard::construction_failed),
        help("Copying the exit action panicked. The source action was run in its place.")
    )]
    ConstructionFailed(String),
}

/// Best-effort text of a panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
