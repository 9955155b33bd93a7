/*!
 * Guard Macros
 *
 * Anonymous guards over a block
 */

/// Run a block when the current scope exits
///
/// ```
/// use std::cell::Cell;
///
/// let done = Cell::new(false);
/// {
///     scope_exit::on_scope_exit! { done.set(true) }
/// }
/// assert!(done.get());
/// ```
#[macro_export]
macro_rules! on_scope_exit {
    ($($body:tt)*) => {
        let _scope_exit_guard = $crate::core::guard::make_exit_guard(|| { $($body)* });
    };
}

/// Run a block only if the current scope exits by unwinding
#[macro_export]
macro_rules! on_scope_failure {
    ($($body:tt)*) => {
        let _scope_fail_guard = $crate::core::guard::make_fail_guard(|| { $($body)* });
    };
}

/// Run a block only if the current scope exits normally
#[macro_export]
macro_rules! on_scope_success {
    ($($body:tt)*) => {
        let _scope_success_guard = $crate::core::guard::make_success_guard(|| { $($body)* });
    };
}
