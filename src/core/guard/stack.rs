/*!
 * Guard Stacks
 *
 * A runtime-sized set of guards that fire in reverse order of insertion
 */

use super::traits::Guard;
use std::fmt;

/// Stack of guards released together, last pushed first
///
/// Use when the number of exit actions is only known at runtime. Dropping
/// a plain `Vec` of guards would fire them first-to-last, the opposite of
/// nested scopes.
///
/// # Example
///
/// ```rust
/// use scope_exit::core::guard::{make_exit_guard, GuardStack};
/// use std::cell::RefCell;
///
/// let closed = RefCell::new(Vec::new());
/// {
///     let mut stack = GuardStack::new();
///     for fd in 0..3 {
///         let closed = &closed;
///         stack.push(make_exit_guard(move || closed.borrow_mut().push(fd)));
///     }
/// }
/// assert_eq!(*closed.borrow(), [2, 1, 0]);
/// ```
#[derive(Default)]
pub struct GuardStack<'a> {
    guards: Vec<Box<dyn Guard + 'a>>,
}

impl<'a> GuardStack<'a> {
    /// Create a new empty stack
    pub fn new() -> Self {
        Self { guards: Vec::new() }
    }

    /// Add a guard to the stack, builder style
    pub fn add<G: Guard + 'a>(mut self, guard: G) -> Self {
        self.push(guard);
        self
    }

    /// Push a guard onto the stack
    pub fn push<G: Guard + 'a>(&mut self, guard: G) {
        self.guards.push(Box::new(guard));
    }

    /// Get number of guards in the stack
    pub fn len(&self) -> usize {
        self.guards.len()
    }

    /// Check if stack is empty
    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }

    /// Resource types of the held guards, bottom to top
    pub fn guard_types(&self) -> Vec<&'static str> {
        self.guards.iter().map(|g| g.resource_type()).collect()
    }

    /// Number of guards still armed
    pub fn armed_count(&self) -> usize {
        self.guards.iter().filter(|g| g.is_armed()).count()
    }

    /// Cancel every pending action
    pub fn release_all(&mut self) {
        for guard in self.guards.iter_mut().rev() {
            guard.release();
        }
    }
}

impl Guard for GuardStack<'_> {
    fn resource_type(&self) -> &'static str {
        "guard_stack"
    }

    fn is_armed(&self) -> bool {
        self.guards.iter().any(|g| g.is_armed())
    }

    fn release(&mut self) {
        self.release_all();
    }
}

impl Drop for GuardStack<'_> {
    fn drop(&mut self) {
        if !self.guards.is_empty() {
            tracing::trace!(
                guards = self.guards.len(),
                armed = self.armed_count(),
                "unwinding guard stack"
            );
        }
        // Vec drops front to back and keeps going after a panicking element
        self.guards.reverse();
    }
}

impl fmt::Debug for GuardStack<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuardStack")
            .field("guards", &self.guard_types())
            .field("armed", &self.armed_count())
            .finish()
    }
}
