/*!
 * Scope Guards
 *
 * One guard type parameterized by storage and exit policy
 */

use super::action::{BorrowedAction, ExitAction, OwnedAction};
use super::policy::{Always, ExitKind, ExitPolicy, OnFailure, OnSuccess};
use super::traits::Guard;
use super::GuardResult;
use std::fmt;
use std::marker::PhantomData;

/// Guard that runs an exit action when it goes out of scope
///
/// # Type Parameters
///
/// - `A`: action storage, [`OwnedAction`] or [`BorrowedAction`]
/// - `P`: exit policy, [`Always`], [`OnFailure`] or [`OnSuccess`]
///
/// The action runs at most once per guard chain. Guards are not `Clone`
/// and cannot be reassigned into. A plain Rust move hands the pending action
/// to the new binding and the old one can no longer be observed. Use
/// [`ScopeGuard::transfer`] when the source is only reachable through `&mut`.
///
/// # Panics in the action
///
/// A panic raised by the action propagates out of `drop`. If the guard is
/// dropped during unwinding, which is exactly when a [`FailGuard`] fires,
/// a second panic aborts the process. Actions run by fail guards should
/// not panic.
///
/// # Example
///
/// ```
/// use scope_exit::core::guard::{make_exit_guard, make_fail_guard};
/// use std::cell::Cell;
///
/// let closed = Cell::new(false);
/// let rolled_back = Cell::new(false);
/// {
///     let _close = make_exit_guard(|| closed.set(true));
///     let _rollback = make_fail_guard(|| rolled_back.set(true));
/// }
/// assert!(closed.get());
/// assert!(!rolled_back.get());
/// ```
#[must_use = "a guard dropped immediately runs (or suppresses) its action right away"]
pub struct ScopeGuard<A: ExitAction, P: ExitPolicy = Always> {
    action: A,
    baseline: P::Baseline,
    _policy: PhantomData<fn() -> P>,
}

/// Owning guard that always runs
pub type ExitGuard<F> = ScopeGuard<OwnedAction<F>, Always>;

/// Owning guard that runs only on abnormal exit
///
/// A fail guard built inside a destructor that runs during unwinding does
/// not fire for a nested panic raised in that destructor. See
/// [`super::UnwindBaseline`].
pub type FailGuard<F> = ScopeGuard<OwnedAction<F>, OnFailure>;

/// Owning guard that runs only on normal exit
pub type SuccessGuard<F> = ScopeGuard<OwnedAction<F>, OnSuccess>;

/// Reference-bound guard that always runs
pub type ExitGuardRef<'a, F> = ScopeGuard<BorrowedAction<'a, F>, Always>;

/// Reference-bound guard that runs only on abnormal exit
pub type FailGuardRef<'a, F> = ScopeGuard<BorrowedAction<'a, F>, OnFailure>;

/// Reference-bound guard that runs only on normal exit
pub type SuccessGuardRef<'a, F> = ScopeGuard<BorrowedAction<'a, F>, OnSuccess>;

impl<A: ExitAction, P: ExitPolicy> ScopeGuard<A, P> {
    #[inline]
    fn with_action(action: A) -> Self {
        Self {
            action,
            baseline: P::capture(),
            _policy: PhantomData,
        }
    }

    /// Cancel the pending action
    ///
    /// Idempotent and irreversible for this guard.
    #[inline]
    pub fn release(&mut self) {
        self.action.disarm();
    }

    /// Whether the action is still pending
    #[inline]
    pub fn is_armed(&self) -> bool {
        self.action.is_armed()
    }

    /// Resource type name of this guard's policy
    #[inline]
    pub fn name(&self) -> &'static str {
        P::NAME
    }

    /// Settle the guard with an explicit scope outcome
    ///
    /// `Ok` counts as a normal exit and `Err` as an abnormal one, regardless
    /// of the unwind state. The guard fires or suppresses its action
    /// accordingly and the outcome is passed through.
    ///
    /// ```
    /// use scope_exit::core::guard::make_fail_guard;
    /// use std::cell::Cell;
    ///
    /// let rolled_back = Cell::new(false);
    /// let guard = make_fail_guard(|| rolled_back.set(true));
    /// let outcome: Result<(), &str> = Err("write failed");
    /// assert!(guard.settle(outcome).is_err());
    /// assert!(rolled_back.get());
    /// ```
    pub fn settle<T, E>(mut self, outcome: Result<T, E>) -> Result<T, E> {
        let exit = ExitKind::of(&outcome);
        self.finish(exit);
        outcome
    }

    fn finish(&mut self, exit: ExitKind) {
        if !self.action.is_armed() {
            return;
        }

        if P::fires_on(exit) {
            tracing::trace!(guard = P::NAME, exit = %exit, "running exit action");
            self.action.fire();
        } else {
            tracing::trace!(guard = P::NAME, exit = %exit, "suppressing exit action");
            self.action.disarm();
        }
    }
}

impl<F: FnMut(), P: ExitPolicy> ScopeGuard<OwnedAction<F>, P> {
    /// Create a guard that owns `action`
    #[inline]
    pub fn new(action: F) -> Self {
        Self::with_action(OwnedAction::new(action))
    }

    /// Create a guard owning a clone of `source`
    ///
    /// If the clone panics, `source` runs once and the panic resumes.
    pub fn cloned_from(source: &F) -> Self
    where
        F: Clone + Fn(),
    {
        Self::with_action(OwnedAction::cloned_from(source))
    }

    /// Create a guard owning a clone of `source`, reporting a panicking clone
    ///
    /// `source` has already run once when this returns `Err`.
    pub fn try_cloned(source: &F) -> GuardResult<Self>
    where
        F: Clone + Fn(),
    {
        OwnedAction::try_cloned(source).map(Self::with_action)
    }

    /// Create a guard whose action is produced from `source` by `build`
    ///
    /// If `build` fails, `source` runs once and the error is returned.
    pub fn try_from_source<S, B, E>(source: S, build: B) -> Result<Self, E>
    where
        S: FnOnce(),
        B: FnOnce(&S) -> Result<F, E>,
    {
        OwnedAction::try_from_source(source, build).map(Self::with_action)
    }

    /// Move the pending action into a new guard by copying it
    ///
    /// This guard is disarmed but keeps its (now inert) action value.
    /// The new guard captures a fresh unwind baseline.
    pub fn transfer(&mut self) -> Self
    where
        F: Clone,
    {
        Self::with_action(self.action.transfer())
    }
}

impl<'a, F: Fn() + ?Sized, P: ExitPolicy> ScopeGuard<BorrowedAction<'a, F>, P> {
    /// Create a guard bound to an externally owned action
    ///
    /// The action is never cloned or moved.
    #[inline]
    pub fn borrowed(action: &'a F) -> Self {
        Self::with_action(BorrowedAction::new(action))
    }

    /// Move the binding into a new guard, leaving this one disarmed
    #[inline]
    pub fn transfer(&mut self) -> Self {
        Self::with_action(self.action.transfer())
    }
}

impl<A: ExitAction, P: ExitPolicy> Guard for ScopeGuard<A, P> {
    fn resource_type(&self) -> &'static str {
        P::NAME
    }

    fn is_armed(&self) -> bool {
        self.action.is_armed()
    }

    fn release(&mut self) {
        self.action.disarm();
    }
}

impl<A: ExitAction, P: ExitPolicy> Drop for ScopeGuard<A, P> {
    fn drop(&mut self) {
        if self.action.is_armed() {
            let exit = P::exit_kind(&self.baseline);
            self.finish(exit);
        }
    }
}

impl<A: ExitAction + fmt::Debug, P: ExitPolicy> fmt::Debug for ScopeGuard<A, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeGuard")
            .field("policy", &P::NAME)
            .field("action", &self.action)
            .field("baseline", &self.baseline)
            .finish()
    }
}
