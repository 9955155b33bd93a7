/*!
 * Exit Action Storage
 *
 * Owning and reference-bound storage for the callable a guard runs at scope exit
 */

use super::{panic_message, GuardError, GuardResult};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// Storage for a single pending exit action
///
/// Implementations guarantee the action is invoked at most once: `fire`
/// disarms before invoking, and a disarmed slot never invokes again.
pub trait ExitAction {
    /// Whether the action is still pending
    fn is_armed(&self) -> bool;

    /// Permanently cancel the pending action without invoking it
    fn disarm(&mut self);

    /// Invoke the action if armed
    ///
    /// Returns `true` if the action ran.
    fn fire(&mut self) -> bool;
}

/// Exit action held by value, plus an armed flag
pub struct OwnedAction<F: FnMut()> {
    action: F,
    armed: bool,
}

impl<F: FnMut()> OwnedAction<F> {
    /// Take ownership of an action value
    ///
    /// Moving a value in cannot fail, so no cleanup path is needed.
    #[inline]
    pub fn new(action: F) -> Self {
        Self {
            action,
            armed: true,
        }
    }

    /// Build the stored action by cloning `source`
    ///
    /// If the clone panics, `source` is invoked once and the original panic
    /// resumes. No storage ever existed to run it later.
    pub fn cloned_from(source: &F) -> Self
    where
        F: Clone + Fn(),
    {
        match panic::catch_unwind(AssertUnwindSafe(|| source.clone())) {
            Ok(action) => Self::new(action),
            Err(payload) => {
                tracing::warn!(
                    reason = %panic_message(payload.as_ref()),
                    "exit action clone panicked, running source action before unwinding"
                );
                source();
                panic::resume_unwind(payload)
            }
        }
    }

    /// Like [`OwnedAction::cloned_from`], but reports a panicking clone as an error
    ///
    /// `source` has already run once when `Err` is returned.
    pub fn try_cloned(source: &F) -> GuardResult<Self>
    where
        F: Clone + Fn(),
    {
        match panic::catch_unwind(AssertUnwindSafe(|| source.clone())) {
            Ok(action) => Ok(Self::new(action)),
            Err(payload) => {
                let reason = panic_message(payload.as_ref());
                tracing::warn!(reason = %reason, "exit action clone failed, ran source action");
                source();
                Err(GuardError::ConstructionFailed(reason))
            }
        }
    }

    /// Build the stored action from `source` through a fallible conversion
    ///
    /// On `Err` the source action runs once before the error is returned.
    pub fn try_from_source<S, B, E>(source: S, build: B) -> Result<Self, E>
    where
        S: FnOnce(),
        B: FnOnce(&S) -> Result<F, E>,
    {
        match build(&source) {
            Ok(action) => Ok(Self::new(action)),
            Err(e) => {
                tracing::warn!("exit action conversion failed, ran source action");
                source();
                Err(e)
            }
        }
    }

    /// Copy the action into new storage and disarm this one
    ///
    /// The stored value stays intact here, but only the returned storage
    /// is armed. A panicking clone leaves this storage untouched.
    pub(crate) fn transfer(&mut self) -> Self
    where
        F: Clone,
    {
        let armed = self.armed;
        let action = self.action.clone();
        self.armed = false;
        Self { action, armed }
    }
}

impl<F: FnMut()> ExitAction for OwnedAction<F> {
    #[inline]
    fn is_armed(&self) -> bool {
        self.armed
    }

    #[inline]
    fn disarm(&mut self) {
        self.armed = false;
    }

    #[inline]
    fn fire(&mut self) -> bool {
        if !self.armed {
            return false;
        }
        self.armed = false;
        (self.action)();
        true
    }
}

impl<F: FnMut()> fmt::Debug for OwnedAction<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnedAction")
            .field("armed", &self.armed)
            .finish_non_exhaustive()
    }
}

/// Non-owning binding to an externally owned action
///
/// A single address. `None` encodes the disarmed state, so no flag is stored.
pub struct BorrowedAction<'a, F: Fn() + ?Sized> {
    action: Option<&'a F>,
}

impl<'a, F: Fn() + ?Sized> BorrowedAction<'a, F> {
    #[inline]
    pub fn new(action: &'a F) -> Self {
        Self {
            action: Some(action),
        }
    }

    /// Move the binding out, leaving this storage null
    #[inline]
    pub(crate) fn transfer(&mut self) -> Self {
        Self {
            action: self.action.take(),
        }
    }
}

impl<F: Fn() + ?Sized> ExitAction for BorrowedAction<'_, F> {
    #[inline]
    fn is_armed(&self) -> bool {
        self.action.is_some()
    }

    #[inline]
    fn disarm(&mut self) {
        self.action = None;
    }

    #[inline]
    fn fire(&mut self) -> bool {
        match self.action.take() {
            Some(action) => {
                action();
                true
            }
            None => false,
        }
    }
}

impl<F: Fn() + ?Sized> fmt::Debug for BorrowedAction<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BorrowedAction")
            .field("armed", &self.action.is_some())
            .finish_non_exhaustive()
    }
}
