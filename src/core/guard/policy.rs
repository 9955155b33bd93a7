/*!
 * Exit Policies
 *
 * Type-level selection of when a guard's action runs
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// How control left the guarded scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitKind {
    /// Return, break, or an `Ok` outcome
    Normal,
    /// Unwinding from a panic that started after the guard was built, or an `Err` outcome
    Abnormal,
}

impl ExitKind {
    /// Classify an explicit scope outcome
    #[inline]
    pub fn of<T, E>(outcome: &Result<T, E>) -> Self {
        if outcome.is_ok() {
            ExitKind::Normal
        } else {
            ExitKind::Abnormal
        }
    }
}

impl fmt::Display for ExitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitKind::Normal => f.write_str("normal"),
            ExitKind::Abnormal => f.write_str("abnormal"),
        }
    }
}

/// Unwind state captured when a conditional guard is built
///
/// Fixed at construction. An exit is abnormal only if a panic began
/// after this snapshot, so a guard built inside a destructor that is
/// already running during unwinding treats that same unwind as normal.
///
/// # Limitations
///
/// Only a panicking flag is available, not a count of panics in flight.
/// A guard built while the thread is already unwinding cannot tell a
/// second panic (raised and caught inside that destructor) from the outer
/// one: its exit is classified as normal, so a fail guard stays silent and
/// a success guard runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnwindBaseline {
    panicking: bool,
}

impl UnwindBaseline {
    #[inline]
    pub fn capture() -> Self {
        Self {
            panicking: std::thread::panicking(),
        }
    }

    /// Whether the thread was already unwinding at capture time
    #[inline]
    pub fn was_panicking(&self) -> bool {
        self.panicking
    }

    /// Classify the current exit against this baseline
    #[inline]
    pub fn exit_kind(&self) -> ExitKind {
        if std::thread::panicking() && !self.panicking {
            ExitKind::Abnormal
        } else {
            ExitKind::Normal
        }
    }
}

/// Exit policy marker trait
///
/// Selects the destruction-time predicate of a [`super::ScopeGuard`].
pub trait ExitPolicy {
    /// State captured at construction, `()` when the policy needs none
    type Baseline: Copy + fmt::Debug;

    /// Resource type name for logging/debugging
    const NAME: &'static str;

    fn capture() -> Self::Baseline;

    /// Classify the current exit against the captured baseline
    fn exit_kind(baseline: &Self::Baseline) -> ExitKind;

    /// Whether the action runs for this kind of exit
    fn fires_on(exit: ExitKind) -> bool;
}

/// Run on every exit
#[derive(Debug, Clone, Copy, Default)]
pub struct Always;

impl ExitPolicy for Always {
    type Baseline = ();

    const NAME: &'static str = "scope_exit";

    #[inline]
    fn capture() {}

    #[inline]
    fn exit_kind(_: &()) -> ExitKind {
        if std::thread::panicking() {
            ExitKind::Abnormal
        } else {
            ExitKind::Normal
        }
    }

    #[inline]
    fn fires_on(_: ExitKind) -> bool {
        true
    }
}

/// Run only when the scope exits abnormally
#[derive(Debug, Clone, Copy, Default)]
pub struct OnFailure;

impl ExitPolicy for OnFailure {
    type Baseline = UnwindBaseline;

    const NAME: &'static str = "scope_fail";

    #[inline]
    fn capture() -> UnwindBaseline {
        UnwindBaseline::capture()
    }

    #[inline]
    fn exit_kind(baseline: &UnwindBaseline) -> ExitKind {
        baseline.exit_kind()
    }

    #[inline]
    fn fires_on(exit: ExitKind) -> bool {
        exit == ExitKind::Abnormal
    }
}

/// Run only when the scope exits normally
#[derive(Debug, Clone, Copy, Default)]
pub struct OnSuccess;

impl ExitPolicy for OnSuccess {
    type Baseline = UnwindBaseline;

    const NAME: &'static str = "scope_success";

    #[inline]
    fn capture() -> UnwindBaseline {
        UnwindBaseline::capture()
    }

    #[inline]
    fn exit_kind(baseline: &UnwindBaseline) -> ExitKind {
        baseline.exit_kind()
    }

    #[inline]
    fn fires_on(exit: ExitKind) -> bool {
        exit == ExitKind::Normal
    }
}
