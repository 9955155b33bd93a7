/*!
 * Guard Traits
 *
 * Object-safe view over every guard kind
 */

use super::{GuardError, GuardResult};

/// Core guard trait
///
/// Lets guards of different storage and policy types be held and
/// cancelled uniformly, e.g. inside a [`super::GuardStack`].
pub trait Guard {
    /// Resource type name for logging/debugging
    fn resource_type(&self) -> &'static str;

    /// Check if an action is still pending
    fn is_armed(&self) -> bool;

    /// Cancel the pending action without running it
    ///
    /// Idempotent. Never fails.
    fn release(&mut self);

    /// Cancel the pending action, reporting if there was nothing to cancel
    ///
    /// Returns `Err` if already released
    fn try_release(&mut self) -> GuardResult<()> {
        if !self.is_armed() {
            return Err(GuardError::AlreadyReleased);
        }
        self.release();
        Ok(())
    }
}

impl<G: Guard + ?Sized> Guard for Box<G> {
    fn resource_type(&self) -> &'static str {
        (**self).resource_type()
    }

    fn is_armed(&self) -> bool {
        (**self).is_armed()
    }

    fn release(&mut self) {
        (**self).release()
    }
}
