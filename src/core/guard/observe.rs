/*!
 * Observable Guard Wrapper
 *
 * Wraps any guard to add lifecycle tracing
 */

use super::traits::Guard;
use std::time::Instant;
use tracing::debug;

/// Guard metadata for observability
#[derive(Debug, Clone)]
pub struct GuardMetadata {
    pub resource_type: &'static str,
    pub label: Option<&'static str>,
    pub creation_time: Instant,
}

impl GuardMetadata {
    #[inline]
    pub fn new(resource_type: &'static str) -> Self {
        Self {
            resource_type,
            label: None,
            creation_time: Instant::now(),
        }
    }

    #[inline]
    pub fn with_label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    #[inline]
    pub fn lifetime_micros(&self) -> u64 {
        self.creation_time.elapsed().as_micros() as u64
    }
}

/// Wrapper that adds observability to any guard
///
/// Metadata lives here rather than in the guards themselves, which keeps
/// plain guards as small as their action.
///
/// # Example
///
/// ```rust
/// use scope_exit::core::guard::{make_exit_guard, ObservableGuard};
///
/// let guard = ObservableGuard::wrap(make_exit_guard(|| {}), "flush_buffers");
/// // Emits created/dropped events with the guard lifetime
/// drop(guard);
/// ```
pub struct ObservableGuard<G: Guard> {
    inner: G,
    metadata: GuardMetadata,
}

impl<G: Guard> ObservableGuard<G> {
    /// Wrap a guard to make it observable
    pub fn wrap(guard: G, label: &'static str) -> Self {
        let metadata = GuardMetadata::new(guard.resource_type()).with_label(label);
        let wrapped = Self {
            inner: guard,
            metadata,
        };

        wrapped.emit_created();
        wrapped
    }

    /// Get reference to inner guard
    pub fn inner(&self) -> &G {
        &self.inner
    }

    /// Get mutable reference to inner guard
    pub fn inner_mut(&mut self) -> &mut G {
        &mut self.inner
    }

    /// Get guard metadata
    pub fn metadata(&self) -> &GuardMetadata {
        &self.metadata
    }

    fn emit_created(&self) {
        debug!(
            resource_type = self.metadata.resource_type,
            label = ?self.metadata.label,
            armed = self.inner.is_armed(),
            "guard created"
        );
    }

    fn emit_released(&self) {
        debug!(
            resource_type = self.metadata.resource_type,
            label = ?self.metadata.label,
            lifetime_micros = self.metadata.lifetime_micros(),
            "guard released"
        );
    }

    fn emit_dropped(&self) {
        debug!(
            resource_type = self.metadata.resource_type,
            label = ?self.metadata.label,
            armed = self.inner.is_armed(),
            lifetime_micros = self.metadata.lifetime_micros(),
            "guard dropped"
        );
    }
}

impl<G: Guard> Guard for ObservableGuard<G> {
    fn resource_type(&self) -> &'static str {
        self.inner.resource_type()
    }

    fn is_armed(&self) -> bool {
        self.inner.is_armed()
    }

    fn release(&mut self) {
        if self.inner.is_armed() {
            self.inner.release();
            self.emit_released();
        }
    }
}

impl<G: Guard> Drop for ObservableGuard<G> {
    fn drop(&mut self) {
        // Inner guard drops after this and decides whether its action runs
        self.emit_dropped();
    }
}
