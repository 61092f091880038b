//! Subscription lifetime guards.
//!
//! Every runtime task is owned by a [`Subscription`]. Dropping the guard
//! aborts the task, which drops its collaborator receivers and so releases
//! the underlying SDK subscriptions. No callbacks fire after release.

use std::fmt;

use tokio::task::AbortHandle;

/// Owns one background task. Aborts it on drop.
#[must_use = "dropping a Subscription releases it immediately"]
pub struct Subscription {
    handle: AbortHandle,
    label: &'static str,
}

impl Subscription {
    /// Guard the task behind `handle`.
    pub fn new(label: &'static str, handle: AbortHandle) -> Self {
        Self { handle, label }
    }

    /// Release now rather than on drop.
    pub fn release(self) {}

    /// The guarded task already stopped.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if !self.handle.is_finished() {
            tracing::trace!(label = self.label, "releasing subscription");
        }
        self.handle.abort();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("label", &self.label)
            .field("finished", &self.handle.is_finished())
            .finish()
    }
}
