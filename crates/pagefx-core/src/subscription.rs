#![forbid(unsafe_code)]

//! Owned handles for host registrations.
//!
//! A host-side registration (an event listener, an intersection observer)
//! is represented by a [`Subscription`] holding the closure that undoes it.
//! Dropping or cancelling the handle runs the closure once. Behaviors that
//! own a registration keep its handle, so teardown is a matter of dropping
//! state.

use core::fmt;

pub struct Subscription {
    label: &'static str,
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(label: &'static str, cancel: impl FnOnce() + 'static) -> Self {
        Self {
            label,
            cancel: Some(Box::new(cancel)),
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.label
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    /// Undo the registration now.
    pub fn cancel(mut self) {
        self.run();
    }

    fn run(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            tracing::debug!(label = self.label, "subscription released");
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("label", &self.label)
            .field("active", &self.is_active())
            .finish()
    }
}
