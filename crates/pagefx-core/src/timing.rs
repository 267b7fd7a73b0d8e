#![forbid(unsafe_code)]

//! Deferred-work primitives driven by a host clock.
//!
//! Both types are pure state machines over a monotonic `Duration` supplied
//! by the host, so they behave identically under a browser timer and under a
//! test that advances time by hand.
//!
//! - [`Debouncer`]: trailing-edge coalescing. A burst of triggers yields one
//!   firing, `wait` after the last trigger.
//! - [`FrameThrottle`]: at most one animation-frame request per interval.

use core::time::Duration;

/// Trailing-edge debounce with a single pending deadline.
#[derive(Debug, Clone)]
pub struct Debouncer {
    wait: Duration,
    deadline: Option<Duration>,
}

impl Debouncer {
    #[must_use]
    pub const fn new(wait: Duration) -> Self {
        Self {
            wait,
            deadline: None,
        }
    }

    #[must_use]
    pub const fn wait(&self) -> Duration {
        self.wait
    }

    /// Record a trigger at `now`, replacing any pending deadline.
    pub fn trigger(&mut self, now: Duration) {
        self.deadline = Some(now.saturating_add(self.wait));
    }

    /// Drop the pending firing, if any.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    #[must_use]
    pub const fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns `true` exactly once when the pending deadline has passed.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Animation-frame gate.
///
/// A request while idle asks the host for one frame and starts the
/// interval; requests inside the interval are dropped. The frame callback
/// reads fresh state, so dropped requests lose nothing.
#[derive(Debug, Clone)]
pub struct FrameThrottle {
    interval: Duration,
    ticking_until: Option<Duration>,
}

impl FrameThrottle {
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            ticking_until: None,
        }
    }

    /// Returns `true` if the caller should request an animation frame.
    pub fn request(&mut self, now: Duration) -> bool {
        if let Some(until) = self.ticking_until {
            if now < until {
                return false;
            }
        }
        self.ticking_until = Some(now.saturating_add(self.interval));
        true
    }

    #[must_use]
    pub fn is_ticking(&self, now: Duration) -> bool {
        self.ticking_until.is_some_and(|until| now < until)
    }
}
