#![forbid(unsafe_code)]

//! Reduced-motion guard.
//!
//! The user's `prefers-reduced-motion` preference is sampled once at
//! startup and turned into a [`MotionPolicy`] value that the navigator and
//! hero fade read. A mid-session preference change is not observed.

use crate::tree::{PresentationTree, ScrollBehavior};

/// Media query evaluated by the host at startup.
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// Body marker added when motion is reduced.
pub const REDUCED_MOTION_CLASS: &str = "reduced-motion";

/// Session-wide animation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionPolicy {
    #[default]
    Full,
    Reduced,
}

impl MotionPolicy {
    #[must_use]
    pub const fn from_preference(prefers_reduced: bool) -> Self {
        if prefers_reduced { Self::Reduced } else { Self::Full }
    }

    #[must_use]
    pub const fn is_reduced(self) -> bool {
        matches!(self, Self::Reduced)
    }

    /// Behavior for every programmatic scroll this session.
    #[must_use]
    pub const fn scroll_behavior(self) -> ScrollBehavior {
        match self {
            Self::Full => ScrollBehavior::Smooth,
            Self::Reduced => ScrollBehavior::Immediate,
        }
    }
}

/// Apply the preference to the tree and return the policy.
///
/// Under reduced motion the body gets [`REDUCED_MOTION_CLASS`] and the root's
/// inline `scroll-behavior` is forced to `auto`, so CSS-driven smooth
/// scrolling is disabled as well as programmatic scrolls.
pub fn apply_motion_guard<T: PresentationTree + ?Sized>(
    tree: &mut T,
    prefers_reduced: bool,
) -> MotionPolicy {
    let policy = MotionPolicy::from_preference(prefers_reduced);
    if policy.is_reduced() {
        if let Some(body) = tree.body() {
            tree.add_class(body, REDUCED_MOTION_CLASS);
        }
        tree.set_root_style("scroll-behavior", "auto");
        tracing::info!("reduced motion preferred; animated scrolling disabled");
    }
    policy
}
