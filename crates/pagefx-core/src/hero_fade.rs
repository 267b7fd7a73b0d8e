#![forbid(unsafe_code)]

//! Hero title fade with a single-threshold latch.
//!
//! Scroll events are gated through a [`FrameThrottle`]; the frame callback
//! samples the scroll position and flips the `fade-out` marker only when the
//! position crosses the threshold in the opposite direction of the latch.
//! Oscillating on one side of the threshold changes nothing.

use core::time::Duration;

use tracing::info;

use crate::motion::MotionPolicy;
use crate::timing::FrameThrottle;
use crate::tree::{ElementRef, PresentationTree};

pub const FADE_OUT_CLASS: &str = "fade-out";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeTransition {
    FadedOut,
    Restored,
}

#[derive(Debug, Clone)]
pub struct HeroFade {
    title: ElementRef,
    threshold: f64,
    faded: bool,
    throttle: FrameThrottle,
}

impl HeroFade {
    /// Resolve the title. `None` when absent or when motion is reduced.
    pub fn discover<T: PresentationTree + ?Sized>(
        tree: &T,
        selector: &str,
        threshold: f64,
        frame_interval: Duration,
        motion: MotionPolicy,
    ) -> Option<Self> {
        if motion.is_reduced() {
            info!("hero title fade disabled under reduced motion");
            return None;
        }
        let Some(title) = tree.query(selector) else {
            info!(selector, "hero title not found, skipping fade");
            return None;
        };
        Some(Self {
            title,
            threshold,
            faded: tree.has_class(title, FADE_OUT_CLASS),
            throttle: FrameThrottle::new(frame_interval),
        })
    }

    #[must_use]
    pub const fn is_faded(&self) -> bool {
        self.faded
    }

    #[must_use]
    pub const fn title(&self) -> ElementRef {
        self.title
    }

    /// A scroll event arrived; returns whether to request an animation frame.
    pub fn on_scroll(&mut self, now: Duration) -> bool {
        self.throttle.request(now)
    }

    /// Frame callback: compare `scroll_y` against the threshold.
    pub fn on_frame<T: PresentationTree + ?Sized>(
        &mut self,
        tree: &mut T,
        scroll_y: f64,
    ) -> Option<FadeTransition> {
        if scroll_y > self.threshold && !self.faded {
            tree.add_class(self.title, FADE_OUT_CLASS);
            self.faded = true;
            info!(scroll_y, "hero title faded out");
            Some(FadeTransition::FadedOut)
        } else if scroll_y <= self.threshold && self.faded {
            tree.remove_class(self.title, FADE_OUT_CLASS);
            self.faded = false;
            info!(scroll_y, "hero title restored");
            Some(FadeTransition::Restored)
        } else {
            None
        }
    }
}
