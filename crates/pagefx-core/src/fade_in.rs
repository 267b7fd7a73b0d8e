#![forbid(unsafe_code)]

//! Fade-in of sections as they enter the viewport.
//!
//! Sections from a fixed selector list are marked `fade-in` at setup and
//! handed to one shared intersection watcher. Every intersecting entry in a
//! callback batch gains `visible`; the transition is one-way.
//!
//! Browser hosts feed entries from an `IntersectionObserver` configured from
//! [`IntersectionOptions`]. Headless hosts compute them with
//! [`FadeInObserver::sample`], which applies the same threshold and root
//! margin to the tree's geometry.

use tracing::{debug, info};

use crate::config::FadeInConfig;
use crate::subscription::Subscription;
use crate::tree::{ElementRef, PresentationTree, Rect, Viewport};

/// Marker added at setup to animation candidates.
pub const CANDIDATE_CLASS: &str = "fade-in";
/// Marker added once a candidate has been seen.
pub const VISIBLE_CLASS: &str = "visible";

/// Intersection watcher options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionOptions {
    /// Fraction of the target that must be inside the root.
    pub threshold: f64,
    /// Pixels removed from the bottom of the root box.
    pub bottom_margin_px: f64,
}

impl IntersectionOptions {
    #[must_use]
    pub fn from_config(config: &FadeInConfig) -> Self {
        Self {
            threshold: config.threshold,
            bottom_margin_px: config.bottom_margin_px,
        }
    }

    /// CSS `rootMargin` string (`top right bottom left`).
    #[must_use]
    pub fn root_margin(&self) -> String {
        format!("0px 0px {}px 0px", 0.0 - self.bottom_margin_px)
    }

    /// Whether `rect` counts as intersecting a viewport of `viewport_height`.
    ///
    /// Zero-height targets intersect when their edge lies inside the root.
    #[must_use]
    pub fn is_intersecting(&self, rect: Rect, viewport_height: f64) -> bool {
        let root_bottom = viewport_height - self.bottom_margin_px;
        let visible = rect.bottom().min(root_bottom) - rect.top.max(0.0);
        if rect.height <= 0.0 {
            return rect.top >= 0.0 && rect.top <= root_bottom;
        }
        visible > 0.0 && visible / rect.height >= self.threshold
    }
}

/// One intersection callback entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntersectionEntry {
    pub target: ElementRef,
    pub is_intersecting: bool,
}

#[derive(Debug)]
pub struct FadeInObserver {
    targets: Vec<ElementRef>,
    options: IntersectionOptions,
    subscription: Option<Subscription>,
}

impl FadeInObserver {
    /// Mark every present section as a candidate.
    pub fn discover<T: PresentationTree + ?Sized>(tree: &mut T, config: &FadeInConfig) -> Self {
        let mut targets = Vec::new();
        for selector in &config.sections {
            match tree.query(selector) {
                Some(el) => {
                    tree.add_class(el, CANDIDATE_CLASS);
                    targets.push(el);
                }
                None => debug!(selector = %selector, "fade-in section absent"),
            }
        }
        debug!(sections = targets.len(), "fade-in observer initialized");
        Self {
            targets,
            options: IntersectionOptions::from_config(config),
            subscription: None,
        }
    }

    #[must_use]
    pub fn targets(&self) -> &[ElementRef] {
        &self.targets
    }

    #[must_use]
    pub const fn options(&self) -> IntersectionOptions {
        self.options
    }

    /// Hand over the host registration that feeds this observer.
    pub fn attach(&mut self, subscription: Subscription) {
        if let Some(previous) = self.subscription.replace(subscription) {
            previous.cancel();
        }
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.subscription.as_ref().is_some_and(Subscription::is_active)
    }

    /// Release the host registration; later entries are still honoured.
    pub fn unobserve_all(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
        }
    }

    /// Apply a callback batch. Returns how many sections became visible.
    pub fn on_entries<T: PresentationTree + ?Sized>(
        &self,
        tree: &mut T,
        entries: &[IntersectionEntry],
    ) -> usize {
        let mut revealed = 0;
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            if !self.targets.contains(&entry.target) {
                continue;
            }
            if !tree.has_class(entry.target, VISIBLE_CLASS) {
                tree.add_class(entry.target, VISIBLE_CLASS);
                revealed += 1;
            }
        }
        if revealed > 0 {
            info!(revealed, "sections faded in");
        }
        revealed
    }

    /// Compute entries for every target from the host's current geometry.
    pub fn sample<H: PresentationTree + Viewport + ?Sized>(&self, host: &H) -> Vec<IntersectionEntry> {
        let viewport_height = host.inner_height();
        self.targets
            .iter()
            .map(|&target| IntersectionEntry {
                target,
                is_intersecting: self
                    .options
                    .is_intersecting(host.bounding_rect(target), viewport_height),
            })
            .collect()
    }
}
