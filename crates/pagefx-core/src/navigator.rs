#![forbid(unsafe_code)]

//! Scroll navigation to in-page sections.
//!
//! [`ScrollNavigator`] turns "show section X" into a viewport scroll that
//! leaves the section clear of the fixed header. The arithmetic lives in
//! [`ScrollMath`] so it can be checked without a tree.
//!
//! [`NavBindings`] attaches the navigator to clickable elements (menu links,
//! the hero call-to-action) according to [`NavBinding`] entries in the
//! configuration.

#[cfg(feature = "config-files")]
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::NavigationConfig;
use crate::error::BehaviorError;
use crate::motion::MotionPolicy;
use crate::tree::{ElementRef, Host, PresentationTree, ScrollRequest};

/// Where the target section should land in the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config-files", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-files", serde(rename_all = "lowercase"))]
pub enum Positioning {
    /// Just below the header, with a little padding.
    Top,
    /// Vertically centered in the viewport.
    Center,
    /// Same as [`Positioning::Top`].
    #[default]
    Default,
}

/// Inputs to the offset computation, all in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMath {
    /// Document-relative top of the target.
    pub target_top: f64,
    pub target_height: f64,
    pub header_height: f64,
    pub viewport_height: f64,
}

impl ScrollMath {
    /// Destination offset, clamped to the document start.
    #[must_use]
    pub fn offset(&self, mode: Positioning, top_padding: f64, center_correction: f64) -> f64 {
        let base = self.target_top - self.header_height;
        let raw = match mode {
            Positioning::Top | Positioning::Default => base - top_padding,
            Positioning::Center => {
                let center = (self.viewport_height - self.target_height) / 2.0;
                base - center + center_correction
            }
        };
        // f64::max discards NaN, so a degenerate layout still lands at 0.
        raw.max(0.0)
    }
}

/// Computes and issues section scrolls.
#[derive(Debug, Clone)]
pub struct ScrollNavigator {
    header_id: String,
    fallback_header_height: f64,
    top_padding: f64,
    center_correction: f64,
    motion: MotionPolicy,
}

impl ScrollNavigator {
    #[must_use]
    pub fn new(header_id: &str, config: &NavigationConfig, motion: MotionPolicy) -> Self {
        Self {
            header_id: header_id.to_owned(),
            fallback_header_height: config.fallback_header_height,
            top_padding: config.top_padding,
            center_correction: config.center_correction,
            motion,
        }
    }

    #[must_use]
    pub const fn motion(&self) -> MotionPolicy {
        self.motion
    }

    /// Rendered header height, or the configured fallback.
    #[must_use]
    pub fn header_height<T: PresentationTree + ?Sized>(&self, tree: &T) -> f64 {
        tree.element_by_id(&self.header_id)
            .map_or(self.fallback_header_height, |header| {
                tree.offset_height(header)
            })
    }

    /// Offset that would bring `target_id` into position.
    pub fn compute_offset<H: Host + ?Sized>(
        &self,
        host: &H,
        target_id: &str,
        mode: Positioning,
    ) -> Result<f64, BehaviorError> {
        let target = host
            .element_by_id(target_id)
            .ok_or_else(|| BehaviorError::MissingSection(target_id.to_owned()))?;
        let rect = host.bounding_rect(target);
        let math = ScrollMath {
            target_top: rect.top + host.scroll_y(),
            target_height: host.offset_height(target),
            header_height: self.header_height(host),
            viewport_height: host.inner_height(),
        };
        Ok(math.offset(mode, self.top_padding, self.center_correction))
    }

    /// Scroll the viewport to `target_id`.
    ///
    /// A missing target is logged and returned; nothing scrolls.
    pub fn scroll_to<H: Host + ?Sized>(
        &self,
        host: &mut H,
        target_id: &str,
        mode: Positioning,
    ) -> Result<ScrollRequest, BehaviorError> {
        let top = self.compute_offset(host, target_id, mode).inspect_err(|err| {
            error!(target_id, %err, "scroll navigation aborted");
        })?;
        let request = ScrollRequest {
            top,
            behavior: self.motion.scroll_behavior(),
        };
        debug!(target_id, ?mode, offset = top, behavior = ?request.behavior, "scrolling to section");
        host.scroll_to(request);
        Ok(request)
    }
}

/// A clickable element that navigates to a section.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config-files", derive(Serialize, Deserialize))]
pub struct NavBinding {
    /// Selector of the clickable element; the first match is bound.
    pub selector: String,
    /// Id of the destination section.
    pub target: String,
    #[cfg_attr(feature = "config-files", serde(default))]
    pub mode: Positioning,
}

impl NavBinding {
    #[must_use]
    pub fn new(selector: &str, target: &str, mode: Positioning) -> Self {
        Self {
            selector: selector.to_owned(),
            target: target.to_owned(),
            mode,
        }
    }
}

/// Bindings resolved against the tree.
#[derive(Debug, Clone, Default)]
pub struct NavBindings {
    bound: Vec<(ElementRef, NavBinding)>,
}

impl NavBindings {
    /// Resolve every binding; absent elements are skipped.
    pub fn discover<T: PresentationTree + ?Sized>(tree: &T, bindings: &[NavBinding]) -> Self {
        let bound = bindings
            .iter()
            .filter_map(|binding| match tree.query(&binding.selector) {
                Some(el) => {
                    debug!(selector = %binding.selector, section = %binding.target, "navigation bound");
                    Some((el, binding.clone()))
                }
                None => {
                    debug!(selector = %binding.selector, "navigation element absent");
                    None
                }
            })
            .collect();
        Self { bound }
    }

    /// Bound elements in binding order.
    pub fn elements(&self) -> impl Iterator<Item = ElementRef> + '_ {
        self.bound.iter().map(|(el, _)| *el)
    }

    #[must_use]
    pub fn binding_for(&self, el: ElementRef) -> Option<&NavBinding> {
        self.bound
            .iter()
            .find(|(bound, _)| *bound == el)
            .map(|(_, binding)| binding)
    }

    /// Handle a click on `el`. `None` when `el` is not bound.
    pub fn on_click<H: Host + ?Sized>(
        &self,
        host: &mut H,
        navigator: &ScrollNavigator,
        el: ElementRef,
    ) -> Option<Result<ScrollRequest, BehaviorError>> {
        let binding = self.binding_for(el)?;
        info!(section = %binding.target, mode = ?binding.mode, "navigation clicked");
        Some(navigator.scroll_to(host, &binding.target, binding.mode))
    }
}
