#![forbid(unsafe_code)]

//! Debounced reflow handling.
//!
//! Resize bursts collapse into one recompute, `wait` after the last event.
//! The recompute re-measures the open accordion panel and republishes the
//! header height as the `--header-height` custom property on the root.

use core::time::Duration;

use tracing::debug;

use crate::accordion::Accordion;
use crate::timing::Debouncer;
use crate::tree::{PresentationTree, px};

/// Custom property mirroring the rendered header height.
pub const HEADER_HEIGHT_PROPERTY: &str = "--header-height";

/// Publish the header height to [`HEADER_HEIGHT_PROPERTY`].
///
/// Returns the height, or `None` when the header is absent.
pub fn update_header_offset<T: PresentationTree + ?Sized>(tree: &mut T, header_id: &str) -> Option<f64> {
    let header = tree.element_by_id(header_id)?;
    let height = tree.offset_height(header);
    tree.set_root_style(HEADER_HEIGHT_PROPERTY, &px(height));
    Some(height)
}

/// Outcome of one recompute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reflow {
    pub panels_refreshed: usize,
    pub header_height: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct ResizeHandler {
    header_id: String,
    debouncer: Debouncer,
    recomputes: u64,
}

impl ResizeHandler {
    #[must_use]
    pub fn new(header_id: &str, wait: Duration) -> Self {
        Self {
            header_id: header_id.to_owned(),
            debouncer: Debouncer::new(wait),
            recomputes: 0,
        }
    }

    /// Record a resize event.
    pub fn on_resize(&mut self, now: Duration) {
        self.debouncer.trigger(now);
    }

    #[must_use]
    pub const fn deadline(&self) -> Option<Duration> {
        self.debouncer.deadline()
    }

    /// Recomputes performed so far.
    #[must_use]
    pub const fn recomputes(&self) -> u64 {
        self.recomputes
    }

    pub fn cancel(&mut self) {
        self.debouncer.cancel();
    }

    /// Run the recompute if the quiet period has elapsed.
    pub fn poll<T: PresentationTree + ?Sized>(
        &mut self,
        tree: &mut T,
        accordion: &Accordion,
        now: Duration,
    ) -> Option<Reflow> {
        if !self.debouncer.poll(now) {
            return None;
        }
        Some(self.recompute(tree, accordion))
    }

    /// Recompute immediately.
    pub fn recompute<T: PresentationTree + ?Sized>(&mut self, tree: &mut T, accordion: &Accordion) -> Reflow {
        self.recomputes += 1;
        let reflow = Reflow {
            panels_refreshed: accordion.refresh_open_heights(tree),
            header_height: update_header_offset(tree, &self.header_id),
        };
        debug!(
            panels = reflow.panels_refreshed,
            header_height = ?reflow.header_height,
            recomputes = self.recomputes,
            "reflow recomputed"
        );
        reflow
    }
}
