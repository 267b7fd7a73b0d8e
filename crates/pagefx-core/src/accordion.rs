#![forbid(unsafe_code)]

//! Accordion group with at most one open panel.
//!
//! Each panel is a header whose parent item names its content element
//! through a data attribute. Opening a panel expands its content to the
//! natural height measured at that moment and closes every other panel.
//! The open panel is tracked here and mirrored to the `active` marker on
//! its item; content heights are mirrored to inline `max-height`.

use tracing::{debug, info, warn};

use crate::error::BehaviorError;
use crate::tree::{ElementRef, PresentationTree, px};

/// Marker on the open panel's item.
pub const ACTIVE_CLASS: &str = "active";

#[derive(Debug, Clone)]
struct Panel {
    header: ElementRef,
    item: ElementRef,
    /// Content element id, if the item declares one.
    target: Option<String>,
}

/// What a header click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelTransition {
    Opened { panel: usize, height_px: u32 },
    Closed { panel: usize },
}

/// Accordion controller.
#[derive(Debug, Clone, Default)]
pub struct Accordion {
    panels: Vec<Panel>,
    open: Option<usize>,
}

impl Accordion {
    /// Collect panels from `header_selector`; the item is each header's parent.
    pub fn discover<T: PresentationTree + ?Sized>(
        tree: &T,
        header_selector: &str,
        target_attr: &str,
    ) -> Self {
        let headers = tree.query_all(header_selector);
        if headers.is_empty() {
            warn!(selector = header_selector, "no accordion headers found");
            return Self::default();
        }
        let panels: Vec<Panel> = headers
            .into_iter()
            .filter_map(|header| {
                let item = tree.parent(header)?;
                Some(Panel {
                    header,
                    item,
                    target: tree.attribute(item, target_attr),
                })
            })
            .collect();
        // Respect markup that ships with a panel already open.
        let open = panels.iter().position(|p| tree.has_class(p.item, ACTIVE_CLASS));
        debug!(panels = panels.len(), ?open, "accordion initialized");
        Self { panels, open }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Index of the open panel.
    #[must_use]
    pub const fn open_panel(&self) -> Option<usize> {
        self.open
    }

    pub fn headers(&self) -> impl Iterator<Item = ElementRef> + '_ {
        self.panels.iter().map(|p| p.header)
    }

    #[must_use]
    pub fn panel_for_header(&self, header: ElementRef) -> Option<usize> {
        self.panels.iter().position(|p| p.header == header)
    }

    fn content<T: PresentationTree + ?Sized>(&self, tree: &T, panel: usize) -> Option<ElementRef> {
        let target = self.panels.get(panel)?.target.as_deref()?;
        tree.element_by_id(target)
    }

    fn collapse<T: PresentationTree + ?Sized>(&self, tree: &mut T, panel: usize) {
        let Some(p) = self.panels.get(panel) else {
            return;
        };
        tree.remove_class(p.item, ACTIVE_CLASS);
        if let Some(content) = self.content(tree, panel) {
            tree.set_style(content, "max-height", "0");
        }
    }

    /// Toggle `panel`: close it if open, otherwise open it and close the rest.
    pub fn toggle<T: PresentationTree + ?Sized>(
        &mut self,
        tree: &mut T,
        panel: usize,
    ) -> Result<PanelTransition, BehaviorError> {
        let Some(p) = self.panels.get(panel) else {
            return Err(BehaviorError::MissingAccordionContent(format!("panel {panel}")));
        };
        let Some(content) = self.content(tree, panel) else {
            let target = p.target.clone().unwrap_or_default();
            warn!(panel, content = %target, "accordion content not found");
            return Err(BehaviorError::MissingAccordionContent(target));
        };
        let item = p.item;

        // Markup may ship several items active; any click settles them.
        for other in (0..self.panels.len()).filter(|&i| i != panel) {
            self.collapse(tree, other);
        }
        if self.open == Some(panel) {
            self.collapse(tree, panel);
            self.open = None;
            info!(panel, "accordion panel closed");
            return Ok(PanelTransition::Closed { panel });
        }

        let height = tree.scroll_height(content);
        tree.add_class(item, ACTIVE_CLASS);
        tree.set_style(content, "max-height", &px(height));
        self.open = Some(panel);
        info!(panel, height, "accordion panel opened");
        Ok(PanelTransition::Opened {
            panel,
            height_px: height.max(0.0).round() as u32,
        })
    }

    /// Handle a click on `header`. `None` when it is not an accordion header.
    pub fn on_header_click<T: PresentationTree + ?Sized>(
        &mut self,
        tree: &mut T,
        header: ElementRef,
    ) -> Option<Result<PanelTransition, BehaviorError>> {
        let panel = self.panel_for_header(header)?;
        Some(self.toggle(tree, panel))
    }

    /// Re-measure every active panel after reflow.
    ///
    /// Returns the number of panels updated.
    pub fn refresh_open_heights<T: PresentationTree + ?Sized>(&self, tree: &mut T) -> usize {
        let mut refreshed = 0;
        for (panel, p) in self.panels.iter().enumerate() {
            if self.open != Some(panel) && !tree.has_class(p.item, ACTIVE_CLASS) {
                continue;
            }
            let Some(content) = self.content(tree, panel) else {
                continue;
            };
            let height = tree.scroll_height(content);
            tree.set_style(content, "max-height", &px(height));
            debug!(panel, height, "accordion height refreshed");
            refreshed += 1;
        }
        refreshed
    }
}
