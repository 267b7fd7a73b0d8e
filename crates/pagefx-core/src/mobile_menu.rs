#![forbid(unsafe_code)]

//! Hamburger menu toggle.
//!
//! The drawer is open or closed; the state is mirrored to the `active`
//! marker on both the toggle control and the drawer so they never disagree.
//! Any navigation link inside the drawer closes it.

use tracing::{debug, info};

use crate::tree::{ElementRef, PresentationTree};

pub const ACTIVE_CLASS: &str = "active";

/// Which menu element a click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuTarget {
    Toggle,
    NavLink,
}

#[derive(Debug, Clone)]
pub struct MobileMenu {
    toggle: ElementRef,
    drawer: ElementRef,
    links: Vec<ElementRef>,
    open: bool,
}

impl MobileMenu {
    /// Resolve the toggle and drawer. `None` (logged) when either is absent.
    pub fn discover<T: PresentationTree + ?Sized>(
        tree: &T,
        toggle_selector: &str,
        drawer_id: &str,
        link_selector: &str,
    ) -> Option<Self> {
        let (Some(toggle), Some(drawer)) =
            (tree.query(toggle_selector), tree.element_by_id(drawer_id))
        else {
            info!("mobile menu elements not found, skipping mobile menu");
            return None;
        };
        let links = tree.query_all_within(drawer, link_selector);
        let open = tree.has_class(drawer, ACTIVE_CLASS);
        debug!(links = links.len(), open, "mobile menu initialized");
        Some(Self {
            toggle,
            drawer,
            links,
            open,
        })
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub const fn toggle_element(&self) -> ElementRef {
        self.toggle
    }

    #[must_use]
    pub const fn drawer(&self) -> ElementRef {
        self.drawer
    }

    #[must_use]
    pub fn links(&self) -> &[ElementRef] {
        &self.links
    }

    #[must_use]
    pub fn classify(&self, el: ElementRef) -> Option<MenuTarget> {
        if el == self.toggle {
            Some(MenuTarget::Toggle)
        } else if self.links.contains(&el) {
            Some(MenuTarget::NavLink)
        } else {
            None
        }
    }

    fn write<T: PresentationTree + ?Sized>(&mut self, tree: &mut T, open: bool) {
        self.open = open;
        tree.set_class(self.toggle, ACTIVE_CLASS, open);
        tree.set_class(self.drawer, ACTIVE_CLASS, open);
    }

    /// Flip the drawer; returns the new state.
    pub fn toggle<T: PresentationTree + ?Sized>(&mut self, tree: &mut T) -> bool {
        let open = !self.open;
        self.write(tree, open);
        info!(open, "mobile menu toggled");
        open
    }

    pub fn close<T: PresentationTree + ?Sized>(&mut self, tree: &mut T) {
        if self.open {
            debug!("mobile menu closed by navigation");
        }
        self.write(tree, false);
    }

    /// Handle a click on `el`. `None` when `el` is not a menu element.
    pub fn on_click<T: PresentationTree + ?Sized>(
        &mut self,
        tree: &mut T,
        el: ElementRef,
    ) -> Option<MenuTarget> {
        let target = self.classify(el)?;
        match target {
            MenuTarget::Toggle => {
                self.toggle(tree);
            }
            MenuTarget::NavLink => self.close(tree),
        }
        Some(target)
    }
}
