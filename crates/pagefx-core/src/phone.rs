#![forbid(unsafe_code)]

//! Passive click logging on telephone links.

use tracing::info;

use crate::tree::{ElementRef, PresentationTree};

#[derive(Debug, Clone, PartialEq, Eq)]
struct PhoneLink {
    el: ElementRef,
    href: String,
}

/// Telephone links plus the header call button.
#[derive(Debug, Clone, Default)]
pub struct PhoneLinks {
    links: Vec<PhoneLink>,
    cta: Option<ElementRef>,
}

impl PhoneLinks {
    pub fn discover<T: PresentationTree + ?Sized>(
        tree: &T,
        links_selector: &str,
        cta_selector: &str,
    ) -> Self {
        let links = tree
            .query_all(links_selector)
            .into_iter()
            .map(|el| PhoneLink {
                el,
                href: tree.attribute(el, "href").unwrap_or_default(),
            })
            .collect();
        Self {
            links,
            cta: tree.query(cta_selector),
        }
    }

    /// Every element that gets a logging listener.
    pub fn elements(&self) -> impl Iterator<Item = ElementRef> + '_ {
        self.cta.into_iter().chain(self.links.iter().map(|l| l.el))
    }

    /// Log a click. Returns whether `el` is one of ours.
    pub fn on_click(&self, el: ElementRef) -> bool {
        let mut handled = false;
        if self.cta == Some(el) {
            info!("phone button clicked, calling");
            handled = true;
        }
        if let Some(link) = self.links.iter().find(|l| l.el == el) {
            info!(href = %link.href, "phone number clicked");
            handled = true;
        }
        handled
    }
}
