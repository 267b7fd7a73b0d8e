#![forbid(unsafe_code)]

//! Host seam: the presentation tree and the viewport.
//!
//! Behaviors never touch a DOM directly. They see elements as opaque
//! [`ElementRef`] handles issued by the host, and they read geometry and
//! mutate marker classes and inline styles through [`PresentationTree`].
//! Window-level state (scroll position, viewport height, scroll requests)
//! goes through [`Viewport`]. A browser adapter and the in-memory
//! [`MemoryPage`](crate::memory::MemoryPage) both implement the pair.
//!
//! Selector arguments use the subset parsed by [`crate::selector`].

/// Opaque handle to an element owned by the host.
///
/// Handles are stable for the lifetime of the host: resolving the same
/// element twice yields the same handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementRef(u32);

impl ElementRef {
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

/// Viewport-relative bounding box (vertical axis only).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Distance from the top of the viewport to the element's top edge.
    pub top: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// How a viewport scroll is animated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    #[default]
    Smooth,
    /// Jump without animation.
    Immediate,
}

/// A request to move the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    /// Document-relative vertical offset, never negative.
    pub top: f64,
    pub behavior: ScrollBehavior,
}

/// Element queries and mutations.
pub trait PresentationTree {
    /// Resolve an element by its `id` attribute.
    fn element_by_id(&self, id: &str) -> Option<ElementRef>;

    /// First element in document order matching `selector`.
    fn query(&self, selector: &str) -> Option<ElementRef>;

    /// All elements in document order matching `selector`.
    fn query_all(&self, selector: &str) -> Vec<ElementRef>;

    /// All descendants of `root` matching `selector`.
    fn query_all_within(&self, root: ElementRef, selector: &str) -> Vec<ElementRef>;

    fn parent(&self, el: ElementRef) -> Option<ElementRef>;

    fn body(&self) -> Option<ElementRef>;

    fn attribute(&self, el: ElementRef, name: &str) -> Option<String>;

    fn has_class(&self, el: ElementRef, class: &str) -> bool;

    fn add_class(&mut self, el: ElementRef, class: &str);

    fn remove_class(&mut self, el: ElementRef, class: &str);

    /// Flip `class` on `el`, returning whether it is now present.
    fn toggle_class(&mut self, el: ElementRef, class: &str) -> bool {
        if self.has_class(el, class) {
            self.remove_class(el, class);
            false
        } else {
            self.add_class(el, class);
            true
        }
    }

    /// Set `class` to `present`.
    fn set_class(&mut self, el: ElementRef, class: &str, present: bool) {
        if present {
            self.add_class(el, class);
        } else {
            self.remove_class(el, class);
        }
    }

    /// Rendered height including borders (`offsetHeight`).
    fn offset_height(&self, el: ElementRef) -> f64;

    /// Natural content height (`scrollHeight`).
    fn scroll_height(&self, el: ElementRef) -> f64;

    /// Viewport-relative bounding box.
    fn bounding_rect(&self, el: ElementRef) -> Rect;

    /// Set an inline style property on `el`.
    fn set_style(&mut self, el: ElementRef, property: &str, value: &str);

    /// Set an inline style property (or custom property) on the document root.
    fn set_root_style(&mut self, property: &str, value: &str);
}

/// Window-level scroll state.
pub trait Viewport {
    /// Current vertical page offset.
    fn scroll_y(&self) -> f64;

    /// Layout viewport height.
    fn inner_height(&self) -> f64;

    fn scroll_to(&mut self, request: ScrollRequest);
}

/// Everything a page behavior can touch.
pub trait Host: PresentationTree + Viewport {}

impl<T: PresentationTree + Viewport> Host for T {}

/// Format a pixel length the way inline styles expect it.
#[must_use]
pub fn px(value: f64) -> String {
    format!("{value}px")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn px_drops_trailing_zero_fraction() {
        assert_eq!(px(120.0), "120px");
        assert_eq!(px(122.5), "122.5px");
        assert_eq!(px(0.0), "0px");
    }

    #[test]
    fn rect_bottom() {
        assert_eq!(Rect::new(10.0, 30.0).bottom(), 40.0);
    }
}
