#![forbid(unsafe_code)]

//! `web-sys` implementation of the presentation tree.
//!
//! Elements handed to the behaviors are interned in a handle table; the same
//! DOM node always maps to the same [`ElementRef`], so listener targets and
//! observer entries compare equal to the handles found during discovery.

use std::cell::RefCell;

use pagefx_core::tree::{Rect, ScrollBehavior, ScrollRequest};
use pagefx_core::{BehaviorError, ElementRef, PresentationTree, Viewport};
use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, NodeList, ScrollToOptions, Window};

fn report(op: &'static str, err: &JsValue) {
    warn!(op, error = ?err, "dom call failed");
}

/// The live document as a [`PresentationTree`] + [`Viewport`].
#[derive(Debug)]
pub struct DomHost {
    window: Window,
    document: Document,
    handles: RefCell<Vec<Element>>,
}

impl DomHost {
    #[must_use]
    pub fn new(window: Window, document: Document) -> Self {
        Self {
            window,
            document,
            handles: RefCell::new(Vec::new()),
        }
    }

    /// The global window and its document.
    pub fn from_global() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("window has no document"))?;
        Ok(Self::new(window, document))
    }

    #[must_use]
    pub fn window(&self) -> &Window {
        &self.window
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Handle for `el`, allocating one on first sight.
    pub fn intern(&self, el: Element) -> ElementRef {
        let mut handles = self.handles.borrow_mut();
        if let Some(index) = handles.iter().position(|known| *known == el) {
            return ElementRef::new(index as u32);
        }
        handles.push(el);
        ElementRef::new((handles.len() - 1) as u32)
    }

    /// The DOM node behind a handle.
    pub fn element(&self, el: ElementRef) -> Result<Element, BehaviorError> {
        self.handles
            .borrow()
            .get(el.index() as usize)
            .cloned()
            .ok_or(BehaviorError::UnknownElement(el))
    }

    fn html(&self, el: ElementRef) -> Option<HtmlElement> {
        match self.element(el) {
            Ok(element) => element.dyn_into::<HtmlElement>().ok(),
            Err(err) => {
                warn!(%err, "stale element handle");
                None
            }
        }
    }

    fn collect(&self, list: NodeList) -> Vec<ElementRef> {
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|el| self.intern(el))
            .collect()
    }
}

impl PresentationTree for DomHost {
    fn element_by_id(&self, id: &str) -> Option<ElementRef> {
        self.document.get_element_by_id(id).map(|el| self.intern(el))
    }

    fn query(&self, selector: &str) -> Option<ElementRef> {
        match self.document.query_selector(selector) {
            Ok(found) => found.map(|el| self.intern(el)),
            Err(err) => {
                report("query_selector", &err);
                None
            }
        }
    }

    fn query_all(&self, selector: &str) -> Vec<ElementRef> {
        match self.document.query_selector_all(selector) {
            Ok(list) => self.collect(list),
            Err(err) => {
                report("query_selector_all", &err);
                Vec::new()
            }
        }
    }

    fn query_all_within(&self, root: ElementRef, selector: &str) -> Vec<ElementRef> {
        let Ok(root) = self.element(root) else {
            return Vec::new();
        };
        match root.query_selector_all(selector) {
            Ok(list) => self.collect(list),
            Err(err) => {
                report("query_selector_all", &err);
                Vec::new()
            }
        }
    }

    fn parent(&self, el: ElementRef) -> Option<ElementRef> {
        let parent = self.element(el).ok()?.parent_element()?;
        Some(self.intern(parent))
    }

    fn body(&self) -> Option<ElementRef> {
        self.document.body().map(|body| self.intern(body.into()))
    }

    fn attribute(&self, el: ElementRef, name: &str) -> Option<String> {
        self.element(el).ok()?.get_attribute(name)
    }

    fn has_class(&self, el: ElementRef, class: &str) -> bool {
        self.element(el)
            .is_ok_and(|element| element.class_list().contains(class))
    }

    fn add_class(&mut self, el: ElementRef, class: &str) {
        if let Ok(element) = self.element(el) {
            if let Err(err) = element.class_list().add_1(class) {
                report("class_list.add", &err);
            }
        }
    }

    fn remove_class(&mut self, el: ElementRef, class: &str) {
        if let Ok(element) = self.element(el) {
            if let Err(err) = element.class_list().remove_1(class) {
                report("class_list.remove", &err);
            }
        }
    }

    fn offset_height(&self, el: ElementRef) -> f64 {
        self.html(el)
            .map_or(0.0, |element| f64::from(element.offset_height()))
    }

    fn scroll_height(&self, el: ElementRef) -> f64 {
        self.element(el)
            .map_or(0.0, |element| f64::from(element.scroll_height()))
    }

    fn bounding_rect(&self, el: ElementRef) -> Rect {
        self.element(el).map_or(Rect::default(), |element| {
            let rect = element.get_bounding_client_rect();
            Rect::new(rect.top(), rect.height())
        })
    }

    fn set_style(&mut self, el: ElementRef, property: &str, value: &str) {
        if let Some(element) = self.html(el) {
            if let Err(err) = element.style().set_property(property, value) {
                report("style.set_property", &err);
            }
        }
    }

    fn set_root_style(&mut self, property: &str, value: &str) {
        let Some(root) = self
            .document
            .document_element()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            return;
        };
        if let Err(err) = root.style().set_property(property, value) {
            report("style.set_property", &err);
        }
    }
}

impl Viewport for DomHost {
    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn inner_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0)
    }

    fn scroll_to(&mut self, request: ScrollRequest) {
        let options = ScrollToOptions::new();
        options.set_top(request.top);
        options.set_behavior(match request.behavior {
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
            ScrollBehavior::Immediate => web_sys::ScrollBehavior::Instant,
        });
        self.window.scroll_to_with_scroll_to_options(&options);
    }
}
