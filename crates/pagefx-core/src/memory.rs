#![forbid(unsafe_code)]

//! In-memory host for headless runs and tests.
//!
//! [`MemoryPage`] is a small element tree with explicit geometry plus a
//! viewport that records every scroll request. Layout is not computed:
//! callers state each element's document-relative top, rendered height and
//! natural content height up front and may change them later to simulate
//! reflow.
//!
//! ```
//! use pagefx_core::memory::{ElementTemplate, MemoryPage};
//! use pagefx_core::tree::PresentationTree;
//!
//! let mut page = MemoryPage::new(800.0);
//! let body = page.body_ref();
//! let header = page.append(body, ElementTemplate::new("header").id("main-header").height(120.0));
//! assert_eq!(page.element_by_id("main-header"), Some(header));
//! ```

use std::collections::BTreeMap;

use crate::error::BehaviorError;
use crate::selector::{Selector, SelectorSubject};
use crate::tree::{ElementRef, PresentationTree, Rect, ScrollRequest, Viewport};

/// Declarative description of a new element.
#[derive(Debug, Clone, Default)]
pub struct ElementTemplate {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    top: f64,
    height: f64,
    scroll_height: Option<f64>,
}

impl ElementTemplate {
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_owned(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_owned());
        self
    }

    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_owned());
        self
    }

    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_owned(), value.to_owned());
        self
    }

    /// Document-relative top edge.
    #[must_use]
    pub fn top(mut self, top: f64) -> Self {
        self.top = top;
        self
    }

    /// Rendered height; also the natural height unless overridden.
    #[must_use]
    pub fn height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    #[must_use]
    pub fn scroll_height(mut self, scroll_height: f64) -> Self {
        self.scroll_height = Some(scroll_height);
        self
    }
}

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    parent: Option<ElementRef>,
    top: f64,
    height: f64,
    scroll_height: f64,
}

impl SelectorSubject for Node {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        match name {
            "id" => self.id.as_deref(),
            "class" => None,
            _ => self.attrs.get(name).map(String::as_str),
        }
    }
}

/// Headless presentation tree and viewport.
#[derive(Debug, Clone)]
pub struct MemoryPage {
    nodes: Vec<Node>,
    root: ElementRef,
    body: ElementRef,
    scroll_y: f64,
    inner_height: f64,
    scroll_log: Vec<ScrollRequest>,
}

impl MemoryPage {
    /// Create an `html > body` document with the given viewport height.
    #[must_use]
    pub fn new(inner_height: f64) -> Self {
        let mut page = Self {
            nodes: Vec::new(),
            root: ElementRef::new(0),
            body: ElementRef::new(0),
            scroll_y: 0.0,
            inner_height,
            scroll_log: Vec::new(),
        };
        page.root = page.push(None, ElementTemplate::new("html"));
        page.body = page.push(Some(page.root), ElementTemplate::new("body"));
        page
    }

    #[must_use]
    pub const fn root_ref(&self) -> ElementRef {
        self.root
    }

    #[must_use]
    pub const fn body_ref(&self) -> ElementRef {
        self.body
    }

    fn push(&mut self, parent: Option<ElementRef>, template: ElementTemplate) -> ElementRef {
        let el = ElementRef::new(self.nodes.len() as u32);
        self.nodes.push(Node {
            tag: template.tag,
            id: template.id,
            classes: template.classes,
            attrs: template.attrs,
            style: BTreeMap::new(),
            parent,
            top: template.top,
            height: template.height,
            scroll_height: template.scroll_height.unwrap_or(template.height),
        });
        el
    }

    /// Append a child element. Document order is insertion order.
    pub fn append(&mut self, parent: ElementRef, template: ElementTemplate) -> ElementRef {
        self.push(Some(parent), template)
    }

    fn node(&self, el: ElementRef) -> Result<&Node, BehaviorError> {
        self.nodes
            .get(el.index() as usize)
            .ok_or(BehaviorError::UnknownElement(el))
    }

    fn node_mut(&mut self, el: ElementRef) -> Result<&mut Node, BehaviorError> {
        self.nodes
            .get_mut(el.index() as usize)
            .ok_or(BehaviorError::UnknownElement(el))
    }

    /// Class list of `el` in insertion order.
    pub fn classes(&self, el: ElementRef) -> Result<Vec<&str>, BehaviorError> {
        Ok(self.node(el)?.classes.iter().map(String::as_str).collect())
    }

    /// Inline style value on `el`.
    #[must_use]
    pub fn style(&self, el: ElementRef, property: &str) -> Option<&str> {
        self.node(el).ok()?.style.get(property).map(String::as_str)
    }

    #[must_use]
    pub fn root_style(&self, property: &str) -> Option<&str> {
        self.style(self.root, property)
    }

    /// Simulate reflow of an element's rendered and natural heights.
    pub fn resize_element(
        &mut self,
        el: ElementRef,
        height: f64,
        scroll_height: f64,
    ) -> Result<(), BehaviorError> {
        let node = self.node_mut(el)?;
        node.height = height;
        node.scroll_height = scroll_height;
        Ok(())
    }

    /// Move the viewport as a user scroll would (no request is logged).
    pub fn set_scroll_y(&mut self, scroll_y: f64) {
        self.scroll_y = scroll_y;
    }

    /// Every scroll request issued so far.
    #[must_use]
    pub fn scroll_log(&self) -> &[ScrollRequest] {
        &self.scroll_log
    }

    fn ancestors(&self, el: ElementRef) -> impl Iterator<Item = &Node> + '_ {
        let mut cursor = self.nodes.get(el.index() as usize).and_then(|n| n.parent);
        std::iter::from_fn(move || {
            let current = cursor?;
            let node = self.nodes.get(current.index() as usize)?;
            cursor = node.parent;
            Some(node)
        })
    }

    fn is_descendant_of(&self, el: ElementRef, root: ElementRef) -> bool {
        let mut cursor = self.parent(el);
        while let Some(current) = cursor {
            if current == root {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    fn select(&self, selector: &str) -> impl Iterator<Item = ElementRef> + '_ {
        let parsed = match Selector::parse(selector) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                tracing::warn!(%err, "selector rejected by memory host");
                None
            }
        };
        self.nodes
            .iter()
            .enumerate()
            .filter_map(move |(index, node)| {
                let sel = parsed.as_ref()?;
                let el = ElementRef::new(index as u32);
                sel.matches(node, self.ancestors(el)).then_some(el)
            })
    }
}

impl PresentationTree for MemoryPage {
    fn element_by_id(&self, id: &str) -> Option<ElementRef> {
        self.nodes
            .iter()
            .position(|n| n.id.as_deref() == Some(id))
            .map(|index| ElementRef::new(index as u32))
    }

    fn query(&self, selector: &str) -> Option<ElementRef> {
        self.select(selector).next()
    }

    fn query_all(&self, selector: &str) -> Vec<ElementRef> {
        self.select(selector).collect()
    }

    fn query_all_within(&self, root: ElementRef, selector: &str) -> Vec<ElementRef> {
        self.select(selector)
            .filter(|&el| self.is_descendant_of(el, root))
            .collect()
    }

    fn parent(&self, el: ElementRef) -> Option<ElementRef> {
        self.node(el).ok()?.parent
    }

    fn body(&self) -> Option<ElementRef> {
        Some(self.body)
    }

    fn attribute(&self, el: ElementRef, name: &str) -> Option<String> {
        self.node(el).ok()?.attribute(name).map(str::to_owned)
    }

    fn has_class(&self, el: ElementRef, class: &str) -> bool {
        self.node(el).is_ok_and(|n| n.has_class(class))
    }

    fn add_class(&mut self, el: ElementRef, class: &str) {
        if let Ok(node) = self.node_mut(el) {
            if !node.has_class(class) {
                node.classes.push(class.to_owned());
            }
        }
    }

    fn remove_class(&mut self, el: ElementRef, class: &str) {
        if let Ok(node) = self.node_mut(el) {
            node.classes.retain(|c| c != class);
        }
    }

    fn offset_height(&self, el: ElementRef) -> f64 {
        self.node(el).map_or(0.0, |n| n.height)
    }

    fn scroll_height(&self, el: ElementRef) -> f64 {
        self.node(el).map_or(0.0, |n| n.scroll_height)
    }

    fn bounding_rect(&self, el: ElementRef) -> Rect {
        self.node(el)
            .map_or_else(|_| Rect::default(), |n| Rect::new(n.top - self.scroll_y, n.height))
    }

    fn set_style(&mut self, el: ElementRef, property: &str, value: &str) {
        if let Ok(node) = self.node_mut(el) {
            node.style.insert(property.to_owned(), value.to_owned());
        }
    }

    fn set_root_style(&mut self, property: &str, value: &str) {
        let root = self.root;
        self.set_style(root, property, value);
    }
}

impl Viewport for MemoryPage {
    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn inner_height(&self) -> f64 {
        self.inner_height
    }

    /// Headless scrolls land instantly regardless of behavior.
    fn scroll_to(&mut self, request: ScrollRequest) {
        self.scroll_y = request.top;
        self.scroll_log.push(request);
    }
}
