#![forbid(unsafe_code)]

//! Retained node tree.
//!
//! # Design
//!
//! [`NodeRef`] is a cheap shared handle (`Rc`) to an element or text
//! node. Elements carry insertion-ordered attributes, children, a control
//! value (the form-control "value" property, distinct from the markup
//! attribute), and event listeners. Text nodes carry mutable content.
//!
//! Builder-style constructors ([`el`], [`text`], chained
//! [`attr`](NodeRef::attr)/[`child`](NodeRef::child)) exist so templates
//! can be assembled in code; this crate is the platform surface the
//! compiler consumes, and deliberately knows nothing about reactivity or
//! directives.
//!
//! # Invariants
//!
//! 1. Attribute order is insertion order.
//! 2. No tree borrow is held across user callbacks (listeners may mutate
//!    any node, including the one dispatching).

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::event::{Event, Listener};

/// One markup attribute, name/value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

struct ElementData {
    tag: String,
    attrs: RefCell<Vec<Attribute>>,
    children: RefCell<Vec<NodeRef>>,
    listeners: RefCell<Vec<(String, Listener)>>,
    /// Live form-control value property. Independent of any `value`
    /// markup attribute.
    control_value: RefCell<String>,
}

struct TextData {
    content: RefCell<String>,
}

enum NodeKind {
    Element(ElementData),
    Text(TextData),
}

/// Shared handle to a node. Clones share the node.
#[derive(Clone)]
pub struct NodeRef {
    inner: Rc<NodeKind>,
}

/// Create an element node.
#[must_use]
pub fn el(tag: impl Into<String>) -> NodeRef {
    NodeRef {
        inner: Rc::new(NodeKind::Element(ElementData {
            tag: tag.into(),
            attrs: RefCell::new(Vec::new()),
            children: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
            control_value: RefCell::new(String::new()),
        })),
    }
}

/// Create a text node.
#[must_use]
pub fn text(content: impl Into<String>) -> NodeRef {
    NodeRef {
        inner: Rc::new(NodeKind::Text(TextData {
            content: RefCell::new(content.into()),
        })),
    }
}

impl NodeRef {
    // -- classification ----------------------------------------------------

    #[must_use]
    pub fn is_element(&self) -> bool {
        matches!(&*self.inner, NodeKind::Element(_))
    }

    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(&*self.inner, NodeKind::Text(_))
    }

    /// Identity comparison (same underlying node).
    #[must_use]
    pub fn ptr_eq(&self, other: &NodeRef) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn element(&self) -> Option<&ElementData> {
        match &*self.inner {
            NodeKind::Element(data) => Some(data),
            NodeKind::Text(_) => None,
        }
    }

    // -- builder -----------------------------------------------------------

    /// Builder: add an attribute. No-op on text nodes (debug-asserted).
    #[must_use]
    pub fn attr(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder: append a child. No-op on text nodes (debug-asserted).
    #[must_use]
    pub fn child(self, node: NodeRef) -> Self {
        self.append_child(node);
        self
    }

    /// Builder: append several children.
    #[must_use]
    pub fn children(self, nodes: impl IntoIterator<Item = NodeRef>) -> Self {
        for node in nodes {
            self.append_child(node);
        }
        self
    }

    // -- element surface ---------------------------------------------------

    /// Tag name, for elements.
    #[must_use]
    pub fn tag(&self) -> Option<String> {
        self.element().map(|e| e.tag.clone())
    }

    /// Attributes in insertion order, for elements.
    #[must_use]
    pub fn attrs(&self) -> Vec<Attribute> {
        self.element()
            .map(|e| e.attrs.borrow().clone())
            .unwrap_or_default()
    }

    /// Value of a named attribute.
    #[must_use]
    pub fn attr_value(&self, name: &str) -> Option<String> {
        self.element().and_then(|e| {
            e.attrs
                .borrow()
                .iter()
                .find(|a| a.name == name)
                .map(|a| a.value.clone())
        })
    }

    pub fn set_attr(&self, name: impl Into<String>, value: impl Into<String>) {
        let Some(element) = self.element() else {
            debug_assert!(false, "set_attr on a text node");
            return;
        };
        let name = name.into();
        let value = value.into();
        let mut attrs = element.attrs.borrow_mut();
        match attrs.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => attrs.push(Attribute { name, value }),
        }
    }

    pub fn append_child(&self, node: NodeRef) {
        let Some(element) = self.element() else {
            debug_assert!(false, "append_child on a text node");
            return;
        };
        element.children.borrow_mut().push(node);
    }

    /// Snapshot of the current children.
    #[must_use]
    pub fn child_nodes(&self) -> Vec<NodeRef> {
        self.element()
            .map(|e| e.children.borrow().clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn has_child_nodes(&self) -> bool {
        self.element()
            .is_some_and(|e| !e.children.borrow().is_empty())
    }

    pub(crate) fn drain_children(&self) -> Vec<NodeRef> {
        self.element()
            .map(|e| std::mem::take(&mut *e.children.borrow_mut()))
            .unwrap_or_default()
    }

    // -- text surface ------------------------------------------------------

    /// Text content: a text node's own content, or the concatenated
    /// content of an element's descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        match &*self.inner {
            NodeKind::Text(data) => data.content.borrow().clone(),
            NodeKind::Element(data) => {
                let children = data.children.borrow().clone();
                children.iter().map(NodeRef::text_content).collect()
            }
        }
    }

    /// Replace text content. On an element this replaces all children
    /// with a single text node (the `textContent` write convention).
    pub fn set_text_content(&self, content: impl Into<String>) {
        let content = content.into();
        match &*self.inner {
            NodeKind::Text(data) => *data.content.borrow_mut() = content,
            NodeKind::Element(data) => {
                *data.children.borrow_mut() = vec![text(content)];
            }
        }
    }

    // -- control value -----------------------------------------------------

    /// Live form-control value.
    #[must_use]
    pub fn control_value(&self) -> String {
        self.element()
            .map(|e| e.control_value.borrow().clone())
            .unwrap_or_default()
    }

    pub fn set_control_value(&self, value: impl Into<String>) {
        if let Some(element) = self.element() {
            *element.control_value.borrow_mut() = value.into();
        }
    }

    // -- events ------------------------------------------------------------

    /// Attach a listener for `kind`. Listeners run in registration order.
    pub fn add_event_listener(&self, kind: impl Into<String>, handler: impl Fn(&Event) + 'static) {
        let Some(element) = self.element() else {
            debug_assert!(false, "add_event_listener on a text node");
            return;
        };
        element
            .listeners
            .borrow_mut()
            .push((kind.into(), Rc::new(handler)));
    }

    /// Dispatch an event synchronously to this node's listeners.
    ///
    /// The listener list is snapshotted first, so handlers may mutate the
    /// tree — including this node — while the dispatch runs.
    pub fn dispatch(&self, kind: &str) {
        let Some(element) = self.element() else {
            return;
        };
        let matching: Vec<Listener> = element
            .listeners
            .borrow()
            .iter()
            .filter(|(k, _)| k == kind)
            .map(|(_, l)| Rc::clone(l))
            .collect();
        tracing::trace!(message = "node.dispatch", kind, listeners = matching.len());
        let event = Event::new(kind, self.clone());
        for listener in matching {
            listener(&event);
        }
    }

    /// Simulate user input: set the control value, then dispatch `input`.
    pub fn dispatch_input(&self, value: impl Into<String>) {
        self.set_control_value(value);
        self.dispatch("input");
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.inner {
            NodeKind::Element(data) => f
                .debug_struct("Element")
                .field("tag", &data.tag)
                .field("children", &data.children.borrow().len())
                .finish(),
            NodeKind::Text(data) => f
                .debug_struct("Text")
                .field("content", &*data.content.borrow())
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn builder_assembles_tree() {
        let root = el("div")
            .attr("id", "app")
            .child(el("h1").child(text("{{msg}}")))
            .child(el("input").attr("v-model", "name"));

        assert!(root.is_element());
        assert_eq!(root.tag().as_deref(), Some("div"));
        assert_eq!(root.attr_value("id").as_deref(), Some("app"));
        assert_eq!(root.child_nodes().len(), 2);
    }

    #[test]
    fn attrs_keep_insertion_order() {
        let node = el("input").attr("b", "2").attr("a", "1").attr("c", "3");
        let names: Vec<String> = node.attrs().into_iter().map(|a| a.name).collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn set_attr_overwrites_in_place() {
        let node = el("div").attr("x", "1");
        node.set_attr("x", "2");
        assert_eq!(node.attr_value("x").as_deref(), Some("2"));
        assert_eq!(node.attrs().len(), 1);
    }

    #[test]
    fn text_content_concatenates_descendants() {
        let node = el("p").child(text("a")).child(el("b").child(text("c")));
        assert_eq!(node.text_content(), "ac");
    }

    #[test]
    fn set_text_content_replaces_children() {
        let node = el("h1").child(text("old")).child(el("span"));
        node.set_text_content("new");
        assert_eq!(node.text_content(), "new");
        assert_eq!(node.child_nodes().len(), 1);
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let node = el("button");
        let order = Rc::new(RefCell::new(Vec::new()));
        for i in 0..3 {
            let o = Rc::clone(&order);
            node.add_event_listener("click", move |_| o.borrow_mut().push(i));
        }
        node.dispatch("click");
        assert_eq!(*order.borrow(), [0, 1, 2]);
    }

    #[test]
    fn dispatch_filters_by_kind() {
        let node = el("input");
        let clicks = Rc::new(Cell::new(0u32));
        let inputs = Rc::new(Cell::new(0u32));
        let (c, i) = (Rc::clone(&clicks), Rc::clone(&inputs));
        node.add_event_listener("click", move |_| c.set(c.get() + 1));
        node.add_event_listener("input", move |_| i.set(i.get() + 1));

        node.dispatch("input");
        assert_eq!((clicks.get(), inputs.get()), (0, 1));
    }

    #[test]
    fn dispatch_input_sets_value_first() {
        let node = el("input");
        let seen = Rc::new(RefCell::new(String::new()));
        let s = Rc::clone(&seen);
        node.add_event_listener("input", move |ev| {
            *s.borrow_mut() = ev.target().control_value();
        });
        node.dispatch_input("typed");
        assert_eq!(*seen.borrow(), "typed");
    }

    #[test]
    fn listener_may_mutate_dispatching_node() {
        let node = el("input");
        let n = node.clone();
        node.add_event_listener("input", move |_| n.set_control_value("rewritten"));
        node.dispatch("input");
        assert_eq!(node.control_value(), "rewritten");
    }

    #[test]
    fn clones_share_the_node() {
        let a = el("div");
        let b = a.clone();
        b.set_attr("k", "v");
        assert_eq!(a.attr_value("k").as_deref(), Some("v"));
        assert!(a.ptr_eq(&b));
    }
}
