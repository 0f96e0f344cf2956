#![forbid(unsafe_code)]

//! Document root and mount-target lookup.

use crate::node::NodeRef;

/// A node tree with selector-based lookup over it.
///
/// Selector grammar is deliberately small: `#id` matches an element with
/// that `id` attribute, anything else matches a tag name. Depth-first,
/// first match wins.
#[derive(Debug, Clone)]
pub struct Document {
    root: NodeRef,
}

impl Document {
    #[must_use]
    pub fn new(root: NodeRef) -> Self {
        Self { root }
    }

    #[must_use]
    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    /// Resolve a selector against the tree (root included).
    #[must_use]
    pub fn select(&self, selector: &str) -> Option<NodeRef> {
        let matches: Box<dyn Fn(&NodeRef) -> bool> = match selector.strip_prefix('#') {
            Some(id) => {
                let id = id.to_string();
                Box::new(move |node: &NodeRef| node.attr_value("id").as_deref() == Some(&id))
            }
            None => {
                let tag = selector.to_string();
                Box::new(move |node: &NodeRef| node.tag().as_deref() == Some(&tag))
            }
        };
        find_first(&self.root, &matches)
    }
}

fn find_first(node: &NodeRef, matches: &dyn Fn(&NodeRef) -> bool) -> Option<NodeRef> {
    if node.is_element() && matches(node) {
        return Some(node.clone());
    }
    for child in node.child_nodes() {
        if let Some(found) = find_first(&child, matches) {
            return Some(found);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{el, text};

    fn sample() -> Document {
        Document::new(
            el("body")
                .child(el("div").attr("id", "app").child(el("h1").child(text("t"))))
                .child(el("div").attr("id", "other")),
        )
    }

    #[test]
    fn select_by_id() {
        let doc = sample();
        let app = doc.select("#app").expect("should find #app");
        assert_eq!(app.attr_value("id").as_deref(), Some("app"));
    }

    #[test]
    fn select_by_tag_is_depth_first() {
        let doc = sample();
        let div = doc.select("div").expect("should find a div");
        assert_eq!(div.attr_value("id").as_deref(), Some("app"));
    }

    #[test]
    fn select_miss_is_none() {
        let doc = sample();
        assert!(doc.select("#missing").is_none());
        assert!(doc.select("table").is_none());
    }

    #[test]
    fn root_itself_can_match() {
        let doc = sample();
        let body = doc.select("body").expect("root should match");
        assert!(body.ptr_eq(doc.root()));
    }
}
