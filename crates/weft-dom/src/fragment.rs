#![forbid(unsafe_code)]

//! Offscreen working fragment.
//!
//! The compiler detaches a root's children into a [`Fragment`], works on
//! them offscreen, and appends them back in a single operation. This is
//! an ordering convention, not a correctness requirement: nothing
//! observes the tree mid-compile.

use crate::node::NodeRef;

/// Detached children of one element, awaiting re-attachment.
#[derive(Debug, Default)]
pub struct Fragment {
    nodes: Vec<NodeRef>,
}

impl Fragment {
    /// Detach all children of `root` into a new fragment.
    #[must_use]
    pub fn detach_children(root: &NodeRef) -> Self {
        Self {
            nodes: root.drain_children(),
        }
    }

    /// Nodes currently held, in document order.
    #[must_use]
    pub fn nodes(&self) -> &[NodeRef] {
        &self.nodes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append everything back to `root`, exactly once. Consumes the
    /// fragment.
    pub fn append_to(self, root: &NodeRef) {
        for node in self.nodes {
            root.append_child(node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{el, text};

    #[test]
    fn detach_empties_the_root() {
        let root = el("div").child(el("h1")).child(text("x"));
        let fragment = Fragment::detach_children(&root);
        assert_eq!(fragment.len(), 2);
        assert!(!root.has_child_nodes());
    }

    #[test]
    fn append_restores_document_order() {
        let root = el("div").child(el("a")).child(el("b"));
        let fragment = Fragment::detach_children(&root);
        fragment.append_to(&root);

        let tags: Vec<Option<String>> =
            root.child_nodes().iter().map(crate::node::NodeRef::tag).collect();
        assert_eq!(tags, [Some("a".into()), Some("b".into())]);
    }

    #[test]
    fn detaching_a_text_node_yields_empty() {
        let t = text("hi");
        let fragment = Fragment::detach_children(&t);
        assert!(fragment.is_empty());
    }
}
