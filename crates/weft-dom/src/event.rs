#![forbid(unsafe_code)]

//! Canonical event type for synchronous listener dispatch.

use std::rc::Rc;

use crate::node::NodeRef;

/// Listener callback. Runs synchronously, in registration order.
pub type Listener = Rc<dyn Fn(&Event)>;

/// A dispatched event: kind plus the node it targeted.
#[derive(Debug, Clone)]
pub struct Event {
    kind: String,
    target: NodeRef,
}

impl Event {
    #[must_use]
    pub fn new(kind: impl Into<String>, target: NodeRef) -> Self {
        Self {
            kind: kind.into(),
            target,
        }
    }

    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The node the event was dispatched on (for input events, the
    /// control whose live value just changed).
    #[must_use]
    pub fn target(&self) -> &NodeRef {
        &self.target
    }
}
