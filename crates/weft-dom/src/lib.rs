#![forbid(unsafe_code)]

//! Retained in-memory node tree for Weft.
//!
//! This crate is the platform surface the view-binding engine compiles
//! against: elements with attributes, control values and event listeners,
//! text nodes, document fragments, and selector lookup. It contains no
//! reactivity — the engine wires bindings *onto* these nodes from the
//! outside.
//!
//! # Invariants
//!
//! 1. Event dispatch is synchronous and runs listeners in registration
//!    order; listeners may re-enter the tree freely.
//! 2. Attribute iteration order is insertion order.
//! 3. `Fragment` re-attachment happens exactly once, preserving document
//!    order.

pub mod document;
pub mod event;
pub mod fragment;
pub mod node;

pub use document::Document;
pub use event::{Event, Listener};
pub use fragment::Fragment;
pub use node::{Attribute, NodeRef, el, text};
