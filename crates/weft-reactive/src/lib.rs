#![forbid(unsafe_code)]

//! Reactive data layer for Weft.
//!
//! This crate provides the dependency-tracked store at the heart of the
//! view-binding engine:
//!
//! - [`Value`]: the plain application data vocabulary.
//! - [`Store`]: a converted object graph of intercepted accessors, each
//!   with an attached dependency registry.
//! - [`Dep`]: per-slot registry of interested watchers.
//! - [`Watcher`]: one (expression, callback) binding with change
//!   suppression via an old-value cache.
//! - [`BindingScope`]: explicit ownership of compiled bindings; dropping
//!   the scope tears them all down.
//!
//! # Architecture
//!
//! Single-threaded, `Rc<RefCell<..>>` shared ownership. Registries hold
//! `Weak` watcher references cleaned up lazily during notification.
//! Dependency discovery is implicit: a watcher's construction performs
//! one *marked read*, and every slot getter that fires during that read
//! registers the watcher as a side effect of evaluation.
//!
//! # Invariants
//!
//! 1. One slot, one registry, per converted field, for its lifetime.
//! 2. Watchers are notified in registration order, synchronously, within
//!    the triggering write.
//! 3. Equal-value writes notify nobody; equal-value re-evaluations fire
//!    no callback.
//! 4. The active-watcher marker is a single thread-local slot; marked
//!    evaluation is non-reentrant (guarded by assertion).
//! 5. Dropping a [`BindingScope`] releases its watchers before the next
//!    notification cycle.

pub mod dep;
pub mod error;
pub mod scope;
pub mod store;
pub mod value;
pub mod watcher;

pub use dep::Dep;
pub use error::{Result, StoreError};
pub use scope::BindingScope;
pub use store::{FieldPath, Store};
pub use value::Value;
pub use watcher::Watcher;
