#![forbid(unsafe_code)]

//! Binding lifetime management.
//!
//! Compiled templates produce one watcher per binding; a [`BindingScope`]
//! owns all of them for a logical region (a mounted view). Dependency
//! registries hold only weak references, so dropping the scope releases
//! every binding — no perpetual subscribers.

use std::rc::Rc;

use crate::error::Result;
use crate::store::{FieldPath, Store};
use crate::value::Value;
use crate::watcher::Watcher;

/// Owns the watchers created for one compiled view.
///
/// # Invariants
///
/// 1. After drop, no callback from this scope fires again.
/// 2. `clear()` releases all watchers immediately; the scope is reusable.
/// 3. `watcher_count` is exact: one entry per binding created.
#[derive(Default)]
pub struct BindingScope {
    watchers: Vec<Rc<Watcher>>,
}

impl BindingScope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of an externally created watcher.
    pub fn hold(&mut self, watcher: Rc<Watcher>) {
        self.watchers.push(watcher);
    }

    /// Spawn a watcher bound to `path` and hold it in this scope.
    pub fn watch(
        &mut self,
        store: &Store,
        path: impl Into<FieldPath>,
        callback: impl Fn(&Value) + 'static,
    ) -> Result<()> {
        let watcher = Watcher::spawn(store, path, callback)?;
        self.watchers.push(watcher);
        Ok(())
    }

    /// Number of live bindings in this scope.
    #[must_use]
    pub fn watcher_count(&self) -> usize {
        self.watchers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.watchers.is_empty()
    }

    /// Release all bindings immediately (scope stays reusable).
    pub fn clear(&mut self) {
        self.watchers.clear();
    }
}

impl std::fmt::Debug for BindingScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindingScope")
            .field("watcher_count", &self.watchers.len())
            .finish()
    }
}
