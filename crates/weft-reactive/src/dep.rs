#![forbid(unsafe_code)]

//! Per-slot dependency registry.
//!
//! Every reactive slot owns exactly one [`Dep`] for its whole lifetime.
//! Watchers are held as `Weak` references and cleaned up lazily during
//! notification, so a dropped binding scope releases its watchers without
//! any explicit unsubscription protocol.
//!
//! # Invariants
//!
//! 1. Watchers are notified in registration order.
//! 2. Registration never deduplicates; a watcher registered twice is
//!    notified twice, and its own old-value cache suppresses the second
//!    callback.
//! 3. `notify` runs every live watcher's `update()` to completion,
//!    synchronously, before returning to the triggering write.
//! 4. No registry borrow is held while watcher callbacks run, so a
//!    callback may re-enter the store (and this registry) freely.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::watcher::Watcher;

/// Insertion-ordered set of watchers interested in one reactive slot.
#[derive(Default)]
pub struct Dep {
    watchers: RefCell<Vec<Weak<Watcher>>>,
}

impl Dep {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a watcher. Duplicates are tolerated, not rejected.
    pub fn register(&self, watcher: &Weak<Watcher>) {
        self.watchers.borrow_mut().push(Weak::clone(watcher));
    }

    /// Run `update()` on every live watcher, in registration order.
    ///
    /// Dead `Weak` entries are pruned here, lazily. The registry borrow is
    /// released before any callback runs.
    pub fn notify(&self) {
        let live: Vec<Rc<Watcher>> = {
            let mut watchers = self.watchers.borrow_mut();
            watchers.retain(|w| w.strong_count() > 0);
            watchers.iter().filter_map(Weak::upgrade).collect()
        };
        tracing::trace!(message = "dep.notify", watchers = live.len());
        for watcher in live {
            watcher.update();
        }
    }

    /// Number of live registrations (duplicates counted).
    #[must_use]
    pub fn watcher_count(&self) -> usize {
        self.watchers
            .borrow()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }
}

impl std::fmt::Debug for Dep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dep")
            .field("watcher_count", &self.watcher_count())
            .finish()
    }
}
