#![forbid(unsafe_code)]

//! Watchers and the active-watcher marker.
//!
//! A [`Watcher`] binds one field-path evaluation to one side-effect
//! callback. Dependency discovery is a side effect of evaluation: during
//! construction the watcher performs exactly one *marked read* — the
//! thread-local marker is set to the watcher, the path is evaluated
//! against the store (each slot's getter registers the marked watcher
//! into its [`Dep`](crate::Dep)), and the marker is cleared.
//!
//! # Invariants
//!
//! 1. The marker is a single thread-local slot, not a stack. Marked
//!    evaluation is non-reentrant: starting a marked read while one is in
//!    flight is a bug and asserts.
//! 2. The marker is cleared when the marked read completes, including on
//!    unwind (RAII guard).
//! 3. `update()` re-evaluates unmarked — no re-registration — and fires
//!    the callback only when the value actually changed. This is the sole
//!    per-watcher suppression point and holds even though `Dep::notify`
//!    is unconditional.
//!
//! # Failure Modes
//!
//! - Evaluation failure during `update()` (the bound field vanished when
//!   an ancestor map was replaced): the callback is skipped and a warning
//!   is traced. Construction-time evaluation failure is a hard error.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::error::Result;
use crate::store::{FieldPath, Store};
use crate::value::Value;

thread_local! {
    static ACTIVE: RefCell<Option<Weak<Watcher>>> = const { RefCell::new(None) };
}

/// The currently-marked watcher, if a marked read is in flight.
///
/// Slot getters call this to attribute the read.
#[must_use]
pub(crate) fn active_watcher() -> Option<Weak<Watcher>> {
    ACTIVE.with(|slot| slot.borrow().clone())
}

/// RAII guard for the marked-read region: set on construction, cleared on
/// drop. Nested marking asserts.
struct MarkGuard;

impl MarkGuard {
    fn set(watcher: Weak<Watcher>) -> Self {
        ACTIVE.with(|slot| {
            let mut slot = slot.borrow_mut();
            assert!(
                slot.is_none(),
                "re-entrant marked read: a watcher evaluation started while another was in flight"
            );
            *slot = Some(watcher);
        });
        Self
    }
}

impl Drop for MarkGuard {
    fn drop(&mut self) {
        ACTIVE.with(|slot| slot.borrow_mut().take());
    }
}

/// One live binding between a field path and a side-effect callback.
///
/// Created once per directive/interpolation match at compile time, owned
/// by a [`BindingScope`](crate::BindingScope). Registries hold only weak
/// references, so dropping the owning scope tears the binding down.
pub struct Watcher {
    store: Store,
    path: FieldPath,
    callback: Box<dyn Fn(&Value)>,
    /// Last-observed value, for change suppression.
    last: RefCell<Value>,
}

impl Watcher {
    /// Create a watcher and perform its single marked read.
    ///
    /// The marked read both seeds the old-value cache and registers this
    /// watcher into the registry of every slot the path actually touches.
    pub fn spawn(
        store: &Store,
        path: impl Into<FieldPath>,
        callback: impl Fn(&Value) + 'static,
    ) -> Result<Rc<Self>> {
        let path = path.into();
        let watcher = Rc::new(Self {
            store: store.clone(),
            path,
            callback: Box::new(callback),
            last: RefCell::new(Value::Null),
        });

        let initial = {
            let _mark = MarkGuard::set(Rc::downgrade(&watcher));
            watcher.store.get_path(&watcher.path)?
        };
        tracing::debug!(message = "watcher.spawn", path = %watcher.path);
        *watcher.last.borrow_mut() = initial;
        Ok(watcher)
    }

    /// Re-evaluate (unmarked) and fire the callback if the value changed.
    pub fn update(&self) {
        let new = match self.store.get_path(&self.path) {
            Ok(v) => v,
            Err(err) => {
                tracing::warn!(message = "watcher.update.eval_failed", path = %self.path, %err);
                return;
            }
        };
        let changed = {
            let mut last = self.last.borrow_mut();
            if *last == new {
                false
            } else {
                *last = new.clone();
                true
            }
        };
        // Borrow released first: the callback may re-enter the store.
        if changed {
            (self.callback)(&new);
        }
    }

    /// The bound field path.
    #[must_use]
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Last-observed value.
    #[must_use]
    pub fn last_value(&self) -> Value {
        self.last.borrow().clone()
    }
}

impl std::fmt::Debug for Watcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Watcher")
            .field("path", &self.path)
            .field("last", &self.last.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data;
    use std::cell::Cell;

    #[test]
    fn spawn_seeds_old_value_from_marked_read() {
        let store = Store::new(data! { msg: "hi" }).unwrap();
        let w = Watcher::spawn(&store, "msg", |_| {}).unwrap();
        assert_eq!(w.last_value(), Value::Str("hi".into()));
    }

    #[test]
    fn spawn_on_unknown_field_is_an_error() {
        let store = Store::new(data! { msg: "hi" }).unwrap();
        let err = Watcher::spawn(&store, "nope", |_| {}).unwrap_err();
        assert_eq!(err, crate::StoreError::unknown("nope"));
    }

    #[test]
    fn marker_cleared_after_spawn() {
        let store = Store::new(data! { a: 1 }).unwrap();
        let _w = Watcher::spawn(&store, "a", |_| {}).unwrap();
        assert!(
            active_watcher().is_none(),
            "marker must be cleared once the marked read completes"
        );
    }

    #[test]
    fn marker_cleared_on_failed_spawn() {
        let store = Store::new(data! { a: 1 }).unwrap();
        let _ = Watcher::spawn(&store, "missing", |_| {});
        assert!(active_watcher().is_none());
    }

    #[test]
    fn update_fires_only_on_change() {
        let store = Store::new(data! { n: 1 }).unwrap();
        let fired = Rc::new(Cell::new(0u32));
        let f = Rc::clone(&fired);
        let w = Watcher::spawn(&store, "n", move |_| f.set(f.get() + 1)).unwrap();

        w.update();
        assert_eq!(fired.get(), 0, "unchanged value must not fire");

        store.set("n", Value::Int(2)).unwrap();
        assert_eq!(fired.get(), 1);

        // Dep already notified; a manual update with no further change is
        // suppressed by the old-value cache.
        w.update();
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn update_receives_new_value() {
        let store = Store::new(data! { msg: "a" }).unwrap();
        let seen = Rc::new(RefCell::new(Value::Null));
        let s = Rc::clone(&seen);
        let _w = Watcher::spawn(&store, "msg", move |v| *s.borrow_mut() = v.clone()).unwrap();

        store.set("msg", Value::Str("b".into())).unwrap();
        assert_eq!(*seen.borrow(), Value::Str("b".into()));
    }

    #[test]
    fn trimmed_expression_resolves() {
        let store = Store::new(data! { msg: "hi" }).unwrap();
        let w = Watcher::spawn(&store, "  msg  ", |_| {}).unwrap();
        assert_eq!(w.last_value(), Value::Str("hi".into()));
    }
}
