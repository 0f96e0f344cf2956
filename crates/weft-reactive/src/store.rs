#![forbid(unsafe_code)]

//! The reactive store: intercepted accessors with attached registries.
//!
//! # Design
//!
//! [`Store::new`] walks the root map and replaces every field with a
//! [`ReactiveSlot`] — an explicit accessor pair (`get`/`set`) with an
//! attached [`Dep`]. Conversion is post-order: a nested map's own fields
//! become slots before the parent field is wrapped, so replacing the
//! parent later re-converts cleanly. Non-map values (including lists) are
//! reactive leaves.
//!
//! The getter consults the active-watcher marker and registers the marked
//! watcher into the slot's registry; the setter compares against the
//! current value, no-ops on equality, converts structured replacements
//! recursively, stores, and notifies.
//!
//! # Invariants
//!
//! 1. Every field that existed at conversion time is exactly one slot
//!    with exactly one `Dep` for its lifetime.
//! 2. A map assigned through `set` after initialization is recursively
//!    converted; reactivity extends to newly attached subtrees.
//! 3. Equal-value writes are suppressed silently at the write boundary.
//! 4. Fields cannot be added or removed after conversion; writes to
//!    unknown fields are rejected, never silently attached non-reactively.
//! 5. Lists are opaque leaves; index/length mutation is not tracked.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::dep::Dep;
use crate::error::{Result, StoreError};
use crate::value::Value;
use crate::watcher::active_watcher;

// ---------------------------------------------------------------------------
// FieldPath — evaluated expression shape
// ---------------------------------------------------------------------------

/// A resolved field path: one top-level field name, or a nested chain for
/// programmatic access. Template expressions only ever produce the
/// single-field form; nested paths exist for embedding code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// Single top-level field. The name is trimmed.
    #[must_use]
    pub fn field(name: impl Into<String>) -> Self {
        let name: String = name.into();
        Self(vec![name.trim().to_string()])
    }

    /// Nested chain of field names, outermost first.
    #[must_use]
    pub fn nested<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for FieldPath {
    fn from(name: &str) -> Self {
        Self::field(name)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

// ---------------------------------------------------------------------------
// Slots
// ---------------------------------------------------------------------------

/// Stored shape of a slot: a leaf value, or a converted nested map.
enum SlotValue {
    Leaf(Value),
    Map(Rc<SlotMap>),
}

impl SlotValue {
    /// Convert a plain value, post-order: children first.
    fn convert(value: Value) -> Self {
        match value {
            Value::Map(fields) => SlotValue::Map(SlotMap::convert(fields)),
            leaf => SlotValue::Leaf(leaf),
        }
    }

    /// Materialize back into a plain value. Direct reads — no
    /// registration happens below the slot being read.
    fn materialize(&self) -> Value {
        match self {
            SlotValue::Leaf(v) => v.clone(),
            SlotValue::Map(map) => Value::Map(
                map.slots
                    .iter()
                    .map(|(name, slot)| (name.clone(), slot.value.borrow().materialize()))
                    .collect(),
            ),
        }
    }
}

/// One intercepted field: accessor pair plus its attached registry.
struct ReactiveSlot {
    dep: Rc<Dep>,
    value: RefCell<SlotValue>,
}

impl ReactiveSlot {
    fn new(value: Value) -> Self {
        Self {
            dep: Rc::new(Dep::new()),
            value: RefCell::new(SlotValue::convert(value)),
        }
    }

    /// Register the marked watcher, if a marked read is in flight.
    fn track(&self) {
        if let Some(watcher) = active_watcher() {
            self.dep.register(&watcher);
        }
    }

    /// Intercepted read: attribute to the marked watcher, return the
    /// current value.
    fn get(&self) -> Value {
        self.track();
        self.value.borrow().materialize()
    }

    /// Intercepted write: no-op on equality, otherwise convert, store,
    /// notify.
    fn set(&self, new: Value) {
        let unchanged = self.value.borrow().materialize() == new;
        if unchanged {
            tracing::trace!(message = "slot.set.suppressed");
            return;
        }
        *self.value.borrow_mut() = SlotValue::convert(new);
        // Borrow released before notify: watcher callbacks may read or
        // write this slot again.
        self.dep.notify();
    }
}

/// Insertion-ordered set of slots for one converted map.
struct SlotMap {
    slots: Vec<(String, ReactiveSlot)>,
}

impl SlotMap {
    fn convert(fields: Vec<(String, Value)>) -> Rc<Self> {
        Rc::new(Self {
            slots: fields
                .into_iter()
                .map(|(name, value)| (name, ReactiveSlot::new(value)))
                .collect(),
        })
    }

    fn slot(&self, name: &str) -> Option<&ReactiveSlot> {
        self.slots
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, slot)| slot)
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Shared handle to a converted reactive object graph.
///
/// Cloning a `Store` clones the handle, not the data.
#[derive(Clone)]
pub struct Store {
    root: Rc<SlotMap>,
}

impl Store {
    /// Convert a plain data map into a reactive store.
    ///
    /// Every field reachable at this moment becomes exactly one slot with
    /// exactly one registry.
    pub fn new(data: Value) -> Result<Self> {
        match data {
            Value::Map(fields) => Ok(Self {
                root: SlotMap::convert(fields),
            }),
            _ => Err(StoreError::RootNotMap),
        }
    }

    /// Read a top-level field (marked-read aware).
    pub fn get(&self, field: &str) -> Result<Value> {
        let field = field.trim();
        self.root
            .slot(field)
            .map(ReactiveSlot::get)
            .ok_or_else(|| StoreError::unknown(field))
    }

    /// Write a top-level field. Equal values are suppressed silently;
    /// unknown fields are rejected (dynamic addition is unsupported).
    pub fn set(&self, field: &str, value: Value) -> Result<()> {
        let field = field.trim();
        let slot = self
            .root
            .slot(field)
            .ok_or_else(|| StoreError::unknown(field))?;
        slot.set(value);
        Ok(())
    }

    /// Read through a nested path. Each slot touched along the path
    /// attributes the read to the marked watcher.
    pub fn get_path(&self, path: &FieldPath) -> Result<Value> {
        let segments = path.segments();
        let (last, parents) = segments.split_last().ok_or(StoreError::EmptyPath)?;

        let mut map = Rc::clone(&self.root);
        for segment in parents {
            let next = {
                let slot = map
                    .slot(segment)
                    .ok_or_else(|| StoreError::unknown(segment))?;
                slot.track();
                match &*slot.value.borrow() {
                    SlotValue::Map(inner) => Rc::clone(inner),
                    SlotValue::Leaf(_) => {
                        return Err(StoreError::NotAMap {
                            field: segment.clone(),
                        });
                    }
                }
            };
            map = next;
        }
        map.slot(last)
            .map(ReactiveSlot::get)
            .ok_or_else(|| StoreError::unknown(last))
    }

    /// Write through a nested path. Parent traversal does not register
    /// (writes are never marked reads).
    pub fn set_path(&self, path: &FieldPath, value: Value) -> Result<()> {
        let segments = path.segments();
        let (last, parents) = segments.split_last().ok_or(StoreError::EmptyPath)?;

        let mut map = Rc::clone(&self.root);
        for segment in parents {
            let next = {
                let slot = map
                    .slot(segment)
                    .ok_or_else(|| StoreError::unknown(segment))?;
                match &*slot.value.borrow() {
                    SlotValue::Map(inner) => Rc::clone(inner),
                    SlotValue::Leaf(_) => {
                        return Err(StoreError::NotAMap {
                            field: segment.clone(),
                        });
                    }
                }
            };
            map = next;
        }
        let slot = map.slot(last).ok_or_else(|| StoreError::unknown(last))?;
        slot.set(value);
        Ok(())
    }

    /// Top-level field names, in insertion order.
    #[must_use]
    pub fn field_names(&self) -> Vec<String> {
        self.root.slots.iter().map(|(k, _)| k.clone()).collect()
    }

    /// Whether a top-level field exists.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.root.slot(field.trim()).is_some()
    }

    /// Materialize the whole store back into a plain value (unmarked).
    #[must_use]
    pub fn snapshot(&self) -> Value {
        Value::Map(
            self.root
                .slots
                .iter()
                .map(|(name, slot)| (name.clone(), slot.value.borrow().materialize()))
                .collect(),
        )
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("fields", &self.field_names())
            .finish()
    }
}
