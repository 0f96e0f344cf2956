#![forbid(unsafe_code)]

//! View-model method table and execution context.
//!
//! Event-binding directives look handlers up here by name at compile
//! time (a miss is a configuration error). Handlers run with a
//! [`MethodCtx`] — the Rust rendition of binding the function to the
//! view model: it exposes store access as the handler's `self`.

use std::rc::Rc;

use ahash::AHashMap;
use weft_dom::Event;
use weft_reactive::{Store, StoreError, Value};

/// Execution context passed to every method invocation.
#[derive(Debug, Clone)]
pub struct MethodCtx {
    store: Store,
}

impl MethodCtx {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn get(&self, field: &str) -> Result<Value, StoreError> {
        self.store.get(field)
    }

    pub fn set(&self, field: &str, value: Value) -> Result<(), StoreError> {
        self.store.set(field, value)
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }
}

/// A named view-model method.
pub type Method = Rc<dyn Fn(&MethodCtx, &Event)>;

/// Mapping from method name to handler.
#[derive(Default, Clone)]
pub struct MethodTable {
    methods: AHashMap<String, Method>,
}

impl MethodTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. Later registrations shadow earlier ones.
    pub fn register(&mut self, name: impl Into<String>, f: impl Fn(&MethodCtx, &Event) + 'static) {
        self.methods.insert(name.into(), Rc::new(f));
    }

    /// Builder form of [`register`](Self::register).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, f: impl Fn(&MethodCtx, &Event) + 'static) -> Self {
        self.register(name, f);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Method> {
        self.methods.get(name).map(Rc::clone)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl std::fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodTable")
            .field("len", &self.methods.len())
            .finish()
    }
}
