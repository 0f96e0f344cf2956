#![forbid(unsafe_code)]

//! Compilation context: the view the compiler binds against.

use weft_reactive::Store;

use crate::methods::{MethodCtx, MethodTable};

/// Everything a directive needs from the view model: the reactive store
/// and the method table. Cheap to clone (shared handles).
#[derive(Debug, Clone)]
pub struct ViewContext {
    store: Store,
    methods: MethodTable,
}

impl ViewContext {
    #[must_use]
    pub fn new(store: Store, methods: MethodTable) -> Self {
        Self { store, methods }
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    #[must_use]
    pub fn methods(&self) -> &MethodTable {
        &self.methods
    }

    /// Execution context handed to method invocations.
    #[must_use]
    pub fn method_ctx(&self) -> MethodCtx {
        MethodCtx::new(self.store.clone())
    }
}
