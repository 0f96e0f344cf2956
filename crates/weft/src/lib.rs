#![forbid(unsafe_code)]

//! Weft public facade.
//!
//! [`App`] orchestrates the engine: it resolves the mount target, builds
//! the reactive store, compiles the template, and exposes top-level data
//! fields for convenient access. Construction order is load-bearing —
//! the store must exist before the compiler runs, because watcher
//! creation performs marked reads against already-intercepted slots.
//!
//! ```ignore
//! use weft::prelude::*;
//!
//! let doc = Document::new(
//!     el("div").attr("id", "app")
//!         .child(el("h1").child(text("{{msg}}")))
//!         .child(el("input").attr("v-model", "name")),
//! );
//! let app = App::mount(
//!     &doc,
//!     AppOptions {
//!         el: MountTarget::Selector("#app".into()),
//!         data: data! { msg: "hi", name: "x" },
//!         methods: MethodTable::new(),
//!     },
//! )?;
//! app.set("msg", Value::Str("hello".into()))?;
//! ```

use thiserror::Error;
use weft_compile::{CompileError, MethodTable, ViewContext, compile};
use weft_dom::{Document, NodeRef};
use weft_reactive::{BindingScope, Store, StoreError, Value};

pub mod prelude {
    pub use weft_compile as compile;
    pub use weft_dom as dom;
    pub use weft_reactive as reactive;

    pub use crate::{App, AppOptions, Error, MountTarget};
    pub use weft_compile::{MethodCtx, MethodTable};
    pub use weft_dom::{Document, Event, NodeRef, el, text};
    pub use weft_reactive::{BindingScope, FieldPath, Store, Value, Watcher, data};
}

pub type Result<T> = std::result::Result<T, Error>;

/// Mount-time and forwarding errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("mount target not found: {selector}")]
    MountNotFound { selector: String },

    #[error("mount target is not an element")]
    MountNotElement,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Compile(#[from] CompileError),
}

/// Where to mount: a node handle, or a selector resolved against the
/// document (`#id` or tag name).
#[derive(Debug, Clone)]
pub enum MountTarget {
    Node(NodeRef),
    Selector(String),
}

/// Initialization input: mount root, data object, method table.
#[derive(Debug)]
pub struct AppOptions {
    pub el: MountTarget,
    pub data: Value,
    pub methods: MethodTable,
}

/// A mounted view: reactive store wired to a compiled subtree.
///
/// Dropping the `App` drops its [`BindingScope`], releasing every
/// binding the compiler created.
#[derive(Debug)]
pub struct App {
    root: NodeRef,
    store: Store,
    scope: BindingScope,
}

impl App {
    /// Build the store, compile the template, return the live view.
    pub fn mount(document: &Document, options: AppOptions) -> Result<Self> {
        let root = match options.el {
            MountTarget::Node(node) => node,
            MountTarget::Selector(selector) => document
                .select(&selector)
                .ok_or(Error::MountNotFound { selector })?,
        };
        if !root.is_element() {
            return Err(Error::MountNotElement);
        }

        // Store before compiler: marked reads must hit intercepted slots.
        let store = Store::new(options.data)?;
        let ctx = ViewContext::new(store.clone(), options.methods);
        let scope = compile(&root, &ctx)?;
        tracing::debug!(message = "app.mounted", watchers = scope.watcher_count());

        Ok(Self { root, store, scope })
    }

    /// Read a top-level data field (mirrors the underlying store).
    pub fn get(&self, field: &str) -> Result<Value> {
        Ok(self.store.get(field)?)
    }

    /// Write a top-level data field (mirrors the underlying store).
    pub fn set(&self, field: &str, value: Value) -> Result<()> {
        Ok(self.store.set(field, value)?)
    }

    #[must_use]
    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// The scope owning every compiled binding.
    #[must_use]
    pub fn scope(&self) -> &BindingScope {
        &self.scope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_dom::{el, text};
    use weft_reactive::data;

    #[test]
    fn mount_by_node_handle() {
        let root = el("div").child(el("h1").child(text("{{msg}}")));
        let doc = Document::new(root.clone());
        let app = App::mount(
            &doc,
            AppOptions {
                el: MountTarget::Node(root),
                data: data! { msg: "hi" },
                methods: MethodTable::new(),
            },
        )
        .unwrap();
        assert_eq!(app.root().text_content(), "hi");
    }

    #[test]
    fn mount_by_missing_selector_fails() {
        let doc = Document::new(el("body"));
        let err = App::mount(
            &doc,
            AppOptions {
                el: MountTarget::Selector("#app".into()),
                data: data! { msg: "hi" },
                methods: MethodTable::new(),
            },
        )
        .unwrap_err();
        assert_eq!(
            err,
            Error::MountNotFound {
                selector: "#app".into()
            }
        );
    }

    #[test]
    fn mount_on_text_node_fails() {
        let doc = Document::new(el("body"));
        let err = App::mount(
            &doc,
            AppOptions {
                el: MountTarget::Node(text("just text")),
                data: data! { msg: "hi" },
                methods: MethodTable::new(),
            },
        )
        .unwrap_err();
        assert_eq!(err, Error::MountNotElement);
    }

    #[test]
    fn facade_forwards_top_level_fields() {
        let root = el("div");
        let doc = Document::new(root.clone());
        let app = App::mount(
            &doc,
            AppOptions {
                el: MountTarget::Node(root),
                data: data! { n: 1 },
                methods: MethodTable::new(),
            },
        )
        .unwrap();

        assert_eq!(app.get("n").unwrap(), Value::Int(1));
        app.set("n", Value::Int(2)).unwrap();
        assert_eq!(app.store().get("n").unwrap(), Value::Int(2));
        assert!(app.get("missing").is_err());
    }

    #[test]
    fn non_map_data_fails_at_mount() {
        let root = el("div");
        let doc = Document::new(root.clone());
        let err = App::mount(
            &doc,
            AppOptions {
                el: MountTarget::Node(root),
                data: Value::Int(1),
                methods: MethodTable::new(),
            },
        )
        .unwrap_err();
        assert_eq!(err, Error::Store(StoreError::RootNotMap));
    }
}
