#![forbid(unsafe_code)]

//! Directive dispatch table.
//!
//! # Design
//!
//! A fixed mapping from directive name to a setup routine. Every routine
//! follows the same shape: establish the initial DOM state from current
//! data, create watcher(s) for future data→DOM sync, and optionally
//! attach a reverse event listener for DOM→data sync. Directive lookup
//! misses are configuration errors — the compiler fails fast rather than
//! leaving a dead binding in the tree.
//!
//! # Invariants
//!
//! 1. `model`'s reverse write is self-consistent: the input listener's
//!    store write re-enters the setter, `notify` reaches this directive's
//!    own watcher, and the watcher's old-value cache suppresses a second
//!    DOM write. No cycle guard is needed beyond that suppression.
//! 2. `on` creates no watcher; the event path is imperative and
//!    one-directional.

use std::rc::Rc;

use ahash::AHashMap;
use weft_dom::NodeRef;
use weft_reactive::{BindingScope, Value};

use crate::context::ViewContext;
use crate::error::{CompileError, Result};
use crate::expr::parse_expr;
use crate::interpolate::{TextTemplate, has_interpolation};

/// One directive occurrence being wired: the node, the raw attribute
/// value, the optional `:event` qualifier, and the compile state.
pub struct DirectiveBinding<'a> {
    pub node: &'a NodeRef,
    pub expr: &'a str,
    pub event: Option<&'a str>,
    pub ctx: &'a ViewContext,
    pub scope: &'a mut BindingScope,
}

/// Setup routine for one directive kind.
pub type DirectiveHandler = fn(&mut DirectiveBinding<'_>) -> Result<()>;

/// Fixed name → handler mapping.
pub struct DirectiveRegistry {
    handlers: AHashMap<&'static str, DirectiveHandler>,
}

impl DirectiveRegistry {
    /// The standard table: `model`, `text`, `on`.
    #[must_use]
    pub fn standard() -> Self {
        let mut handlers: AHashMap<&'static str, DirectiveHandler> = AHashMap::new();
        handlers.insert("model", model);
        handlers.insert("text", text);
        handlers.insert("on", on);
        Self { handlers }
    }

    /// Look a directive up by name. A miss is a configuration error.
    pub fn lookup(&self, name: &str) -> Result<DirectiveHandler> {
        self.handlers
            .get(name)
            .copied()
            .ok_or_else(|| CompileError::UnknownDirective {
                name: name.to_string(),
            })
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }
}

impl std::fmt::Debug for DirectiveRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        f.debug_struct("DirectiveRegistry")
            .field("directives", &names)
            .finish()
    }
}

/// Two-way value binding (`v-model="field"`).
fn model(binding: &mut DirectiveBinding<'_>) -> Result<()> {
    let path = parse_expr(binding.expr)?;
    let store = binding.ctx.store().clone();

    // Data → DOM. The marked read here registers the watcher.
    let node = binding.node.clone();
    binding
        .scope
        .watch(&store, path.clone(), move |value| {
            node.set_control_value(value.to_string());
        })?;

    // Initial DOM state from current data.
    binding
        .node
        .set_control_value(store.get_path(&path)?.to_string());

    // DOM → data: closes the loop through the store setter.
    let reverse_store = store.clone();
    let reverse_path = path;
    binding.node.add_event_listener("input", move |event| {
        let value = Value::Str(event.target().control_value());
        if let Err(err) = reverse_store.set_path(&reverse_path, value) {
            // The field existed at compile time; this only fires if an
            // ancestor map was later replaced without it.
            tracing::warn!(message = "model.reverse_write_failed", %err);
        }
    });
    Ok(())
}

/// One-way text binding (`v-text="field"` or interpolation syntax in the
/// attribute value).
fn text(binding: &mut DirectiveBinding<'_>) -> Result<()> {
    let template = if has_interpolation(binding.expr) {
        TextTemplate::parse(binding.expr)?
    } else {
        TextTemplate::whole_field(parse_expr(binding.expr)?)
    };
    bind_text(binding.node, template, binding.ctx, binding.scope)
}

/// Event binding (`v-on:event="method"` or `@event="method"`). No
/// watcher: imperative, one-directional.
fn on(binding: &mut DirectiveBinding<'_>) -> Result<()> {
    let event = binding
        .event
        .ok_or_else(|| CompileError::MissingEventQualifier {
            name: "on".to_string(),
        })?;
    let name = binding.expr.trim();
    let method = binding
        .ctx
        .methods()
        .get(name)
        .ok_or_else(|| CompileError::UnknownMethod {
            name: name.to_string(),
        })?;

    let method_ctx = binding.ctx.method_ctx();
    binding
        .node
        .add_event_listener(event, move |ev| method(&method_ctx, ev));
    Ok(())
}

/// Wire a text template to a node: one watcher per bound span, each
/// re-rendering the composed template, then one initial render.
pub(crate) fn bind_text(
    node: &NodeRef,
    template: TextTemplate,
    ctx: &ViewContext,
    scope: &mut BindingScope,
) -> Result<()> {
    let template = Rc::new(template);
    let store = ctx.store().clone();

    for path in template.field_paths() {
        let node = node.clone();
        let template = Rc::clone(&template);
        let render_store = store.clone();
        scope.watch(&store, path, move |_| {
            match template.render(&render_store) {
                Ok(rendered) => node.set_text_content(rendered),
                Err(err) => tracing::warn!(message = "text.render_failed", %err),
            }
        })?;
    }

    node.set_text_content(template.render(&store)?);
    Ok(())
}
