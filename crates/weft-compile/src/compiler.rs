#![forbid(unsafe_code)]

//! One-pass template compiler.
//!
//! # Design
//!
//! The compiler walks a node subtree exactly once. Children are detached
//! into an offscreen [`Fragment`] first and re-appended in a single
//! operation after the walk. Every element has its attributes inspected
//! for directive (`v-name` / `v-name:event`) and shorthand event
//! (`@event`) markers; every text node is scanned for interpolation
//! spans; recursion descends into children regardless of the node's own
//! classification.
//!
//! Compilation is transient: the only long-lived output is the returned
//! [`BindingScope`] owning one watcher per binding. Any unresolved
//! directive, method, or expression aborts compilation with an error —
//! there are no silent no-op bindings.

use weft_dom::{Fragment, NodeRef};
use weft_reactive::BindingScope;

use crate::context::ViewContext;
use crate::directive::{DirectiveBinding, DirectiveRegistry};
use crate::error::Result;
use crate::interpolate::{TextTemplate, has_interpolation};

/// Compile `root`'s subtree against `ctx` with the standard directive
/// table. Returns the scope owning all created bindings.
pub fn compile(root: &NodeRef, ctx: &ViewContext) -> Result<BindingScope> {
    Compiler::new(ctx).run(root)
}

/// Template compiler. Holds only transient state: the registry, the
/// context, and the scope being filled.
pub struct Compiler<'ctx> {
    ctx: &'ctx ViewContext,
    registry: DirectiveRegistry,
    scope: BindingScope,
}

impl<'ctx> Compiler<'ctx> {
    #[must_use]
    pub fn new(ctx: &'ctx ViewContext) -> Self {
        Self::with_registry(ctx, DirectiveRegistry::standard())
    }

    /// Use a non-standard directive table (extension point).
    #[must_use]
    pub fn with_registry(ctx: &'ctx ViewContext, registry: DirectiveRegistry) -> Self {
        Self {
            ctx,
            registry,
            scope: BindingScope::new(),
        }
    }

    /// Walk the subtree once and wire every binding.
    ///
    /// The working fragment is re-appended exactly once, even when
    /// compilation fails partway, so the tree is never left empty.
    pub fn run(mut self, root: &NodeRef) -> Result<BindingScope> {
        let fragment = Fragment::detach_children(root);
        let outcome = fragment
            .nodes()
            .iter()
            .try_for_each(|node| self.compile_node(node));
        fragment.append_to(root);
        outcome?;
        tracing::debug!(message = "compile.done", watchers = self.scope.watcher_count());
        Ok(self.scope)
    }

    fn compile_node(&mut self, node: &NodeRef) -> Result<()> {
        if node.is_element() {
            self.compile_element(node)?;
        } else if node.is_text() {
            self.compile_text(node)?;
        }
        // Recurse regardless of the node's own classification:
        // directives and interpolation coexist at any depth.
        for child in node.child_nodes() {
            self.compile_node(&child)?;
        }
        Ok(())
    }

    fn compile_element(&mut self, node: &NodeRef) -> Result<()> {
        for attribute in node.attrs() {
            if let Some(rest) = attribute.name.strip_prefix("v-") {
                let (directive, event) = match rest.split_once(':') {
                    Some((d, e)) => (d, Some(e)),
                    None => (rest, None),
                };
                tracing::debug!(
                    message = "compile.directive",
                    directive,
                    expr = %attribute.value
                );
                let handler = self.registry.lookup(directive)?;
                handler(&mut DirectiveBinding {
                    node,
                    expr: &attribute.value,
                    event,
                    ctx: self.ctx,
                    scope: &mut self.scope,
                })?;
            } else if let Some(event) = attribute.name.strip_prefix('@') {
                tracing::debug!(message = "compile.event_shorthand", event, method = %attribute.value);
                let handler = self.registry.lookup("on")?;
                handler(&mut DirectiveBinding {
                    node,
                    expr: &attribute.value,
                    event: Some(event),
                    ctx: self.ctx,
                    scope: &mut self.scope,
                })?;
            }
        }
        Ok(())
    }

    fn compile_text(&mut self, node: &NodeRef) -> Result<()> {
        let content = node.text_content();
        if !has_interpolation(&content) {
            return Ok(());
        }
        let template = TextTemplate::parse(&content)?;
        crate::directive::bind_text(node, template, self.ctx, &mut self.scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompileError;
    use crate::methods::MethodTable;
    use weft_dom::{el, text};
    use weft_reactive::{Store, Value, data};

    fn ctx(store: &Store) -> ViewContext {
        ViewContext::new(store.clone(), MethodTable::new())
    }

    #[test]
    fn interpolated_text_node_binds() {
        let store = Store::new(data! { msg: "hi" }).unwrap();
        let root = el("div").child(el("h1").child(text("{{msg}}")));
        let scope = compile(&root, &ctx(&store)).unwrap();

        assert_eq!(scope.watcher_count(), 1);
        assert_eq!(root.text_content(), "hi");

        store.set("msg", Value::Str("yo".into())).unwrap();
        assert_eq!(root.text_content(), "yo");
    }

    #[test]
    fn children_are_reattached_exactly_once() {
        let store = Store::new(data! { msg: "hi" }).unwrap();
        let root = el("div").child(el("h1")).child(el("p"));
        let _scope = compile(&root, &ctx(&store)).unwrap();
        assert_eq!(root.child_nodes().len(), 2);
    }

    #[test]
    fn one_watcher_per_binding_across_depths() {
        let store = Store::new(data! { a: 1, b: 2, c: 3 }).unwrap();
        let root = el("div")
            .child(el("p").child(text("{{a}}")))
            .child(
                el("section")
                    .child(el("span").attr("v-text", "b"))
                    .child(el("div").child(el("input").attr("v-model", "c"))),
            );
        let scope = compile(&root, &ctx(&store)).unwrap();
        assert_eq!(scope.watcher_count(), 3);
    }

    #[test]
    fn unknown_directive_fails_fast() {
        let store = Store::new(data! { a: 1 }).unwrap();
        let root = el("div").child(el("span").attr("v-html", "a"));
        let err = compile(&root, &ctx(&store)).unwrap_err();
        assert_eq!(
            err,
            CompileError::UnknownDirective {
                name: "html".into()
            }
        );
    }

    #[test]
    fn unknown_method_fails_fast() {
        let store = Store::new(data! { a: 1 }).unwrap();
        let root = el("div").child(el("button").attr("@click", "nope"));
        let err = compile(&root, &ctx(&store)).unwrap_err();
        assert_eq!(err, CompileError::UnknownMethod { name: "nope".into() });
    }

    #[test]
    fn unknown_field_in_binding_fails_fast() {
        let store = Store::new(data! { a: 1 }).unwrap();
        let root = el("div").child(el("input").attr("v-model", "missing"));
        assert!(compile(&root, &ctx(&store)).is_err());
    }

    #[test]
    fn tree_is_restored_even_on_failure() {
        let store = Store::new(data! { a: 1 }).unwrap();
        let root = el("div").child(el("h1")).child(el("span").attr("v-nope", "a"));
        assert!(compile(&root, &ctx(&store)).is_err());
        assert_eq!(
            root.child_nodes().len(),
            2,
            "children must be re-appended even when compilation fails"
        );
    }

    #[test]
    fn plain_attributes_are_ignored() {
        let store = Store::new(data! { a: 1 }).unwrap();
        let root = el("div").child(el("span").attr("class", "big").attr("id", "s"));
        let scope = compile(&root, &ctx(&store)).unwrap();
        assert!(scope.is_empty());
    }

    #[test]
    fn v_on_and_shorthand_both_dispatch() {
        let store = Store::new(data! { count: 0 }).unwrap();
        let methods = MethodTable::new().with("bump", |ctx, _| {
            let Value::Int(n) = ctx.get("count").unwrap() else {
                panic!("int expected");
            };
            ctx.set("count", Value::Int(n + 1)).unwrap();
        });
        let ctx = ViewContext::new(store.clone(), methods);

        let long_form = el("button").attr("v-on:click", "bump");
        let shorthand = el("button").attr("@click", "bump");
        let root = el("div").child(long_form.clone()).child(shorthand.clone());
        let _scope = compile(&root, &ctx).unwrap();

        long_form.dispatch("click");
        shorthand.dispatch("click");
        assert_eq!(store.get("count").unwrap(), Value::Int(2));
    }

    #[test]
    fn multi_span_text_composes() {
        let store = Store::new(data! { first: "Ada", last: "Lovelace" }).unwrap();
        let root = el("div").child(el("p").child(text("{{first}} {{last}}")));
        let scope = compile(&root, &ctx(&store)).unwrap();

        assert_eq!(scope.watcher_count(), 2);
        assert_eq!(root.text_content(), "Ada Lovelace");

        store.set("last", Value::Str("Byron".into())).unwrap();
        assert_eq!(root.text_content(), "Ada Byron");

        store.set("first", Value::Str("A.".into())).unwrap();
        assert_eq!(root.text_content(), "A. Byron");
    }

    #[test]
    fn directive_and_interpolation_coexist_at_depth() {
        let store = Store::new(data! { title: "t", name: "n" }).unwrap();
        let root = el("div").child(
            el("section")
                .attr("v-text", "title")
                .child(text("{{name}}")),
        );
        // v-text's initial render replaces the section's children before
        // recursion reaches them; the rendered text has no spans left.
        let scope = compile(&root, &ctx(&store)).unwrap();
        assert_eq!(scope.watcher_count(), 1);
        assert_eq!(root.text_content(), "t");
    }
}
