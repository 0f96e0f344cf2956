#![forbid(unsafe_code)]

//! Template compilation for Weft.
//!
//! This crate turns an annotated node subtree into live bindings against
//! a reactive store:
//!
//! - [`Compiler`]: one-pass tree walk classifying elements and text
//!   nodes and wiring each directive/interpolation match.
//! - [`DirectiveRegistry`]: fixed dispatch table (`model`, `text`, `on`).
//! - [`TextTemplate`]: `{{ expr }}` span parsing with composed rendering.
//! - [`MethodTable`] / [`MethodCtx`]: named event handlers and the
//!   context they execute with.
//!
//! # Invariants
//!
//! 1. Compiling a template with N directive/interpolation occurrences
//!    produces exactly N watchers (event bindings produce none).
//! 2. Unresolved directive, method, or expression names fail compilation
//!    — never a silent no-op binding.
//! 3. The compiler keeps no state beyond the returned
//!    [`BindingScope`](weft_reactive::BindingScope).

pub mod compiler;
pub mod context;
pub mod directive;
pub mod error;
pub mod expr;
pub mod interpolate;
pub mod methods;

pub use compiler::{Compiler, compile};
pub use context::ViewContext;
pub use directive::{DirectiveBinding, DirectiveHandler, DirectiveRegistry};
pub use error::{CompileError, Result};
pub use expr::parse_expr;
pub use interpolate::{Segment, TextTemplate, has_interpolation};
pub use methods::{Method, MethodCtx, MethodTable};
