#![forbid(unsafe_code)]

//! Template expression grammar.
//!
//! An expression is a trimmed, single top-level field name. Dotted paths
//! and anything with internal whitespace are rejected explicitly rather
//! than silently mis-bound; programmatic nested access goes through
//! [`weft_reactive::FieldPath::nested`] instead.

use weft_reactive::FieldPath;

use crate::error::{CompileError, Result};

/// Parse a template expression into a field path.
pub fn parse_expr(raw: &str) -> Result<FieldPath> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CompileError::unsupported(raw, "empty expression"));
    }
    if trimmed.contains('.') {
        return Err(CompileError::unsupported(
            raw,
            "dotted paths are not supported in template expressions",
        ));
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(CompileError::unsupported(
            raw,
            "expression must be a single field name",
        ));
    }
    Ok(FieldPath::field(trimmed))
}
