#![forbid(unsafe_code)]

use thiserror::Error;
use weft_reactive::StoreError;

pub type Result<T> = std::result::Result<T, CompileError>;

/// Configuration errors, raised at compile time. None of these degrade to
/// a silent no-op binding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("unknown directive: v-{name}")]
    UnknownDirective { name: String },

    #[error("unknown method: {name}")]
    UnknownMethod { name: String },

    #[error("unsupported expression {expr:?}: {reason}")]
    UnsupportedExpression { expr: String, reason: &'static str },

    #[error("directive v-{name} requires an event qualifier (v-{name}:event)")]
    MissingEventQualifier { name: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CompileError {
    #[must_use]
    pub fn unsupported(expr: impl Into<String>, reason: &'static str) -> Self {
        Self::UnsupportedExpression {
            expr: expr.into(),
            reason,
        }
    }
}
