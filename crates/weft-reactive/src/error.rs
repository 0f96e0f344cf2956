#![forbid(unsafe_code)]

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors from reactive store construction and field access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("root data must be a map")]
    RootNotMap,

    #[error("unknown field: {field}")]
    UnknownField { field: String },

    #[error("field is not a map: {field}")]
    NotAMap { field: String },

    #[error("empty field path")]
    EmptyPath,
}

impl StoreError {
    #[must_use]
    pub fn unknown(field: impl Into<String>) -> Self {
        Self::UnknownField {
            field: field.into(),
        }
    }
}
