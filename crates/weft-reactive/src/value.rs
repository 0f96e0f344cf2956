#![forbid(unsafe_code)]

//! Application data vocabulary.
//!
//! [`Value`] is the plain, owner-supplied shape the reactive store converts
//! from and materializes back into. Maps are insertion-ordered so that
//! conversion, materialization, and equality checks are all deterministic.
//!
//! # Invariants
//!
//! 1. `Value::Map` preserves field insertion order.
//! 2. `PartialEq` on `Value` is the single equality notion used for write
//!    suppression and watcher change detection.
//! 3. Lists are opaque leaves: the store never walks into them, and index
//!    or length mutation is not tracked.

use std::fmt;

/// A plain data value: scalar, list (opaque leaf), or nested map.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Opaque leaf. Index/length mutations are not tracked.
    List(Vec<Value>),
    /// Insertion-ordered field map.
    Map(Vec<(String, Value)>),
}

impl Value {
    /// Whether this value is a map (the only shape converted recursively).
    #[must_use]
    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// Look up a field on a map value. `None` for non-maps and misses.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Map(fields) => fields.iter().find(|(k, _)| k == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Borrow the string content, if this is a `Str`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Rendering used for text bindings and control values: scalars render
/// bare, `Null` renders empty, containers render in a compact literal form.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Map(fields) => {
                f.write_str("{")?;
                for (i, (k, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

/// Build a [`Value::Map`] literal.
///
/// Nested maps use braces; scalar values are anything `Value: From`
/// accepts (wrap compound expressions in parentheses).
///
/// # Examples
///
/// ```ignore
/// let data = data! {
///     msg: "hi",
///     count: 3,
///     user: { name: "x" },
/// };
/// ```
#[macro_export]
macro_rules! data {
    ( $( $key:ident : $val:tt ),* $(,)? ) => {
        $crate::Value::Map(vec![
            $( (stringify!($key).to_string(), $crate::data_value!($val)) ),*
        ])
    };
}

/// Helper for [`data!`]: braces recurse, everything else goes through
/// `Value::from`.
#[macro_export]
macro_rules! data_value {
    ({ $($inner:tt)* }) => { $crate::data! { $($inner)* } };
    ($e:expr) => { $crate::Value::from($e) };
}
