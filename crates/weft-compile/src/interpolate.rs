#![forbid(unsafe_code)]

//! `{{ expr }}` interpolation spans and composed text rendering.
//!
//! A text node (or a `v-text` attribute value) is parsed into an
//! alternating list of literal and field segments. Every field span gets
//! its own watcher; each watcher's callback re-renders the *whole*
//! segment list from current store values, so multiple spans in one text
//! node compose instead of clobbering each other.

use std::sync::LazyLock;

use regex::Regex;
use weft_reactive::{FieldPath, Store, StoreError};

use crate::error::Result;
use crate::expr::parse_expr;

static SPAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(.+?)\}\}").expect("valid literal pattern"));

/// Whether `content` contains at least one interpolation span.
#[must_use]
pub fn has_interpolation(content: &str) -> bool {
    SPAN_RE.is_match(content)
}

/// One piece of a parsed text: literal bytes or a bound field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Field(FieldPath),
}

/// Parsed text with zero or more bound fields, renderable against a
/// store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextTemplate {
    segments: Vec<Segment>,
}

impl TextTemplate {
    /// Parse interpolation spans out of `content`. Expressions inside
    /// spans follow the template expression grammar (trimmed single
    /// field name; dotted paths rejected).
    pub fn parse(content: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut cursor = 0;
        for captures in SPAN_RE.captures_iter(content) {
            let span = captures.get(0).expect("group 0 always present");
            if span.start() > cursor {
                segments.push(Segment::Literal(content[cursor..span.start()].to_string()));
            }
            let expr = captures.get(1).expect("pattern has one capture group");
            segments.push(Segment::Field(parse_expr(expr.as_str())?));
            cursor = span.end();
        }
        if cursor < content.len() {
            segments.push(Segment::Literal(content[cursor..].to_string()));
        }
        Ok(Self { segments })
    }

    /// A template that renders one field's whole value (the
    /// `v-text="field"` plain form).
    #[must_use]
    pub fn whole_field(path: FieldPath) -> Self {
        Self {
            segments: vec![Segment::Field(path)],
        }
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Bound field paths, one per span, in document order. Duplicates
    /// are preserved: each span is an independent binding.
    #[must_use]
    pub fn field_paths(&self) -> Vec<FieldPath> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Field(path) => Some(path.clone()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Render against current store values (unmarked reads).
    pub fn render(&self, store: &Store) -> std::result::Result<String, StoreError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => out.push_str(s),
                Segment::Field(path) => out.push_str(&store.get_path(path)?.to_string()),
            }
        }
        Ok(out)
    }
}
