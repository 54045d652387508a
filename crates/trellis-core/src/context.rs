//! # Field Context and Value Helpers
//!
//! The runtime context handed to predicates and validators, plus the small
//! value helpers the conditionally-required rules are built from. The
//! compiler itself never constructs a context; these types exist so the
//! closures registered into the reference store have a concrete contract
//! with the downstream interpreter.

use serde_json::Value;

/// The context of the field under validation.
#[derive(Debug, Clone)]
pub struct FieldContext {
    /// Current value of the field.
    pub value: Value,
    /// The root input document.
    pub data: Value,
    /// Value of the object enclosing this field. For root-level fields this
    /// is the same as `data`.
    pub parent: Value,
    /// The field's name as supplied by the caller.
    pub field_name: String,
}

impl FieldContext {
    /// Build a context for a root-level field, where the parent is the
    /// document itself.
    pub fn root(field_name: impl Into<String>, value: Value, data: Value) -> Self {
        Self {
            value,
            parent: data.clone(),
            data,
            field_name: field_name.into(),
        }
    }
}

/// A value exists when it resolved to something other than `null`.
pub fn exists(value: Option<&Value>) -> bool {
    matches!(value, Some(v) if !v.is_null())
}

/// Inverse of [`exists`].
pub fn is_missing(value: Option<&Value>) -> bool {
    !exists(value)
}

/// Resolve a sibling field by path.
///
/// Bare keys resolve against the enclosing object (`ctx.parent`); dotted
/// paths walk the root document (`ctx.data`) segment by segment. Segments
/// index into arrays when the value under traversal is one (`contacts.0.email`),
/// and key objects otherwise. Returns `None` when any segment is absent or
/// a scalar is traversed.
pub fn nested_lookup<'a>(path: &str, ctx: &'a FieldContext) -> Option<&'a Value> {
    if !path.contains('.') {
        return ctx.parent.get(path);
    }

    let mut current = &ctx.data;
    for segment in path.split('.') {
        current = match current {
            Value::Array(items) => {
                let index: usize = segment.parse().ok()?;
                items.get(index)?
            }
            other => other.get(segment)?,
        };
    }
    Some(current)
}
