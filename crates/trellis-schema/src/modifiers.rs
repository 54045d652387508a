//! # Nullability and Optionality Modifiers
//!
//! Wrappers that take exclusive ownership of a schema and flip exactly one
//! flag on its compiled node. Union nodes carry no flags, so applying a
//! modifier to a union compiles the union unchanged and registers nothing
//! extra into the reference store.
//!
//! [`OptionalModifier`] additionally owns the conditionally-required rule
//! family: implicit validations appended after everything the wrapped
//! schema registered, so their ref ids always follow the subtree's.

use std::sync::Arc;

use trellis_core::{
    exists, is_missing, nested_lookup, CompilerNode, ConditionalFn, RefsStore, Validation,
};

use crate::rules::{required_when, Comparison};
use crate::schema_type::{CompileOptions, SchemaType};

/// Marks the wrapped field as accepting `null`. The null is written to the
/// validated output.
#[derive(Clone)]
pub struct NullableModifier {
    schema: Box<dyn SchemaType>,
}

impl NullableModifier {
    pub fn new(schema: Box<dyn SchemaType>) -> Self {
        Self { schema }
    }
}

impl SchemaType for NullableModifier {
    fn compile(
        &self,
        field_name: &str,
        refs: &mut RefsStore,
        options: &CompileOptions,
    ) -> CompilerNode {
        let mut node = self.schema.compile(field_name, refs, options);
        node.set_allow_null();
        node
    }

    fn clone_schema(&self) -> Box<dyn SchemaType> {
        Box::new(self.clone())
    }
}

/// Marks the wrapped field as allowed to be missing, with an optional set
/// of conditions under which it becomes required again.
#[derive(Clone)]
pub struct OptionalModifier {
    schema: Box<dyn SchemaType>,
    validations: Vec<Validation>,
}

impl OptionalModifier {
    pub fn new(schema: Box<dyn SchemaType>) -> Self {
        Self {
            schema,
            validations: Vec::new(),
        }
    }

    /// Require the field when a sibling field's value satisfies the
    /// comparison. Bare keys resolve against the enclosing object; dotted
    /// paths walk the root document.
    pub fn required_when(mut self, field: impl Into<String>, comparison: Comparison) -> Self {
        let field = field.into();
        let predicate: ConditionalFn =
            Arc::new(move |_, ctx| comparison.matches(nested_lookup(&field, ctx)));
        self.validations.push(required_when(predicate));
        self
    }

    /// Require the field when a caller-supplied predicate holds.
    pub fn required_when_predicate(
        mut self,
        predicate: impl Fn(&serde_json::Value, &trellis_core::FieldContext) -> bool
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.validations.push(required_when(Arc::new(predicate)));
        self
    }

    /// Require the field when every listed sibling field exists.
    pub fn required_if_exists(self, fields: &[&str]) -> Self {
        let fields = owned(fields);
        self.required_when_predicate(move |_, ctx| {
            fields.iter().all(|f| exists(nested_lookup(f, ctx)))
        })
    }

    /// Require the field when any listed sibling field exists.
    pub fn required_if_any_exists(self, fields: &[&str]) -> Self {
        let fields = owned(fields);
        self.required_when_predicate(move |_, ctx| {
            fields.iter().any(|f| exists(nested_lookup(f, ctx)))
        })
    }

    /// Require the field when every listed sibling field is missing.
    pub fn required_if_missing(self, fields: &[&str]) -> Self {
        let fields = owned(fields);
        self.required_when_predicate(move |_, ctx| {
            fields.iter().all(|f| is_missing(nested_lookup(f, ctx)))
        })
    }

    /// Require the field when any listed sibling field is missing.
    pub fn required_if_any_missing(self, fields: &[&str]) -> Self {
        let fields = owned(fields);
        self.required_when_predicate(move |_, ctx| {
            fields.iter().any(|f| is_missing(nested_lookup(f, ctx)))
        })
    }
}

fn owned(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|f| f.to_string()).collect()
}

impl SchemaType for OptionalModifier {
    fn compile(
        &self,
        field_name: &str,
        refs: &mut RefsStore,
        options: &CompileOptions,
    ) -> CompilerNode {
        let mut node = self.schema.compile(field_name, refs, options);
        if matches!(node, CompilerNode::Union(_)) {
            return node;
        }
        node.set_is_optional();
        let conditional = self
            .validations
            .iter()
            .map(|validation| trellis_core::ValidationNode {
                implicit: validation.rule.implicit,
                is_async: validation.rule.is_async,
                rule_fn_id: refs.track_validation(validation.clone()),
            })
            .collect();
        node.append_validations(conditional);
        node
    }

    fn clone_schema(&self) -> Box<dyn SchemaType> {
        Box::new(self.clone())
    }
}
