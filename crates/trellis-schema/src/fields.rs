//! # Shared Field Plumbing
//!
//! Every field type owns the same two pieces of mutable builder state: its
//! options (bail mode, nullability/optionality flags, an optional parse
//! callback) and an ordered validation list. [`BaseField`] centralizes that
//! state together with the compile-time bookkeeping: registering the parse
//! function and each validation's rule + options pair into the reference
//! store, in the canonical order (parse function, then validations, then
//! the output transform for literal nodes).

use trellis_core::{
    to_camel_case, CompilerNode, IntoValidation, LiteralNode, LiteralSubtype, ParseFn, RefId,
    RefsStore, TransformFn, Validation, ValidationNode,
};

use crate::schema_type::CompileOptions;

/// Options owned by every field type.
#[derive(Clone)]
pub(crate) struct FieldOptions {
    /// Stop running this field's validations after the first failure.
    pub bail: bool,
    /// Accept `null` for this field.
    pub allow_null: bool,
    /// Accept a missing value for this field.
    pub is_optional: bool,
    /// Pre-validation input transform, registered as `parseFnId`.
    pub parse: Option<ParseFn>,
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            bail: true,
            allow_null: false,
            is_optional: false,
            parse: None,
        }
    }
}

impl std::fmt::Debug for FieldOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldOptions")
            .field("bail", &self.bail)
            .field("allow_null", &self.allow_null)
            .field("is_optional", &self.is_optional)
            .field("parse", &self.parse.is_some())
            .finish()
    }
}

/// The state and compile bookkeeping shared by every field type.
#[derive(Debug, Clone, Default)]
pub(crate) struct BaseField {
    pub(crate) options: FieldOptions,
    pub(crate) validations: Vec<Validation>,
}

impl BaseField {
    /// A field with no built-in validations.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A field seeded with its built-in type-check validations.
    pub(crate) fn with_rules(validations: Vec<Validation>) -> Self {
        Self {
            options: FieldOptions::default(),
            validations,
        }
    }

    /// Append a validation to the chain.
    pub(crate) fn push(&mut self, validation: impl IntoValidation) {
        self.validations.push(validation.into_validation());
    }

    /// Store the pre-validation parse callback.
    pub(crate) fn set_parse(&mut self, parse: ParseFn) {
        self.options.parse = Some(parse);
    }

    /// Toggle fail-fast-per-field behavior.
    pub(crate) fn set_bail(&mut self, state: bool) {
        self.options.bail = state;
    }

    /// Register the parse callback, when set.
    pub(crate) fn track_parse(&self, refs: &mut RefsStore) -> Option<RefId> {
        self.options
            .parse
            .as_ref()
            .map(|parse| refs.track_parser(parse.clone()))
    }

    /// Register every validation's rule + options pair, in order.
    pub(crate) fn compile_validations(&self, refs: &mut RefsStore) -> Vec<ValidationNode> {
        self.validations
            .iter()
            .map(|validation| ValidationNode {
                implicit: validation.rule.implicit,
                is_async: validation.rule.is_async,
                rule_fn_id: refs.track_validation(validation.clone()),
            })
            .collect()
    }

    /// Compile a leaf field into a literal node.
    pub(crate) fn compile_literal(
        &self,
        subtype: LiteralSubtype,
        transform: Option<&TransformFn>,
        field_name: &str,
        refs: &mut RefsStore,
        options: &CompileOptions,
    ) -> CompilerNode {
        let parse_fn_id = self.track_parse(refs);
        let validations = self.compile_validations(refs);
        let transform_fn_id = transform.map(|t| refs.track_transformer(t.clone()));

        CompilerNode::Literal(LiteralNode {
            subtype,
            field_name: field_name.to_string(),
            property_name: property_name(field_name, options),
            bail: self.options.bail,
            allow_null: self.options.allow_null,
            is_optional: self.options.is_optional,
            parse_fn_id,
            validations,
            transform_fn_id,
        })
    }
}

/// The property name for a field under the given compile options.
pub(crate) fn property_name(field_name: &str, options: &CompileOptions) -> String {
    if options.to_camel_case {
        to_camel_case(field_name)
    } else {
        field_name.to_string()
    }
}
