//! # Array Schemas
//!
//! A single element schema applied to every member of an input array. The
//! element compiles under the `'*'` wildcard field name and consumes its
//! ref ids before any array-level registration.

use std::sync::Arc;

use serde_json::Value;

use trellis_core::{ArrayNode, CompilerNode, IntoValidation, RefsStore};

use crate::fields::{property_name, BaseField};
use crate::schema_type::{CompileOptions, SchemaType};

/// A schema validating every element of an array against one schema.
#[derive(Clone)]
pub struct ArrayType {
    base: BaseField,
    each: Box<dyn SchemaType>,
}

impl ArrayType {
    pub fn new(each: impl SchemaType + 'static) -> Self {
        Self {
            base: BaseField::new(),
            each: Box::new(each),
        }
    }

    /// Attach a validation rule to the array itself.
    pub fn use_rule(mut self, validation: impl IntoValidation) -> Self {
        self.base.push(validation);
        self
    }

    /// Mutate the raw input before any validation runs.
    pub fn parse(mut self, callback: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        self.base.set_parse(Arc::new(callback));
        self
    }

    /// Control fail-fast behavior for the array's own validations.
    pub fn bail(mut self, state: bool) -> Self {
        self.base.set_bail(state);
        self
    }
}

impl SchemaType for ArrayType {
    fn compile(
        &self,
        field_name: &str,
        refs: &mut RefsStore,
        options: &CompileOptions,
    ) -> CompilerNode {
        let each = Box::new(self.each.compile("*", refs, options));
        let parse_fn_id = self.base.track_parse(refs);
        let validations = self.base.compile_validations(refs);

        CompilerNode::Array(ArrayNode {
            field_name: field_name.to_string(),
            property_name: property_name(field_name, options),
            bail: self.base.options.bail,
            allow_null: false,
            is_optional: false,
            parse_fn_id,
            validations,
            each,
        })
    }

    fn clone_schema(&self) -> Box<dyn SchemaType> {
        Box::new(self.clone())
    }
}
