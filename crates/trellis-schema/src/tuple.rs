//! # Tuple Schemas
//!
//! A fixed-arity array where every position has its own schema. Elements
//! compile with their index as the field name, in order, before any
//! tuple-level registration.

use std::sync::Arc;

use serde_json::Value;

use trellis_core::{CompilerNode, IntoValidation, RefsStore, TupleNode};

use crate::fields::{property_name, BaseField};
use crate::schema_type::{CompileOptions, SchemaType};

/// A schema for a fixed-length array with per-position schemas.
#[derive(Clone, Default)]
pub struct TupleType {
    base: BaseField,
    elements: Vec<Box<dyn SchemaType>>,
    allow_unknown_properties: bool,
}

impl TupleType {
    pub fn new(elements: Vec<Box<dyn SchemaType>>) -> Self {
        Self {
            base: BaseField::new(),
            elements,
            allow_unknown_properties: false,
        }
    }

    /// Carry input elements past the declared arity through to the output.
    pub fn allow_unknown_properties(mut self) -> Self {
        self.allow_unknown_properties = true;
        self
    }

    /// Attach a validation rule to the tuple itself.
    pub fn use_rule(mut self, validation: impl IntoValidation) -> Self {
        self.base.push(validation);
        self
    }

    /// Mutate the raw input before any validation runs.
    pub fn parse(mut self, callback: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        self.base.set_parse(Arc::new(callback));
        self
    }

    /// Control fail-fast behavior for the tuple's own validations.
    pub fn bail(mut self, state: bool) -> Self {
        self.base.set_bail(state);
        self
    }
}

impl SchemaType for TupleType {
    fn compile(
        &self,
        field_name: &str,
        refs: &mut RefsStore,
        options: &CompileOptions,
    ) -> CompilerNode {
        let elements = self
            .elements
            .iter()
            .enumerate()
            .map(|(index, schema)| schema.compile(&index.to_string(), refs, options))
            .collect();
        let parse_fn_id = self.base.track_parse(refs);
        let validations = self.base.compile_validations(refs);

        CompilerNode::Tuple(TupleNode {
            field_name: field_name.to_string(),
            property_name: property_name(field_name, options),
            bail: self.base.options.bail,
            allow_null: false,
            is_optional: false,
            allow_unknown_properties: self.allow_unknown_properties,
            parse_fn_id,
            validations,
            elements,
        })
    }

    fn clone_schema(&self) -> Box<dyn SchemaType> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literals::{NumberType, StringType};
    use crate::schema_type::SchemaExt;

    #[test]
    fn elements_compile_with_index_as_field_name() {
        let schema = TupleType::new(vec![StringType::new().boxed(), NumberType::new().boxed()]);
        let mut refs = RefsStore::new();
        let node = schema
            .compile("pair", &mut refs, &CompileOptions::default())
            .to_value();

        assert_eq!(node["type"], "tuple");
        let elements = node["elements"].as_array().unwrap();
        assert_eq!(elements[0]["fieldName"], "0");
        assert_eq!(elements[1]["fieldName"], "1");
        assert_eq!(elements[0]["validations"][0]["ruleFnId"], "ref://1");
        assert_eq!(elements[1]["validations"][0]["ruleFnId"], "ref://2");
        assert_eq!(node["allowUnknownProperties"], false);
    }
}
