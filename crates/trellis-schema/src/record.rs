//! # Record Schemas
//!
//! Objects with arbitrary string keys and one uniform value schema. The
//! value schema compiles under the `'*'` wildcard field name since the key
//! set is unknown until validation time; record-level rules (key counts,
//! key-set validation) register after the value subtree.

use std::sync::Arc;

use serde_json::Value;

use trellis_core::{CompilerNode, FieldContext, IntoValidation, RecordNode, RefsStore};

use crate::fields::{property_name, BaseField};
use crate::rules::{record_fixed_length, record_max_length, record_min_length, validate_keys_rule};
use crate::schema_type::{CompileOptions, SchemaType};

/// A schema for an object with unknown keys and one value schema.
#[derive(Clone)]
pub struct RecordType {
    base: BaseField,
    each: Box<dyn SchemaType>,
}

impl RecordType {
    pub fn new(each: impl SchemaType + 'static) -> Self {
        Self {
            base: BaseField::new(),
            each: Box::new(each),
        }
    }

    /// Require at least `min` keys.
    pub fn min_length(mut self, min: usize) -> Self {
        self.base.push(record_min_length(min));
        self
    }

    /// Require at most `max` keys.
    pub fn max_length(mut self, max: usize) -> Self {
        self.base.push(record_max_length(max));
        self
    }

    /// Require exactly `size` keys.
    pub fn fixed_length(mut self, size: usize) -> Self {
        self.base.push(record_fixed_length(size));
        self
    }

    /// Validate the realized key set with a callback.
    pub fn validate_keys(
        mut self,
        callback: impl Fn(&[String], &FieldContext) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.base.push(validate_keys_rule(callback));
        self
    }

    /// Attach a validation rule to the record itself.
    pub fn use_rule(mut self, validation: impl IntoValidation) -> Self {
        self.base.push(validation);
        self
    }

    /// Mutate the raw input before any validation runs.
    pub fn parse(mut self, callback: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        self.base.set_parse(Arc::new(callback));
        self
    }

    /// Control fail-fast behavior for the record's own validations.
    pub fn bail(mut self, state: bool) -> Self {
        self.base.set_bail(state);
        self
    }
}

impl SchemaType for RecordType {
    fn compile(
        &self,
        field_name: &str,
        refs: &mut RefsStore,
        options: &CompileOptions,
    ) -> CompilerNode {
        let each = Box::new(self.each.compile("*", refs, options));
        let parse_fn_id = self.base.track_parse(refs);
        let validations = self.base.compile_validations(refs);

        CompilerNode::Record(RecordNode {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literals::NumberType;
    use serde_json::json;

    #[test]
    fn value_schema_consumes_ids_before_record_rules() {
        let schema = RecordType::new(NumberType::new()).min_length(1).max_length(5);
        let mut refs = RefsStore::new();
        let node = schema
            .compile("scores", &mut refs, &CompileOptions::default())
            .to_value();

        assert_eq!(node["type"], "record");
        assert_eq!(node["each"]["fieldName"], "*");
        assert_eq!(node["each"]["validations"][0]["ruleFnId"], "ref://1");
        let validations = node["validations"].as_array().unwrap();
        assert_eq!(validations[0]["ruleFnId"], "ref://2");
        assert_eq!(validations[1]["ruleFnId"], "ref://3");
        assert_eq!(refs.len(), 3);
    }

    #[test]
    fn validate_keys_registers_one_rule() {
        let schema = RecordType::new(NumberType::new())
            .validate_keys(|keys, _| keys.iter().all(|k| k.len() <= 8));
        let mut refs = RefsStore::new();
        let node = schema
            .compile("scores", &mut refs, &CompileOptions::default())
            .to_value();
        assert_eq!(node["validations"].as_array().unwrap().len(), 1);
        assert_eq!(node["validations"][0]["implicit"], json!(false));
    }
}
