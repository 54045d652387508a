//! # Leaf Field Types
//!
//! The eight leaf builders that compile to `literal` nodes. Each is the
//! same machine — [`BaseField`] state plus an optional output transform —
//! differing only in its node subtype and the built-in validation it seeds
//! itself with (`AnyType` seeds none).

use std::sync::Arc;

use serde_json::Value;

use trellis_core::{CompilerNode, IntoValidation, LiteralSubtype, RefsStore, TransformFn};

use crate::fields::BaseField;
use crate::rules::{boolean_rule, date_rule, enum_rule, literal_rule, number_rule, string_rule};
use crate::schema_type::{CompileOptions, SchemaType};

macro_rules! literal_type {
    ($(#[$doc:meta])* $name:ident, $subtype:expr) => {
        $(#[$doc])*
        #[derive(Clone)]
        pub struct $name {
            base: BaseField,
            transform: Option<TransformFn>,
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("base", &self.base)
                    .field("transform", &self.transform.is_some())
                    .finish()
            }
        }

        impl $name {
            /// Attach a validation rule. Rules run in attachment order,
            /// after the built-in check.
            pub fn use_rule(mut self, validation: impl IntoValidation) -> Self {
                self.base.push(validation);
                self
            }

            /// Mutate the raw input before any validation runs.
            pub fn parse(
                mut self,
                callback: impl Fn(Value) -> Value + Send + Sync + 'static,
            ) -> Self {
                self.base.set_parse(Arc::new(callback));
                self
            }

            /// Control fail-fast behavior for this field's validations.
            pub fn bail(mut self, state: bool) -> Self {
                self.base.set_bail(state);
                self
            }

            /// Mutate the output value after validation passes.
            pub fn transform(
                mut self,
                callback: impl Fn(Value) -> Value + Send + Sync + 'static,
            ) -> Self {
                self.transform = Some(Arc::new(callback));
                self
            }
        }

        impl SchemaType for $name {
            fn compile(
                &self,
                field_name: &str,
                refs: &mut RefsStore,
                options: &CompileOptions,
            ) -> CompilerNode {
                self.base.compile_literal(
                    $subtype,
                    self.transform.as_ref(),
                    field_name,
                    refs,
                    options,
                )
            }

            fn clone_schema(&self) -> Box<dyn SchemaType> {
                Box::new(self.clone())
            }
        }
    };
}

literal_type! {
    /// A string field, seeded with the string type check.
    StringType, LiteralSubtype::String
}

literal_type! {
    /// A number field, seeded with the number type check.
    NumberType, LiteralSubtype::Number
}

literal_type! {
    /// A boolean field, seeded with the boolean type check.
    BooleanType, LiteralSubtype::Boolean
}

literal_type! {
    /// A date field, seeded with the date structural check.
    DateType, LiteralSubtype::Date
}

literal_type! {
    /// A field that accepts anything. No built-in validation.
    AnyType, LiteralSubtype::Any
}

literal_type! {
    /// A field that must equal a fixed value.
    LiteralType, LiteralSubtype::Literal
}

literal_type! {
    /// A field whose value must be one of a closed set of members.
    EnumType, LiteralSubtype::Enum
}

literal_type! {
    /// A field validated by a caller-supplied rule.
    CustomType, LiteralSubtype::Custom
}

impl StringType {
    pub fn new() -> Self {
        Self {
            base: BaseField::with_rules(vec![string_rule()]),
            transform: None,
        }
    }
}

impl NumberType {
    pub fn new() -> Self {
        Self {
            base: BaseField::with_rules(vec![number_rule()]),
            transform: None,
        }
    }
}

impl BooleanType {
    pub fn new() -> Self {
        Self {
            base: BaseField::with_rules(vec![boolean_rule()]),
            transform: None,
        }
    }
}

impl DateType {
    pub fn new() -> Self {
        Self {
            base: BaseField::with_rules(vec![date_rule()]),
            transform: None,
        }
    }
}

impl AnyType {
    pub fn new() -> Self {
        Self {
            base: BaseField::new(),
            transform: None,
        }
    }
}

impl LiteralType {
    /// A field that must equal `expected`.
    pub fn new(expected: Value) -> Self {
        Self {
            base: BaseField::with_rules(vec![literal_rule(expected)]),
            transform: None,
        }
    }
}

impl EnumType {
    /// A field constrained to `members`.
    pub fn new(members: Vec<Value>) -> Self {
        Self {
            base: BaseField::with_rules(vec![enum_rule(members)]),
            transform: None,
        }
    }
}

impl CustomType {
    /// A field seeded with a caller-supplied validation.
    pub fn new(validation: impl IntoValidation) -> Self {
        Self {
            base: BaseField::with_rules(vec![validation.into_validation()]),
            transform: None,
        }
    }
}

impl Default for StringType {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for NumberType {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for BooleanType {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for DateType {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for AnyType {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use trellis_core::RefId;

    fn compile(schema: &dyn SchemaType) -> (Value, RefsStore) {
        let mut refs = RefsStore::new();
        let node = schema.compile("field", &mut refs, &CompileOptions::default());
        (node.to_value(), refs)
    }

    #[test]
    fn string_node_shape() {
        let (node, refs) = compile(&StringType::new());
        assert_eq!(
            node,
            json!({
                "type": "literal",
                "subtype": "string",
                "fieldName": "field",
                "propertyName": "field",
                "bail": true,
                "allowNull": false,
                "isOptional": false,
                "validations": [
                    { "ruleFnId": "ref://1", "implicit": false, "isAsync": false },
                ],
            })
        );
        assert_eq!(refs.len(), 1);
    }

    #[test]
    fn any_seeds_no_validations() {
        let (node, refs) = compile(&AnyType::new());
        assert_eq!(node["subtype"], "any");
        assert_eq!(node["validations"], json!([]));
        assert!(refs.is_empty());
    }

    #[test]
    fn parse_rule_transform_id_order() {
        let schema = StringType::new()
            .parse(|v| v)
            .use_rule(string_rule())
            .transform(|v| v);
        let (node, refs) = compile(&schema);
        assert_eq!(node["parseFnId"], "ref://1");
        assert_eq!(node["validations"][0]["ruleFnId"], "ref://2");
        assert_eq!(node["validations"][1]["ruleFnId"], "ref://3");
        assert_eq!(node["transformFnId"], "ref://4");
        assert_eq!(refs.len(), 4);
    }

    #[test]
    fn enum_registers_choices_as_options() {
        let (_, refs) = compile(&EnumType::new(vec![json!("admin"), json!("guest")]));
        let entry = refs.get(&"ref://1".parse::<RefId>().unwrap()).unwrap();
        assert_eq!(
            entry.options(),
            Some(&json!({ "choices": ["admin", "guest"] }))
        );
    }

    #[test]
    fn literal_carries_expected_value() {
        let (node, refs) = compile(&LiteralType::new(json!(42)));
        assert_eq!(node["subtype"], "literal");
        let entry = refs.get(&"ref://1".parse::<RefId>().unwrap()).unwrap();
        assert_eq!(entry.options(), Some(&json!({ "expectedValue": 42 })));
    }

    #[test]
    fn clone_isolates_validation_list() {
        let original = StringType::new();
        let extended = original.clone().use_rule(string_rule());

        let (original_node, _) = compile(&original);
        let (extended_node, _) = compile(&extended);
        assert_eq!(original_node["validations"].as_array().unwrap().len(), 1);
        assert_eq!(extended_node["validations"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn bail_can_be_disabled() {
        let (node, _) = compile(&NumberType::new().bail(false));
        assert_eq!(node["bail"], false);
    }

    #[test]
    fn camel_case_option_rewrites_property_name() {
        let mut refs = RefsStore::new();
        let node = StringType::new().compile(
            "first_name",
            &mut refs,
            &CompileOptions { to_camel_case: true },
        );
        let value = node.to_value();
        assert_eq!(value["fieldName"], "first_name");
        assert_eq!(value["propertyName"], "firstName");
    }
}
