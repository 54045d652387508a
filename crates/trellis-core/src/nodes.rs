//! # Compiler Nodes — The Compiled Schema Representation
//!
//! A schema builder compiles into a tree of plain, serializable nodes. The
//! tree carries no functions: validators, predicates, and callbacks are
//! replaced by [`RefId`] handles into the [`RefsStore`](crate::refs::RefsStore)
//! populated during the same compile call. Any two implementations that
//! build equivalent trees must produce byte-for-byte equivalent
//! serializations of this structure.
//!
//! ## Wire Shape
//!
//! Nodes serialize with a `type` discriminant (`literal`, `object`,
//! `sub_object`, `array`, `tuple`, `record`, `union`) and camelCase field
//! names. Literal nodes carry a further `subtype` discriminant. Optional
//! reference ids are omitted entirely when absent.
//!
//! Union nodes deliberately carry no `allowNull`/`isOptional`/`bail` of
//! their own: those flags live on each branch schema, and the modifier
//! helpers below leave unions untouched. Downstream interpreters rely on
//! the absence of these fields, so the asymmetry must be preserved.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::refs::RefId;

/// A single compiled validation attached to a field node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationNode {
    /// Reference to the validator + options pair in the store.
    pub rule_fn_id: RefId,
    /// Implicit validations run even when the field value is missing.
    pub implicit: bool,
    /// Whether the validator is asynchronous.
    pub is_async: bool,
}

/// Further discriminant for literal-kind nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiteralSubtype {
    String,
    Number,
    Boolean,
    Date,
    Enum,
    Literal,
    Any,
    Custom,
}

/// A leaf field node (string, number, boolean, date, enum, literal, any,
/// custom).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiteralNode {
    pub subtype: LiteralSubtype,
    /// The original key as supplied by the caller.
    pub field_name: String,
    /// The key after the optional camelCase transform.
    pub property_name: String,
    pub bail: bool,
    pub allow_null: bool,
    pub is_optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_fn_id: Option<RefId>,
    pub validations: Vec<ValidationNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform_fn_id: Option<RefId>,
}

/// A named-properties object node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectNode {
    pub field_name: String,
    pub property_name: String,
    pub bail: bool,
    pub allow_null: bool,
    pub is_optional: bool,
    /// Policy flag consumed by the interpreter; unknown keys are neither
    /// enforced nor dropped at compile time.
    pub allow_unknown_properties: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_fn_id: Option<RefId>,
    pub validations: Vec<ValidationNode>,
    /// Child nodes in declared property order.
    pub properties: Vec<CompilerNode>,
    /// Conditional property bundles, in merge order.
    pub groups: Vec<GroupNode>,
}

/// An object-shaped node used as a group-condition branch. It has no field
/// identity of its own and no modifier flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubObjectNode {
    pub properties: Vec<CompilerNode>,
    pub groups: Vec<GroupNode>,
}

/// A conditionally-applied bundle of object properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "group", rename_all = "camelCase")]
pub struct GroupNode {
    /// Callback invoked when no condition matched. Always present; defaults
    /// to a "no group condition matched" failure callback.
    pub else_conditional_fn_ref_id: RefId,
    pub conditions: Vec<GroupConditionNode>,
}

/// One predicate-guarded bundle inside a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupConditionNode {
    pub conditional_fn_ref_id: RefId,
    /// Always a `sub_object` node.
    pub schema: CompilerNode,
}

/// An array node validating every element against one schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayNode {
    pub field_name: String,
    pub property_name: String,
    pub bail: bool,
    pub allow_null: bool,
    pub is_optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_fn_id: Option<RefId>,
    pub validations: Vec<ValidationNode>,
    /// The element schema, compiled with the `'*'` wildcard field name.
    pub each: Box<CompilerNode>,
}

/// A fixed-arity tuple node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TupleNode {
    pub field_name: String,
    pub property_name: String,
    pub bail: bool,
    pub allow_null: bool,
    pub is_optional: bool,
    pub allow_unknown_properties: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_fn_id: Option<RefId>,
    pub validations: Vec<ValidationNode>,
    /// Element schemas compiled with their index as field name.
    pub elements: Vec<CompilerNode>,
}

/// A record node: arbitrary string keys, one uniform value schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordNode {
    pub field_name: String,
    pub property_name: String,
    pub bail: bool,
    pub allow_null: bool,
    pub is_optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_fn_id: Option<RefId>,
    pub validations: Vec<ValidationNode>,
    /// The value schema, compiled with the `'*'` wildcard field name since
    /// keys are unknown until validation time.
    pub each: Box<CompilerNode>,
}

/// A union node: ordered predicate-guarded alternatives.
///
/// Note the absence of modifier flags and validations — optionality and
/// nullability are encoded per branch, not at the dispatch level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnionNode {
    pub field_name: String,
    pub property_name: String,
    /// Callback invoked when no branch matched. Always present; defaults to
    /// a "no matching union member" failure callback.
    pub else_conditional_fn_ref_id: RefId,
    pub conditions: Vec<UnionConditionNode>,
}

/// One branch of a union.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnionConditionNode {
    pub conditional_fn_ref_id: RefId,
    pub schema: CompilerNode,
}

/// The compiled output of any schema type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CompilerNode {
    Literal(LiteralNode),
    Object(ObjectNode),
    SubObject(SubObjectNode),
    Array(ArrayNode),
    Tuple(TupleNode),
    Record(RecordNode),
    Union(UnionNode),
}

impl CompilerNode {
    /// Mark the node as accepting `null`. No-op on union nodes: nullability
    /// is a per-branch concern there, and the flag must stay absent.
    pub fn set_allow_null(&mut self) {
        match self {
            CompilerNode::Literal(node) => node.allow_null = true,
            CompilerNode::Object(node) => node.allow_null = true,
            CompilerNode::Array(node) => node.allow_null = true,
            CompilerNode::Tuple(node) => node.allow_null = true,
            CompilerNode::Record(node) => node.allow_null = true,
            CompilerNode::Union(_) | CompilerNode::SubObject(_) => {}
        }
    }

    /// Mark the node as optional. No-op on union nodes, as above.
    pub fn set_is_optional(&mut self) {
        match self {
            CompilerNode::Literal(node) => node.is_optional = true,
            CompilerNode::Object(node) => node.is_optional = true,
            CompilerNode::Array(node) => node.is_optional = true,
            CompilerNode::Tuple(node) => node.is_optional = true,
            CompilerNode::Record(node) => node.is_optional = true,
            CompilerNode::Union(_) | CompilerNode::SubObject(_) => {}
        }
    }

    /// Append validations to the node's list. No-op on union nodes.
    pub fn append_validations(&mut self, extra: Vec<ValidationNode>) {
        if let Some(validations) = self.validations_mut() {
            validations.extend(extra);
        }
    }

    fn validations_mut(&mut self) -> Option<&mut Vec<ValidationNode>> {
        match self {
            CompilerNode::Literal(node) => Some(&mut node.validations),
            CompilerNode::Object(node) => Some(&mut node.validations),
            CompilerNode::Array(node) => Some(&mut node.validations),
            CompilerNode::Tuple(node) => Some(&mut node.validations),
            CompilerNode::Record(node) => Some(&mut node.validations),
            CompilerNode::Union(_) | CompilerNode::SubObject(_) => None,
        }
    }

    /// The node's validations, when the node kind carries any.
    pub fn validations(&self) -> Option<&[ValidationNode]> {
        match self {
            CompilerNode::Literal(node) => Some(&node.validations),
            CompilerNode::Object(node) => Some(&node.validations),
            CompilerNode::Array(node) => Some(&node.validations),
            CompilerNode::Tuple(node) => Some(&node.validations),
            CompilerNode::Record(node) => Some(&node.validations),
            CompilerNode::Union(_) | CompilerNode::SubObject(_) => None,
        }
    }

    /// The original field name, when the node kind carries one.
    pub fn field_name(&self) -> Option<&str> {
        match self {
            CompilerNode::Literal(node) => Some(&node.field_name),
            CompilerNode::Object(node) => Some(&node.field_name),
            CompilerNode::Array(node) => Some(&node.field_name),
            CompilerNode::Tuple(node) => Some(&node.field_name),
            CompilerNode::Record(node) => Some(&node.field_name),
            CompilerNode::Union(node) => Some(&node.field_name),
            CompilerNode::SubObject(_) => None,
        }
    }

    /// The transformed property name, when the node kind carries one.
    pub fn property_name(&self) -> Option<&str> {
        match self {
            CompilerNode::Literal(node) => Some(&node.property_name),
            CompilerNode::Object(node) => Some(&node.property_name),
            CompilerNode::Array(node) => Some(&node.property_name),
            CompilerNode::Tuple(node) => Some(&node.property_name),
            CompilerNode::Record(node) => Some(&node.property_name),
            CompilerNode::Union(node) => Some(&node.property_name),
            CompilerNode::SubObject(_) => None,
        }
    }

    /// Serialize to a `serde_json::Value`. Infallible for this data model.
    pub fn to_value(&self) -> Value {
        // The model contains only strings, bools, vecs, and ref ids.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn string_node(field_name: &str) -> CompilerNode {
        CompilerNode::Literal(LiteralNode {
            subtype: LiteralSubtype::String,
            field_name: field_name.to_string(),
            property_name: field_name.to_string(),
            bail: true,
            allow_null: false,
            is_optional: false,
            parse_fn_id: None,
            validations: vec![ValidationNode {
                rule_fn_id: "ref://1".parse().expect("valid"),
                implicit: false,
                is_async: false,
            }],
            transform_fn_id: None,
        })
    }

    #[test]
    fn literal_wire_shape() {
        assert_eq!(
            string_node("username").to_value(),
            json!({
                "type": "literal",
                "subtype": "string",
                "fieldName": "username",
                "propertyName": "username",
                "bail": true,
                "allowNull": false,
                "isOptional": false,
                "validations": [
                    { "ruleFnId": "ref://1", "implicit": false, "isAsync": false }
                ],
            })
        );
    }

    #[test]
    fn absent_parse_fn_is_omitted() {
        let value = string_node("username").to_value();
        assert!(value.get("parseFnId").is_none());
        assert!(value.get("transformFnId").is_none());
    }

    #[test]
    fn group_node_is_tagged() {
        let group = GroupNode {
            else_conditional_fn_ref_id: "ref://3".parse().expect("valid"),
            conditions: vec![],
        };
        assert_eq!(
            serde_json::to_value(&group).expect("serializable"),
            json!({
                "type": "group",
                "elseConditionalFnRefId": "ref://3",
                "conditions": [],
            })
        );
    }

    #[test]
    fn sub_object_tag_uses_snake_case() {
        let node = CompilerNode::SubObject(SubObjectNode {
            properties: vec![],
            groups: vec![],
        });
        assert_eq!(
            node.to_value(),
            json!({ "type": "sub_object", "properties": [], "groups": [] })
        );
    }

    #[test]
    fn union_node_carries_no_modifier_flags() {
        let mut node = CompilerNode::Union(UnionNode {
            field_name: "*".to_string(),
            property_name: "*".to_string(),
            else_conditional_fn_ref_id: "ref://1".parse().expect("valid"),
            conditions: vec![],
        });
        node.set_allow_null();
        node.set_is_optional();
        node.append_validations(vec![ValidationNode {
            rule_fn_id: "ref://9".parse().expect("valid"),
            implicit: false,
            is_async: false,
        }]);

        let value = node.to_value();
        assert!(value.get("allowNull").is_none());
        assert!(value.get("isOptional").is_none());
        assert!(value.get("bail").is_none());
        assert!(value.get("validations").is_none());
    }

    #[test]
    fn modifier_helpers_set_flags_on_field_nodes() {
        let mut node = string_node("username");
        node.set_allow_null();
        node.set_is_optional();
        let value = node.to_value();
        assert_eq!(value["allowNull"], json!(true));
        assert_eq!(value["isOptional"], json!(true));
    }

    #[test]
    fn accessors_cover_field_bearing_and_bare_kinds() {
        let leaf = string_node("user_name");
        assert_eq!(leaf.field_name(), Some("user_name"));
        assert_eq!(leaf.property_name(), Some("user_name"));
        assert_eq!(leaf.validations().map(<[_]>::len), Some(1));

        let union = CompilerNode::Union(UnionNode {
            field_name: "value".to_string(),
            property_name: "value".to_string(),
            else_conditional_fn_ref_id: "ref://1".parse().expect("valid"),
            conditions: vec![],
        });
        assert_eq!(union.field_name(), Some("value"));
        assert_eq!(union.validations(), None);

        let bundle = CompilerNode::SubObject(SubObjectNode {
            properties: vec![],
            groups: vec![],
        });
        assert_eq!(bundle.field_name(), None);
        assert_eq!(bundle.property_name(), None);
        assert_eq!(bundle.validations(), None);
    }

    #[test]
    fn node_round_trips_through_json() {
        let node = CompilerNode::Object(ObjectNode {
            field_name: "*".to_string(),
            property_name: "*".to_string(),
            bail: true,
            allow_null: false,
            is_optional: false,
            allow_unknown_properties: false,
            parse_fn_id: None,
            validations: vec![],
            properties: vec![string_node("username")],
            groups: vec![],
        });
        let text = serde_json::to_string(&node).expect("serializable");
        let back: CompilerNode = serde_json::from_str(&text).expect("deserializable");
        assert_eq!(back, node);
    }
}
