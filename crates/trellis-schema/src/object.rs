//! # Object Schemas
//!
//! The named-properties composite. Properties keep insertion order end to
//! end (declaration order is the compilation and output order), re-using a
//! key replaces the earlier schema in place, and conditional bundles merge
//! through [`Group`].
//!
//! An object is also the camelCase boundary: its own `to_camel_case()` flag
//! is ORed with the ambient option and threaded to everything compiled
//! within this object's compile call. A nested object's explicit flag
//! governs its own subtree the same way.

use std::sync::Arc;

use serde_json::Value;

use trellis_core::{CompilerNode, IntoValidation, ObjectNode, RefsStore, SubObjectNode};

use crate::fields::{property_name, BaseField};
use crate::group::Group;
use crate::schema_type::{CompileOptions, SchemaType};

/// A schema for an object with a known set of properties.
#[derive(Clone, Default)]
pub struct ObjectType {
    base: BaseField,
    properties: Vec<(String, Box<dyn SchemaType>)>,
    groups: Vec<Group>,
    allow_unknown_properties: bool,
    camel_case: bool,
}

impl ObjectType {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property. Re-using a key replaces the earlier schema without
    /// changing its position.
    pub fn field(mut self, key: impl Into<String>, schema: impl SchemaType + 'static) -> Self {
        let key = key.into();
        match self.properties.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = Box::new(schema),
            None => self.properties.push((key, Box::new(schema))),
        }
        self
    }

    /// Add properties in bulk, in iteration order.
    pub fn fields(
        mut self,
        entries: impl IntoIterator<Item = (String, Box<dyn SchemaType>)>,
    ) -> Self {
        for (key, schema) in entries {
            match self.properties.iter_mut().find(|(k, _)| *k == key) {
                Some((_, slot)) => *slot = schema,
                None => self.properties.push((key, schema)),
            }
        }
        self
    }

    /// A snapshot of the declared properties, for spreading into another
    /// object. Schemas are deep-cloned; mutating either object afterwards
    /// affects only itself.
    pub fn properties(&self) -> Vec<(String, Box<dyn SchemaType>)> {
        self.properties.clone()
    }

    /// Merge a conditional property bundle. Merge order is preserved in the
    /// compiled output.
    pub fn merge(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    /// Carry unknown input keys through instead of treating them as errors.
    /// A policy flag for the interpreter; nothing is enforced here.
    pub fn allow_unknown_properties(mut self) -> Self {
        self.allow_unknown_properties = true;
        self
    }

    /// Convert `snake_case` field names to `camelCase` property names for
    /// this object and everything beneath it.
    pub fn to_camel_case(mut self) -> Self {
        self.camel_case = true;
        self
    }

    /// Attach a validation rule to the object itself.
    pub fn use_rule(mut self, validation: impl IntoValidation) -> Self {
        self.base.push(validation);
        self
    }

    /// Mutate the raw input before any validation runs.
    pub fn parse(mut self, callback: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        self.base.set_parse(Arc::new(callback));
        self
    }

    /// Control fail-fast behavior for the object's own validations.
    pub fn bail(mut self, state: bool) -> Self {
        self.base.set_bail(state);
        self
    }

    fn compile_children(
        &self,
        refs: &mut RefsStore,
        options: &CompileOptions,
    ) -> (Vec<CompilerNode>, Vec<trellis_core::GroupNode>) {
        let properties = self
            .properties
            .iter()
            .map(|(key, schema)| schema.compile(key, refs, options))
            .collect();
        let groups = self
            .groups
            .iter()
            .map(|group| group.compile_node(refs, options))
            .collect();
        (properties, groups)
    }

    /// Compile as a group-condition branch: properties and groups only, no
    /// field identity and no flags.
    pub(crate) fn compile_sub_object(
        &self,
        refs: &mut RefsStore,
        options: &CompileOptions,
    ) -> CompilerNode {
        let effective = self.effective_options(options);
        let (properties, groups) = self.compile_children(refs, &effective);
        CompilerNode::SubObject(SubObjectNode { properties, groups })
    }

    fn effective_options(&self, options: &CompileOptions) -> CompileOptions {
        CompileOptions {
            to_camel_case: options.to_camel_case || self.camel_case,
        }
    }
}

impl SchemaType for ObjectType {
    fn compile(
        &self,
        field_name: &str,
        refs: &mut RefsStore,
        options: &CompileOptions,
    ) -> CompilerNode {
        let effective = self.effective_options(options);
        tracing::debug!(
            field = field_name,
            properties = self.properties.len(),
            groups = self.groups.len(),
            "compiling object schema"
        );

        let (properties, groups) = self.compile_children(refs, &effective);
        let parse_fn_id = self.base.track_parse(refs);
        let validations = self.base.compile_validations(refs);

        CompilerNode::Object(ObjectNode {
            field_name: field_name.to_string(),
            property_name: property_name(field_name, &effective),
            bail: self.base.options.bail,
            allow_null: false,
            is_optional: false,
            allow_unknown_properties: self.allow_unknown_properties,
            parse_fn_id,
            validations,
            properties,
            groups,
        })
    }

    fn clone_schema(&self) -> Box<dyn SchemaType> {
        Box::new(self.clone())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::literals::StringType;
    use proptest::prelude::*;

    /// Strategy: a set of distinct snake_case-ish field names.
    fn field_names() -> impl Strategy<Value = Vec<String>> {
        proptest::collection::btree_set("[a-z][a-z_]{0,12}", 0..16)
            .prop_map(|set| set.into_iter().collect())
    }

    fn build(names: &[String]) -> ObjectType {
        names.iter().fold(ObjectType::new(), |schema, name| {
            schema.field(name.clone(), StringType::new())
        })
    }

    proptest! {
        /// Ref ids are dense: one per string field, numbered 1..=n in
        /// declaration order.
        #[test]
        fn ref_ids_are_dense_and_ordered(names in field_names()) {
            let mut refs = RefsStore::new();
            let node = build(&names)
                .compile("", &mut refs, &CompileOptions::default())
                .to_value();

            prop_assert_eq!(refs.len(), names.len());
            let properties = node["properties"].as_array().unwrap();
            for (i, property) in properties.iter().enumerate() {
                let expected = format!("ref://{}", i + 1);
                prop_assert_eq!(&property["validations"][0]["ruleFnId"], &serde_json::json!(expected));
            }
        }

        /// Compiling the same tree against fresh stores is deterministic.
        #[test]
        fn recompilation_is_stable(names in field_names()) {
            let schema = build(&names);
            let mut first_refs = RefsStore::new();
            let mut second_refs = RefsStore::new();
            let first = schema.compile("", &mut first_refs, &CompileOptions::default());
            let second = schema.compile("", &mut second_refs, &CompileOptions::default());
            prop_assert_eq!(first.to_value(), second.to_value());
            prop_assert_eq!(first_refs.len(), second_refs.len());
        }
    }
}
