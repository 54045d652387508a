//! # Union Schemas
//!
//! Ordered, predicate-guarded alternatives. At validation time the first
//! matching predicate selects its branch schema; when none matches, the
//! no-match callback reports the failure. The callback ref is always
//! registered, so a union with zero conditions still compiles to a valid
//! node.
//!
//! Union nodes carry no modifier flags and no validation list of their
//! own. Optionality, nullability, and rules belong to the branches;
//! applying a modifier to a union leaves the node untouched.

use std::sync::Arc;

use serde_json::Value;

use trellis_core::{
    CallbackFn, CompilerNode, ConditionalFn, FieldContext, RefsStore, UnionConditionNode, UnionNode,
};

use crate::fields::property_name;
use crate::schema_type::{CompileOptions, SchemaType};

/// A schema selecting one of several alternatives by predicate.
#[derive(Clone, Default)]
pub struct UnionType {
    conditions: Vec<UnionCondition>,
    otherwise: Option<CallbackFn>,
}

#[derive(Clone)]
struct UnionCondition {
    predicate: ConditionalFn,
    schema: Box<dyn SchemaType>,
}

impl UnionType {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a branch. Branches are tried in declaration order.
    pub fn when(
        mut self,
        predicate: impl Fn(&Value, &FieldContext) -> bool + Send + Sync + 'static,
        schema: impl SchemaType + 'static,
    ) -> Self {
        self.conditions.push(UnionCondition {
            predicate: Arc::new(predicate),
            schema: Box::new(schema),
        });
        self
    }

    /// Add an always-matching final branch.
    pub fn else_branch(self, schema: impl SchemaType + 'static) -> Self {
        self.when(|_, _| true, schema)
    }

    /// Replace the callback invoked when no branch matched.
    pub fn otherwise(
        mut self,
        callback: impl Fn(&Value, &FieldContext) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.otherwise = Some(Arc::new(callback));
        self
    }
}

impl SchemaType for UnionType {
    fn compile(
        &self,
        field_name: &str,
        refs: &mut RefsStore,
        options: &CompileOptions,
    ) -> CompilerNode {
        tracing::debug!(
            field = field_name,
            conditions = self.conditions.len(),
            "compiling union schema"
        );

        let else_callback = self
            .otherwise
            .clone()
            .unwrap_or_else(|| Arc::new(|_, _| Err("no matching union member".to_string())));
        let else_conditional_fn_ref_id = refs.track_callback(else_callback);

        let conditions = self
            .conditions
            .iter()
            .map(|condition| {
                let conditional_fn_ref_id = refs.track_conditional(condition.predicate.clone());
                UnionConditionNode {
                    conditional_fn_ref_id,
                    schema: condition.schema.compile(field_name, refs, options),
                }
            })
            .collect();

        CompilerNode::Union(UnionNode {
            field_name: field_name.to_string(),
            property_name: property_name(field_name, options),
            else_conditional_fn_ref_id,
            conditions,
        })
    }

    fn clone_schema(&self) -> Box<dyn SchemaType> {
        Box::new(self.clone())
    }
}
