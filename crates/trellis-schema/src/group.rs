//! # Conditional Property Groups
//!
//! A group is an ordered list of predicate-guarded property bundles merged
//! into an object. At validation time the first matching predicate's bundle
//! applies; when none matches, the group's terminal callback reports the
//! failure. The callback ref is always registered, even when the caller
//! never customizes it.

use std::sync::Arc;

use serde_json::Value;

use trellis_core::{
    CallbackFn, ConditionalFn, FieldContext, GroupConditionNode, GroupNode, RefsStore,
};

use crate::object::ObjectType;
use crate::schema_type::CompileOptions;

/// One or more conditionally-applied property bundles for an object.
#[derive(Clone)]
pub struct Group {
    conditions: Vec<GroupCondition>,
    otherwise: Option<CallbackFn>,
}

#[derive(Clone)]
struct GroupCondition {
    predicate: ConditionalFn,
    schema: ObjectType,
}

impl Group {
    pub fn new() -> Self {
        Self {
            conditions: Vec::new(),
            otherwise: None,
        }
    }

    /// Apply `schema`'s properties when the predicate matches. Conditions
    /// are tried in declaration order.
    pub fn when(
        mut self,
        predicate: impl Fn(&Value, &FieldContext) -> bool + Send + Sync + 'static,
        schema: ObjectType,
    ) -> Self {
        self.conditions.push(GroupCondition {
            predicate: Arc::new(predicate),
            schema,
        });
        self
    }

    /// Apply `schema`'s properties when no earlier condition matched. Sugar
    /// for a final always-matching condition.
    pub fn else_branch(self, schema: ObjectType) -> Self {
        self.when(|_, _| true, schema)
    }

    /// Replace the callback invoked when no condition matched.
    pub fn otherwise(
        mut self,
        callback: impl Fn(&Value, &FieldContext) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.otherwise = Some(Arc::new(callback));
        self
    }

    /// Compile into a group node. The no-match callback is tracked first,
    /// then each condition's bundle schema followed by its predicate.
    pub(crate) fn compile_node(&self, refs: &mut RefsStore, options: &CompileOptions) -> GroupNode {
        let else_callback = self
            .otherwise
            .clone()
            .unwrap_or_else(|| Arc::new(|_, _| Err("no group condition matched".to_string())));
        let else_conditional_fn_ref_id = refs.track_callback(else_callback);

        let conditions = self
            .conditions
            .iter()
            .map(|condition| {
                let schema = condition.schema.compile_sub_object(refs, options);
                GroupConditionNode {
                    conditional_fn_ref_id: refs.track_conditional(condition.predicate.clone()),
                    schema,
                }
            })
            .collect();

        GroupNode {
            else_conditional_fn_ref_id,
            conditions,
        }
    }
}

impl Default for Group {
    fn default() -> Self {
        Self::new()
    }
}
