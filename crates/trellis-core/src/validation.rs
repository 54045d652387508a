//! # Validation Rules and Opaque Runtime Functions
//!
//! A validation is the atomic unit attached to every field: a rule (a
//! validator function plus its async/implicit metadata) paired with the
//! per-use options to hand that validator at validation time.
//!
//! The compiler never invokes any of these functions. It registers their
//! identity into the [`RefsStore`](crate::refs::RefsStore) and embeds the
//! resulting ref id in the compiled node; dispatch is entirely the
//! downstream interpreter's concern. Functions are therefore stored as
//! `Arc<dyn Fn …>` trait objects and treated as immutable after
//! construction, which is what makes sharing them across schema clones safe.

use std::sync::Arc;

use serde_json::Value;

use crate::context::FieldContext;

/// A validator function: receives the field's current value, the options
/// registered with this use of the rule, and the field context. Returns
/// `true` when the value passes.
pub type ValidatorFn = Arc<dyn Fn(&Value, Option<&Value>, &FieldContext) -> bool + Send + Sync>;

/// A conditional predicate, used by union branches, group conditions, and
/// the conditionally-required rules.
pub type ConditionalFn = Arc<dyn Fn(&Value, &FieldContext) -> bool + Send + Sync>;

/// A pre-validation parse function: transforms the raw input value before
/// any validation runs.
pub type ParseFn = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// A post-validation transform: mutates the output value of a field.
pub type TransformFn = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// A terminal callback, invoked when no union member or group condition
/// matched. Returns `Err` with a failure message to report.
pub type CallbackFn = Arc<dyn Fn(&Value, &FieldContext) -> Result<(), String> + Send + Sync>;

/// A validation rule: a validator plus the metadata the compiler needs.
///
/// Think of this as "validator + metadata". The same rule value can back
/// many validations with different options.
#[derive(Clone)]
pub struct ValidationRule {
    /// The validator function. Opaque to the compiler.
    pub validator: ValidatorFn,
    /// Whether the validator is asynchronous.
    pub is_async: bool,
    /// Implicit rules run even when the field value is missing.
    pub implicit: bool,
}

impl std::fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationRule")
            .field("is_async", &self.is_async)
            .field("implicit", &self.implicit)
            .finish_non_exhaustive()
    }
}

impl ValidationRule {
    /// Construct a plain synchronous, non-implicit rule.
    pub fn new(validator: ValidatorFn) -> Self {
        Self {
            validator,
            is_async: false,
            implicit: false,
        }
    }

    /// Mark the rule as implicit: it runs even when the field is missing.
    pub fn implicit(mut self) -> Self {
        self.implicit = true;
        self
    }

    /// Mark the rule as asynchronous.
    pub fn asynchronous(mut self) -> Self {
        self.is_async = true;
        self
    }
}

/// A validation: a rule plus the options to pass to its validator.
///
/// Think of this as "rule + options". Options are plain serializable data;
/// rule and options references may be shared across clones since neither is
/// mutated after construction.
#[derive(Debug, Clone)]
pub struct Validation {
    /// The rule to run.
    pub rule: ValidationRule,
    /// Options handed to the validator at validation time.
    pub options: Option<Value>,
}

impl Validation {
    /// Pair a rule with no options.
    pub fn new(rule: ValidationRule) -> Self {
        Self { rule, options: None }
    }

    /// Pair a rule with per-use options.
    pub fn with_options(rule: ValidationRule, options: Value) -> Self {
        Self {
            rule,
            options: Some(options),
        }
    }
}

/// The single capability a rule builder must expose: producing a
/// [`Validation`]. Field types accept `impl IntoValidation` wherever rules
/// are attached, so a value that is neither a validation nor a builder is
/// unrepresentable — the malformed-input failure mode is rejected by the
/// type system instead of at runtime.
pub trait IntoValidation {
    /// Produce the validation to attach.
    fn into_validation(self) -> Validation;
}

impl IntoValidation for Validation {
    fn into_validation(self) -> Validation {
        self
    }
}
