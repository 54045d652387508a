//! # Built-in Rule Constructors
//!
//! The validations the field types seed themselves with, plus the
//! conditionally-required and record-level rules. Each constructor returns
//! a [`Validation`]: a rule (validator + metadata) paired with this use's
//! options. The compiler only ever registers identity and options into the
//! reference store — validators here are never invoked at compile time.
//!
//! Leaf-type validators are intentionally minimal structural checks; richer
//! format rules (string formats, numeric bounds, date formats) are the
//! interpreter-side rule packs' concern and attach through the same
//! [`IntoValidation`](trellis_core::IntoValidation) seam.

use std::sync::Arc;

use serde_json::{json, Value};

use trellis_core::{ConditionalFn, FieldContext, Validation, ValidationRule, ValidatorFn};

/// Comparator for the `required_when` modifier rule.
///
/// Membership operators carry their candidate list, so "array expected"
/// misuse is unrepresentable; numeric operators compare numerically and
/// fail the check for non-numeric probed values.
#[derive(Debug, Clone)]
pub enum Comparison {
    /// Probed value equals the expectation.
    Equals(Value),
    /// Probed value differs from the expectation.
    NotEquals(Value),
    /// Probed value is one of the candidates.
    In(Vec<Value>),
    /// Probed value is none of the candidates.
    NotIn(Vec<Value>),
    /// Probed numeric value is strictly greater.
    GreaterThan(f64),
    /// Probed numeric value is strictly smaller.
    LessThan(f64),
    /// Probed numeric value is greater or equal.
    GreaterThanOrEqual(f64),
    /// Probed numeric value is smaller or equal.
    LessThanOrEqual(f64),
}

impl Comparison {
    /// Evaluate the comparison against a (possibly missing) probed value.
    pub fn matches(&self, probed: Option<&Value>) -> bool {
        match self {
            Comparison::Equals(expected) => probed.is_some_and(|v| loose_eq(v, expected)),
            Comparison::NotEquals(expected) => !probed.is_some_and(|v| loose_eq(v, expected)),
            Comparison::In(candidates) => {
                probed.is_some_and(|v| candidates.iter().any(|c| loose_eq(v, c)))
            }
            Comparison::NotIn(candidates) => {
                !probed.is_some_and(|v| candidates.iter().any(|c| loose_eq(v, c)))
            }
            Comparison::GreaterThan(n) => as_f64(probed).is_some_and(|v| v > *n),
            Comparison::LessThan(n) => as_f64(probed).is_some_and(|v| v < *n),
            Comparison::GreaterThanOrEqual(n) => as_f64(probed).is_some_and(|v| v >= *n),
            Comparison::LessThanOrEqual(n) => as_f64(probed).is_some_and(|v| v <= *n),
        }
    }
}

fn as_f64(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64)
}

/// Equality for probed values: numbers compare by magnitude regardless of
/// integer or float representation, everything else compares strictly.
fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

/// The string type-check rule.
pub fn string_rule() -> Validation {
    let validator: ValidatorFn = Arc::new(|value, _, _| value.is_string());
    Validation::new(ValidationRule::new(validator))
}

/// The number type-check rule.
pub fn number_rule() -> Validation {
    let validator: ValidatorFn = Arc::new(|value, _, _| value.is_number());
    Validation::new(ValidationRule::new(validator))
}

/// The boolean type-check rule.
pub fn boolean_rule() -> Validation {
    let validator: ValidatorFn = Arc::new(|value, _, _| value.is_boolean());
    Validation::new(ValidationRule::new(validator))
}

/// The date type-check rule. Structural only: expects a string; format
/// parsing is the interpreter's concern.
pub fn date_rule() -> Validation {
    let validator: ValidatorFn = Arc::new(|value, _, _| value.is_string());
    Validation::new(ValidationRule::new(validator))
}

/// Equality against a fixed literal value.
pub fn literal_rule(expected: Value) -> Validation {
    let validator: ValidatorFn = Arc::new(|value, options, _| {
        options
            .and_then(|o| o.get("expectedValue"))
            .is_some_and(|expected| value == expected)
    });
    Validation::with_options(
        ValidationRule::new(validator),
        json!({ "expectedValue": expected }),
    )
}

/// Membership in a closed set of choices.
pub fn enum_rule(choices: Vec<Value>) -> Validation {
    let validator: ValidatorFn = Arc::new(|value, options, _| {
        options
            .and_then(|o| o.get("choices"))
            .and_then(Value::as_array)
            .is_some_and(|choices| choices.contains(value))
    });
    Validation::with_options(ValidationRule::new(validator), json!({ "choices": choices }))
}

/// Conditionally-required rule: implicit, so it runs even when the field
/// is missing; fails only when the predicate demands a value and none is
/// present.
pub fn required_when(predicate: ConditionalFn) -> Validation {
    let validator: ValidatorFn = Arc::new(move |value, _, ctx| {
        if predicate(value, ctx) {
            !value.is_null()
        } else {
            true
        }
    });
    Validation::new(ValidationRule::new(validator).implicit())
}

/// Minimum number of keys in a record.
pub fn record_min_length(min: usize) -> Validation {
    let validator: ValidatorFn = Arc::new(|value, options, _| {
        let min = length_option(options, "min");
        value.as_object().map_or(true, |map| map.len() >= min)
    });
    Validation::with_options(ValidationRule::new(validator), json!({ "min": min }))
}

/// Maximum number of keys in a record.
pub fn record_max_length(max: usize) -> Validation {
    let validator: ValidatorFn = Arc::new(|value, options, _| {
        let max = length_option(options, "max");
        value.as_object().map_or(true, |map| map.len() <= max)
    });
    Validation::with_options(ValidationRule::new(validator), json!({ "max": max }))
}

/// Exact number of keys in a record.
pub fn record_fixed_length(size: usize) -> Validation {
    let validator: ValidatorFn = Arc::new(|value, options, _| {
        let size = length_option(options, "size");
        value.as_object().map_or(true, |map| map.len() == size)
    });
    Validation::with_options(ValidationRule::new(validator), json!({ "size": size }))
}

/// Validate the realized key set of a record with a caller-supplied
/// callback. The callback is captured by the validator closure; options
/// stay plain serializable data.
pub fn validate_keys_rule(
    callback: impl Fn(&[String], &FieldContext) -> bool + Send + Sync + 'static,
) -> Validation {
    let validator: ValidatorFn = Arc::new(move |value, _, ctx| {
        value.as_object().map_or(true, |map| {
            let keys: Vec<String> = map.keys().cloned().collect();
            callback(&keys, ctx)
        })
    });
    Validation::new(ValidationRule::new(validator))
}

fn length_option(options: Option<&Value>, key: &str) -> usize {
    options
        .and_then(|o| o.get(key))
        .and_then(Value::as_u64)
        .unwrap_or(0) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx(value: Value) -> FieldContext {
        FieldContext::root("field", value, json!({}))
    }

    fn run(validation: &Validation, value: Value) -> bool {
        (validation.rule.validator)(&value, validation.options.as_ref(), &ctx(value.clone()))
    }

    #[test]
    fn type_check_rules() {
        assert!(run(&string_rule(), json!("hello")));
        assert!(!run(&string_rule(), json!(1)));
        assert!(run(&number_rule(), json!(1.5)));
        assert!(!run(&number_rule(), json!("1.5")));
        assert!(run(&boolean_rule(), json!(true)));
        assert!(!run(&boolean_rule(), json!(0)));
    }

    #[test]
    fn literal_rule_compares_against_options() {
        let rule = literal_rule(json!(true));
        assert!(run(&rule, json!(true)));
        assert!(!run(&rule, json!(false)));
        assert_eq!(rule.options, Some(json!({ "expectedValue": true })));
    }

    #[test]
    fn enum_rule_checks_membership() {
        let rule = enum_rule(vec![json!("guest"), json!("admin")]);
        assert!(run(&rule, json!("guest")));
        assert!(!run(&rule, json!("moderator")));
    }

    #[test]
    fn required_when_is_implicit() {
        let rule = required_when(Arc::new(|_, _| true));
        assert!(rule.rule.implicit);
        assert!(!run(&rule, json!("present")));
        // Predicate demands a value; null fails.
        assert!(!(rule.rule.validator)(&json!(null), None, &ctx(json!(null))));
    }

    #[test]
    fn record_length_rules() {
        let two = json!({ "a": 1, "b": 2 });
        assert!(run(&record_min_length(2), two.clone()));
        assert!(!run(&record_min_length(3), two.clone()));
        assert!(run(&record_max_length(2), two.clone()));
        assert!(!run(&record_max_length(1), two.clone()));
        assert!(run(&record_fixed_length(2), two.clone()));
        assert!(!run(&record_fixed_length(1), two));
    }

    #[test]
    fn validate_keys_receives_realized_keys() {
        let rule = validate_keys_rule(|keys, _| keys.iter().all(|k| k != "forbidden"));
        assert!(run(&rule, json!({ "ok": 1 })));
        assert!(!run(&rule, json!({ "forbidden": 1 })));
    }

    #[test]
    fn comparison_operators() {
        assert!(Comparison::Equals(json!("ok")).matches(Some(&json!("ok"))));
        assert!(Comparison::NotEquals(json!("ok")).matches(Some(&json!("nope"))));
        assert!(Comparison::NotEquals(json!("ok")).matches(None));
        assert!(Comparison::In(vec![json!(1), json!(2)]).matches(Some(&json!(2))));
        assert!(!Comparison::In(vec![json!(1)]).matches(None));
        assert!(Comparison::NotIn(vec![json!(1)]).matches(Some(&json!(3))));
        assert!(Comparison::NotIn(vec![json!(1)]).matches(None));
        assert!(Comparison::GreaterThan(2.0).matches(Some(&json!(3))));
        assert!(!Comparison::GreaterThan(2.0).matches(Some(&json!("3"))));
        assert!(Comparison::LessThanOrEqual(2.0).matches(Some(&json!(2))));
        assert!(Comparison::GreaterThanOrEqual(2.0).matches(Some(&json!(2.5))));
        assert!(Comparison::LessThan(2.0).matches(Some(&json!(1))));
    }

    #[test]
    fn equality_ignores_numeric_representation() {
        assert!(Comparison::Equals(json!(100)).matches(Some(&json!(100.0))));
        assert!(Comparison::Equals(json!(100.0)).matches(Some(&json!(100))));
        assert!(!Comparison::NotEquals(json!(100)).matches(Some(&json!(100.0))));
        assert!(Comparison::In(vec![json!(1), json!(100)]).matches(Some(&json!(100.0))));
        assert!(!Comparison::NotIn(vec![json!(100)]).matches(Some(&json!(100.0))));
        // Non-numbers still compare strictly.
        assert!(!Comparison::Equals(json!("100")).matches(Some(&json!(100))));
        assert!(!Comparison::Equals(json!(100)).matches(Some(&json!(100.5))));
    }
}
