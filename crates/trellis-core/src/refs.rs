//! # Reference Store — Deferred Function Identity
//!
//! Compiled schemas are plain serializable data, yet validation needs real
//! functions: validators, predicates, parse/transform hooks, fallback
//! callbacks. The reference store is the intern table that bridges the two.
//! The compiler appends each function (plus its options, for validators)
//! and embeds the returned `ref://<n>` identifier in the node tree; the
//! interpreter looks the function back up by id at execution time.
//!
//! ## Invariants
//!
//! - Stores are append-only. Ids are never reused or reordered.
//! - Ids start at `ref://1` and increase by one per tracked value, so for a
//!   fixed builder tree the id assignment is fully determined by traversal
//!   order. Two independent compiles of the same tree against fresh stores
//!   produce the same ids at the same structural positions.
//! - A store belongs to a single compile call. Concurrent compiles of a
//!   shared schema must each use their own store.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::RefIdError;
use crate::validation::{CallbackFn, ConditionalFn, ParseFn, TransformFn, Validation};

/// Opaque identifier for a tracked runtime value.
///
/// Wire format is `ref://<n>` with `n >= 1`; the numeric index is
/// store-relative and meaningful only next to the store populated by the
/// same compile call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RefId(u32);

impl RefId {
    /// The one-based index inside the owning store.
    pub fn index(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for RefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ref://{}", self.0)
    }
}

impl FromStr for RefId {
    type Err = RefIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let suffix = s
            .strip_prefix("ref://")
            .ok_or_else(|| RefIdError::MissingScheme(s.to_string()))?;
        let index: u32 = suffix
            .parse()
            .map_err(|_| RefIdError::InvalidIndex(s.to_string()))?;
        if index == 0 {
            return Err(RefIdError::InvalidIndex(s.to_string()));
        }
        Ok(RefId(index))
    }
}

impl Serialize for RefId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RefId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// A runtime value held by the store. Functions are opaque: the store keeps
/// their identity, never introspects or invokes them.
#[derive(Clone)]
pub enum RefValue {
    /// A validator function paired with the options registered for this use
    /// of the rule.
    Validator {
        /// The validation whose rule and options were registered.
        validation: Validation,
    },
    /// A conditional predicate (union branch, group condition, or
    /// conditionally-required check).
    Conditional(ConditionalFn),
    /// A pre-validation parse function.
    Parser(ParseFn),
    /// A post-validation output transform.
    Transformer(TransformFn),
    /// A no-match fallback callback.
    Callback(CallbackFn),
}

impl RefValue {
    /// The options registered alongside a validator, if any.
    pub fn options(&self) -> Option<&Value> {
        match self {
            RefValue::Validator { validation } => validation.options.as_ref(),
            _ => None,
        }
    }

    /// A short label for logging and debug output.
    fn kind(&self) -> &'static str {
        match self {
            RefValue::Validator { .. } => "validator",
            RefValue::Conditional(_) => "conditional",
            RefValue::Parser(_) => "parser",
            RefValue::Transformer(_) => "transformer",
            RefValue::Callback(_) => "callback",
        }
    }
}

impl fmt::Debug for RefValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefValue::Validator { validation } => f
                .debug_struct("Validator")
                .field("options", &validation.options)
                .field("implicit", &validation.rule.implicit)
                .field("is_async", &validation.rule.is_async)
                .finish(),
            other => f.write_str(other.kind()),
        }
    }
}

/// Append-only registry of runtime values referenced by compiled nodes.
#[derive(Debug, Clone, Default)]
pub struct RefsStore {
    entries: Vec<RefValue>,
}

impl RefsStore {
    /// Create an empty store. The first tracked value receives `ref://1`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value and return its identifier.
    pub fn track(&mut self, value: RefValue) -> RefId {
        let id = RefId(self.entries.len() as u32 + 1);
        tracing::trace!(id = %id, kind = value.kind(), "tracking ref");
        self.entries.push(value);
        id
    }

    /// Track a validation's rule + options pair.
    pub fn track_validation(&mut self, validation: Validation) -> RefId {
        self.track(RefValue::Validator { validation })
    }

    /// Track a conditional predicate.
    pub fn track_conditional(&mut self, conditional: ConditionalFn) -> RefId {
        self.track(RefValue::Conditional(conditional))
    }

    /// Track a parse function.
    pub fn track_parser(&mut self, parser: ParseFn) -> RefId {
        self.track(RefValue::Parser(parser))
    }

    /// Track an output transform.
    pub fn track_transformer(&mut self, transformer: TransformFn) -> RefId {
        self.track(RefValue::Transformer(transformer))
    }

    /// Track a no-match fallback callback.
    pub fn track_callback(&mut self, callback: CallbackFn) -> RefId {
        self.track(RefValue::Callback(callback))
    }

    /// Look a value up by id. Returns `None` for ids minted by another store.
    pub fn get(&self, id: &RefId) -> Option<&RefValue> {
        self.entries.get(id.0 as usize - 1)
    }

    /// Number of tracked values.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been tracked yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(id, value)` pairs in tracking order. Intended for
    /// interpreters and test introspection.
    pub fn entries(&self) -> impl Iterator<Item = (RefId, &RefValue)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, v)| (RefId(i as u32 + 1), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn noop_conditional() -> ConditionalFn {
        Arc::new(|_, _| true)
    }

    #[test]
    fn ids_are_monotonic_from_one() {
        let mut refs = RefsStore::new();
        let a = refs.track_conditional(noop_conditional());
        let b = refs.track_conditional(noop_conditional());
        let c = refs.track_parser(Arc::new(|v| v));
        assert_eq!(a.to_string(), "ref://1");
        assert_eq!(b.to_string(), "ref://2");
        assert_eq!(c.to_string(), "ref://3");
        assert_eq!(refs.len(), 3);
    }

    #[test]
    fn lookup_by_id() {
        let mut refs = RefsStore::new();
        let id = refs.track_validation(Validation::with_options(
            crate::validation::ValidationRule::new(Arc::new(|_, _, _| true)),
            serde_json::json!({ "min": 2 }),
        ));
        let entry = refs.get(&id).expect("entry should exist");
        assert_eq!(entry.options(), Some(&serde_json::json!({ "min": 2 })));
    }

    #[test]
    fn lookup_of_foreign_id_is_none() {
        let refs = RefsStore::new();
        assert!(refs.get(&RefId(1)).is_none());
    }

    #[test]
    fn ref_id_round_trips_through_wire_form() {
        let id: RefId = "ref://42".parse().expect("valid id");
        assert_eq!(id.index(), 42);
        assert_eq!(id.to_string(), "ref://42");
        assert_eq!(
            serde_json::to_value(id).expect("serializable"),
            serde_json::json!("ref://42")
        );
    }

    #[test]
    fn ref_id_rejects_malformed_strings() {
        assert!(matches!(
            "42".parse::<RefId>(),
            Err(crate::error::RefIdError::MissingScheme(_))
        ));
        assert!(matches!(
            "ref://".parse::<RefId>(),
            Err(crate::error::RefIdError::InvalidIndex(_))
        ));
        assert!(matches!(
            "ref://0".parse::<RefId>(),
            Err(crate::error::RefIdError::InvalidIndex(_))
        ));
    }

    #[test]
    fn entries_iterate_in_tracking_order() {
        let mut refs = RefsStore::new();
        refs.track_conditional(noop_conditional());
        refs.track_parser(Arc::new(|v| v));
        let kinds: Vec<_> = refs.entries().map(|(id, v)| (id.index(), v.kind())).collect();
        assert_eq!(kinds, vec![(1, "conditional"), (2, "parser")]);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Arc;

    proptest! {
        /// Tracking N values always yields ids 1..=N in order.
        #[test]
        fn tracked_ids_are_dense_and_ordered(n in 0usize..64) {
            let mut refs = RefsStore::new();
            let ids: Vec<u32> = (0..n)
                .map(|_| refs.track_conditional(Arc::new(|_, _| true)).index())
                .collect();
            prop_assert_eq!(ids, (1..=n as u32).collect::<Vec<_>>());
        }

        /// Wire-form round trip holds for every positive index.
        #[test]
        fn wire_round_trip(n in 1u32..=u32::MAX) {
            let text = format!("ref://{n}");
            let id: RefId = text.parse().expect("valid");
            prop_assert_eq!(id.to_string(), text);
        }
    }
}
