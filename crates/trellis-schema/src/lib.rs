//! # trellis-schema — Fluent Schema Builders
//!
//! The user-facing layer of the Trellis schema compiler. Builders are
//! assembled fluently, cloned freely (clones are fully isolated), and
//! compiled into the serializable node tree defined by `trellis-core`:
//!
//! ```
//! use trellis_schema::{object, string, number};
//! use trellis_schema::{CompileOptions, SchemaType};
//! use trellis_core::RefsStore;
//!
//! let schema = object()
//!     .field("username", string())
//!     .field("age", number());
//!
//! let mut refs = RefsStore::new();
//! let node = schema.compile("", &mut refs, &CompileOptions::default());
//! assert_eq!(refs.len(), 2);
//! assert_eq!(node.to_value()["type"], "object");
//! ```
//!
//! Compilation is a single depth-first walk. Each embedded runtime function
//! (validators with their options, predicates, parse/transform callbacks)
//! is interned into the [`RefsStore`](trellis_core::RefsStore) as it is
//! reached, so ref ids are dense, ordered, and reproducible for a given
//! tree shape.
//!
//! ## Crate Policy
//!
//! - Builders own their state exclusively; sharing happens by cloning.
//! - Compilation never fails for a well-formed builder tree.
//! - No `unsafe` code, no `panic!()` or `.unwrap()` outside tests.

pub mod array;
mod fields;
pub mod group;
pub mod literals;
pub mod modifiers;
pub mod object;
pub mod record;
pub mod rules;
pub mod schema_type;
pub mod tuple;
pub mod union;

pub use array::ArrayType;
pub use group::Group;
pub use literals::{
    AnyType, BooleanType, CustomType, DateType, EnumType, LiteralType, NumberType, StringType,
};
pub use modifiers::{NullableModifier, OptionalModifier};
pub use object::ObjectType;
pub use record::RecordType;
pub use rules::Comparison;
pub use schema_type::{CompileOptions, SchemaExt, SchemaType};
pub use tuple::TupleType;
pub use union::UnionType;

use serde_json::Value;

use trellis_core::IntoValidation;

/// A string field.
pub fn string() -> StringType {
    StringType::new()
}

/// A number field.
pub fn number() -> NumberType {
    NumberType::new()
}

/// A boolean field.
pub fn boolean() -> BooleanType {
    BooleanType::new()
}

/// A date field.
pub fn date() -> DateType {
    DateType::new()
}

/// A field that accepts anything.
pub fn any() -> AnyType {
    AnyType::new()
}

/// A field that must equal `expected`.
pub fn literal(expected: Value) -> LiteralType {
    LiteralType::new(expected)
}

/// A field constrained to `members`.
pub fn enum_of(members: Vec<Value>) -> EnumType {
    EnumType::new(members)
}

/// A field validated by a caller-supplied rule.
pub fn custom(validation: impl IntoValidation) -> CustomType {
    CustomType::new(validation)
}

/// An object with a known set of properties.
pub fn object() -> ObjectType {
    ObjectType::new()
}

/// An array validating every element against `each`.
pub fn array(each: impl SchemaType + 'static) -> ArrayType {
    ArrayType::new(each)
}

/// A fixed-arity tuple with per-position schemas.
pub fn tuple(elements: Vec<Box<dyn SchemaType>>) -> TupleType {
    TupleType::new(elements)
}

/// An object with unknown keys and one value schema.
pub fn record(each: impl SchemaType + 'static) -> RecordType {
    RecordType::new(each)
}

/// A predicate-guarded union of alternatives.
pub fn union() -> UnionType {
    UnionType::new()
}

/// A conditional property bundle for an object.
pub fn group() -> Group {
    Group::new()
}
