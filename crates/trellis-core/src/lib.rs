//! # trellis-core — Compiler Primitives for the Trellis Schema Layer
//!
//! This crate is the contract between the schema-builder layer
//! (`trellis-schema`) and any downstream interpreter that executes compiled
//! schemas against real input. It defines:
//!
//! 1. **The compiler-node model.** [`CompilerNode`] is a plain, serializable,
//!    tagged tree. Runtime functions never appear in it; they are replaced by
//!    [`RefId`] handles into a [`RefsStore`].
//!
//! 2. **The reference store.** An append-only intern table mapping
//!    `ref://<n>` identifiers to opaque runtime values (validators plus their
//!    options, predicates, parse/transform functions, callbacks). Ids are
//!    assigned in strict depth-first traversal order of the builder tree, so
//!    compilation is deterministic and reproducible for a given tree shape.
//!
//! 3. **Field context and helpers.** The minimal runtime context predicates
//!    receive, and the dotted-path/existence helpers the conditionally
//!    required rules are built from.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `trellis-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Compilation support code is total: a well-formed builder tree never
//!   fails to compile.

pub mod camelcase;
pub mod context;
pub mod error;
pub mod nodes;
pub mod refs;
pub mod validation;

// Re-export primary types for ergonomic imports.
pub use camelcase::to_camel_case;
pub use context::{exists, is_missing, nested_lookup, FieldContext};
pub use error::RefIdError;
pub use nodes::{
    ArrayNode, CompilerNode, GroupConditionNode, GroupNode, LiteralNode, LiteralSubtype,
    ObjectNode, RecordNode, SubObjectNode, TupleNode, UnionConditionNode, UnionNode,
    ValidationNode,
};
pub use refs::{RefId, RefValue, RefsStore};
pub use validation::{
    CallbackFn, ConditionalFn, IntoValidation, ParseFn, TransformFn, Validation, ValidationRule,
    ValidatorFn,
};
