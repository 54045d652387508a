//! # The Compilation Protocol
//!
//! Every schema builder — leaf types, composites, and modifiers alike —
//! implements one contract: given the field name it is mounted under, a
//! reference store, and the ambient compile options, produce a compiler
//! node, registering any embedded functions into the store as a side
//! effect.
//!
//! Compilation is a single synchronous depth-first walk. Builders are
//! treated as immutable for the duration of a compile call; give each
//! concurrent compile its own [`RefsStore`].

use trellis_core::{CompilerNode, RefsStore};

use crate::modifiers::{NullableModifier, OptionalModifier};

/// Options threaded through every recursive compile call.
///
/// This is an explicit parameter, not ambient state: a node that opts into
/// camelCase conversion overrides the value for itself and everything
/// compiled beneath it, and nothing outside the call chain is affected.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompileOptions {
    /// Convert `snake_case` field names to `camelCase` property names.
    pub to_camel_case: bool,
}

/// The compile contract implemented by every schema type.
pub trait SchemaType: Send + Sync {
    /// Compile this schema into its node representation.
    ///
    /// `field_name` is the key the schema is mounted under; root schemas
    /// and record/array element schemas use the `'*'` wildcard.
    fn compile(
        &self,
        field_name: &str,
        refs: &mut RefsStore,
        options: &CompileOptions,
    ) -> CompilerNode;

    /// Deep-clone this schema behind a trait object.
    ///
    /// Clones must decouple all mutable builder state: validation lists,
    /// options, child schemas, and attached groups. Rule functions and
    /// their options are shared by reference since they are immutable
    /// after construction.
    fn clone_schema(&self) -> Box<dyn SchemaType>;
}

impl Clone for Box<dyn SchemaType> {
    fn clone(&self) -> Self {
        self.clone_schema()
    }
}

/// Modifier and boxing conveniences available on every sized schema type.
pub trait SchemaExt: SchemaType + Sized + 'static {
    /// Allow the field to be missing. Undefined and null values both pass.
    fn optional(self) -> OptionalModifier {
        OptionalModifier::new(Box::new(self))
    }

    /// Allow the field to be null. The null is written to the output.
    fn nullable(self) -> NullableModifier {
        NullableModifier::new(Box::new(self))
    }

    /// Erase the concrete type for storage in a composite.
    fn boxed(self) -> Box<dyn SchemaType> {
        Box::new(self)
    }
}

impl<T: SchemaType + 'static> SchemaExt for T {}
