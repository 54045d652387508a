//! # Error Types
//!
//! Structured errors for the compiler primitives, derived with `thiserror`.
//!
//! The surface is deliberately small: schema compilation is total (a
//! well-formed builder tree never fails to compile), and builder misuse is
//! rejected at the type level rather than at runtime. What remains fallible
//! is parsing ref identifiers back from their wire form, which only happens
//! when a compiled tree is deserialized.

use thiserror::Error;

/// Error parsing a reference identifier from its `ref://<n>` wire form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RefIdError {
    /// The string did not start with the `ref://` scheme.
    #[error("invalid ref id '{0}': expected the 'ref://' prefix")]
    MissingScheme(String),

    /// The suffix was not a positive integer.
    #[error("invalid ref id '{0}': expected a positive integer suffix")]
    InvalidIndex(String),
}
