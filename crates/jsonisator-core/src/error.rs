//! Error types for descriptor construction, parsing, and mapping.

use std::fmt;

use thiserror::Error;

/// A type's shape could not be described.
///
/// Raised by [`crate::Record::descriptor`], so it surfaces before any
/// rendering or parsing work starts. Cloneable because a failed descriptor is
/// memoized and replayed to every later caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    /// A map key kind has no single-token string form.
    #[error("{type_name}.{field}: map key kind `{found}` has no string form")]
    UnsupportedMapKey {
        type_name: String,
        field: String,
        found: String,
    },

    #[error("{type_name}: field `{field}` is declared more than once")]
    DuplicateField { type_name: String, field: String },

    #[error("{type_name}: field names must not be empty")]
    EmptyFieldName { type_name: String },

    /// The type contains itself, so no finite descriptor exists.
    #[error("{type_name} contains itself and cannot be described")]
    RecursiveType { type_name: String },
}

/// Errors returned by the render and parse entry points.
#[derive(Error, Debug)]
pub enum MapperError {
    #[error("descriptor error: {0}")]
    Descriptor(#[from] DescriptorError),

    /// Malformed JSON text. `offset` is a byte offset into the input.
    #[error("JSON syntax error at byte {offset}: expected {expected}, found {found}")]
    Syntax {
        offset: usize,
        expected: String,
        found: String,
    },

    #[error("JSON nesting exceeds {max} levels at byte {offset}")]
    NestingTooDeep { offset: usize, max: usize },

    #[error("input is {len} bytes, limit is {max}")]
    InputTooLarge { len: usize, max: usize },

    /// A JSON value variant does not match the kind declared for the field.
    #[error("shape mismatch at `{path}`: expected {expected}, found {found}")]
    ShapeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    /// A textual value does not satisfy its declared grammar.
    #[error("cannot convert {text:?} to {kind} at `{path}`: {reason}")]
    Conversion {
        path: String,
        kind: String,
        text: String,
        reason: String,
    },
}

impl MapperError {
    pub(crate) fn shape(
        path: impl fmt::Display,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        MapperError::ShapeMismatch {
            path: path.to_string(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Fill in the location of an error that was raised without one.
    pub(crate) fn at(self, location: &impl fmt::Display) -> Self {
        match self {
            MapperError::ShapeMismatch {
                path,
                expected,
                found,
            } if path.is_empty() => MapperError::ShapeMismatch {
                path: location.to_string(),
                expected,
                found,
            },
            MapperError::Conversion {
                path,
                kind,
                text,
                reason,
            } if path.is_empty() => MapperError::Conversion {
                path: location.to_string(),
                kind,
                text,
                reason,
            },
            other => other,
        }
    }
}

/// Convenience alias used throughout jsonisator-core.
pub type Result<T> = std::result::Result<T, MapperError>;
