//! Error types for the rest.li codec.
//!
//! - [`EncodeError`]: a value could not be written by a [`Writer`](super::Writer)
//! - [`DecodeError`]: a payload was malformed or did not match the expected shape
//! - [`MissingRequiredFieldsError`]: a well-formed payload lacked required fields
//! - [`PathSpecError`]: a projection path was malformed

use std::any::Any;
use std::fmt;

use thiserror::Error;

/// Error returned when a value cannot be serialized.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// NaN and infinities have no JSON or ROR2 representation.
    #[error("Cannot encode non-finite number {value} at '{path}'.")]
    NonFiniteNumber {
        /// Rendered value (`NaN`, `inf`, `-inf`).
        value: String,
        /// Dotted path of the field being written.
        path: String,
    },

    /// A resource path was built with an empty root resource name.
    #[error("Root resource name cannot be empty.")]
    EmptyRootResource,

    /// A resource path segment was empty.
    #[error("Sub-resource name cannot be empty (parent path '{parent}').")]
    EmptySubResource {
        /// The path rendered so far.
        parent: String,
    },

    /// A path segment rendered as `.` or `..`, which URL resolution would
    /// collapse into a different resource.
    #[error("Path segment '{segment}' is a dot segment (parent path '{parent}').")]
    DotSegment {
        /// The rendered segment.
        segment: String,
        /// The path rendered so far.
        parent: String,
    },

    /// The marshaler reported a failure of its own.
    #[error("Cannot encode value: {message}")]
    Custom {
        /// Free-form description.
        message: String,
    },
}

impl EncodeError {
    /// Creates a [`EncodeError::Custom`] from any message.
    #[must_use]
    pub fn custom(message: impl fmt::Display) -> Self {
        Self::Custom {
            message: message.to_string(),
        }
    }
}

/// Error returned when a payload cannot be decoded.
///
/// The `path` field is the dotted location of the failing value relative to
/// the document root (`""` for the root itself, `elements.2.name` for a nested
/// field).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The input is not syntactically valid JSON.
    #[error("Malformed JSON payload: {message}")]
    MalformedJson {
        /// Parser message, including line and column.
        message: String,
    },

    /// The input is not syntactically valid ROR2 text.
    #[error("Malformed ROR2 value at offset {offset}: {message}")]
    MalformedRor2 {
        /// Byte offset of the offending character.
        offset: usize,
        /// What the parser expected.
        message: String,
    },

    /// A value had the wrong type.
    #[error("Expected {expected} at '{path}', found {found}.")]
    UnexpectedType {
        /// Dotted path of the value.
        path: String,
        /// Expected rest.li type.
        expected: &'static str,
        /// Actual JSON type.
        found: &'static str,
    },

    /// A numeric value did not fit the target type or could not be parsed.
    #[error("Invalid {expected} value '{value}' at '{path}'.")]
    InvalidNumber {
        /// Dotted path of the value.
        path: String,
        /// Target numeric type.
        expected: &'static str,
        /// Rendered input.
        value: String,
    },

    /// A string used as rest.li `bytes` held a code point above U+00FF.
    #[error("Invalid bytes value at '{path}': code point {code_point:#x} exceeds 0xff.")]
    InvalidBytes {
        /// Dotted path of the value.
        path: String,
        /// Offending code point.
        code_point: u32,
    },

    /// An enum symbol was not recognized.
    #[error("Unknown symbol '{symbol}' at '{path}'.")]
    UnknownSymbol {
        /// Dotted path of the value.
        path: String,
        /// The unrecognized symbol.
        symbol: String,
    },

    /// The unmarshaler reported a failure of its own.
    #[error("Cannot decode value at '{path}': {message}")]
    Custom {
        /// Dotted path of the value.
        path: String,
        /// Free-form description.
        message: String,
    },
}

/// Error returned when required fields are absent from an otherwise valid payload.
///
/// The decoded value is still produced; when this error is surfaced by the
/// client under strict deserialization, the partial value travels with it
/// and can be recovered with [`partial_value`](Self::partial_value).
#[derive(Error)]
#[error("Missing required fields: {}", .fields.join(", "))]
pub struct MissingRequiredFieldsError {
    /// Dotted paths of the missing fields, in the order they were detected.
    pub fields: Vec<String>,
    partial: Option<Box<dyn Any + Send + Sync>>,
}

impl MissingRequiredFieldsError {
    /// Creates an error for the given missing fields, without a partial value.
    #[must_use]
    pub fn new(fields: Vec<String>) -> Self {
        Self {
            fields,
            partial: None,
        }
    }

    /// Attaches the partially populated value.
    #[must_use]
    pub fn with_partial_value<V: Send + Sync + 'static>(mut self, value: V) -> Self {
        self.partial = Some(Box::new(value));
        self
    }

    /// Returns the partially decoded value, if one was attached and has type `V`.
    #[must_use]
    pub fn partial_value<V: 'static>(&self) -> Option<&V> {
        self.partial.as_ref()?.downcast_ref::<V>()
    }

    /// Takes the partially decoded value out of the error.
    #[must_use]
    pub fn into_partial_value<V: 'static>(self) -> Option<V> {
        self.partial?.downcast::<V>().ok().map(|value| *value)
    }
}

impl fmt::Debug for MissingRequiredFieldsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MissingRequiredFieldsError")
            .field("fields", &self.fields)
            .field("has_partial_value", &self.partial.is_some())
            .finish()
    }
}

/// Error returned when a projection path is malformed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathSpecError {
    /// The path was empty.
    #[error("Projection path cannot be empty.")]
    EmptyPath,

    /// The path contained an empty segment (e.g. `a//b` or a trailing `/`).
    #[error("Projection path '{path}' contains an empty segment.")]
    EmptySegment {
        /// The offending path.
        path: String,
    },
}
