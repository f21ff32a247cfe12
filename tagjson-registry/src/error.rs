//! Error types for registration and conversion.

use thiserror::Error;

/// Result type for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Errors raised while building a registry. These are configuration errors
/// and should surface at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("invalid converter key {0:?}: keys must be non-empty and contain no whitespace")]
    InvalidKey(String),

    #[error("converter key '{key}' is already registered for {existing_type}")]
    DuplicateKey {
        key: String,
        existing_type: &'static str,
    },

    #[error("{type_name} already has a converter registered under '{existing_key}'")]
    DuplicateType {
        type_name: &'static str,
        existing_key: String,
    },

    #[error("{type_name} is represented natively by the JSON tree and cannot have a converter")]
    JsonNativeType { type_name: &'static str },

    #[error("global converter registry is already installed")]
    GlobalAlreadyInstalled,
}

/// Why a converter rejected a wire value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodingErrorKind {
    #[error("expected a JSON string, found {0}")]
    NotAString(&'static str),

    #[error("does not match the {expected} format")]
    Format { expected: &'static str },

    #[error("timezone is missing")]
    MissingTimezone,

    #[error("value is out of range")]
    OutOfRange,
}

/// A converter failed to decode its wire representation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot decode '{key}' from {input}: {kind}")]
pub struct DecodingError {
    /// Key of the converter that failed.
    pub key: String,
    /// The offending wire value, rendered as JSON.
    pub input: String,
    pub kind: DecodingErrorKind,
}

impl DecodingError {
    pub fn new(key: &str, input: &serde_json::Value, kind: DecodingErrorKind) -> Self {
        Self {
            key: key.to_string(),
            input: input.to_string(),
            kind,
        }
    }
}

/// Errors that can occur converting between native values and JSON.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    #[error("cannot convert value of type {type_name}: no converter registered")]
    Unconvertible { type_name: &'static str },

    #[error("no converter registered for type key {0:?}")]
    UnknownTypeKey(String),

    #[error("wrapper object has no '__type__' key")]
    MissingTypeKey,

    #[error("wrapper object for '{key}' has no value")]
    MissingValue { key: String },

    #[error(transparent)]
    Decoding(#[from] DecodingError),

    #[error("'{key}' requires a timezone-aware value, got naive {type_name}")]
    NaiveTime {
        key: String,
        type_name: &'static str,
    },

    #[error("converter '{key}' expects {expected}, got {found}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("cannot encode '{key}' value: {reason}")]
    Encoding { key: String, reason: String },
}

impl ConvertError {
    pub fn encoding(key: &str, reason: impl Into<String>) -> Self {
        Self::Encoding {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}
