//! Error types for the codec.

use tagjson_registry::ConvertError;
use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while writing or reading JSON text.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A converter or registry lookup failed. Passed through as-is.
    #[error(transparent)]
    Convert(#[from] ConvertError),

    /// Malformed JSON text, or a failure in the JSON writer.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("encoded JSON is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("invalid codec config: {0}")]
    Config(#[from] toml::de::Error),
}

impl CodecError {
    /// The underlying conversion error, if this is one.
    pub fn as_convert(&self) -> Option<&ConvertError> {
        match self {
            Self::Convert(err) => Some(err),
            _ => None,
        }
    }
}
