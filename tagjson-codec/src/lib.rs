//! Round-trip JSON codec for trees carrying native values.
//!
//! [`Codec::dumps`] writes a [`Value`] tree as JSON text, replacing each
//! native value with a `{"__type__": key, "value": ...}` wrapper built by its
//! registered converter. [`Codec::loads`] parses JSON text and turns every
//! recognised wrapper back into the native value; all other data passes
//! through untouched.
//!
//! The free functions in this module use the process-wide registry
//! ([`ConverterRegistry::global`]).

mod codec;
mod config;
mod error;

pub use codec::Codec;
pub use config::CodecConfig;
pub use error::{CodecError, CodecResult};

pub use tagjson_registry::{
    ConvertError, ConvertResult, Converter, ConverterRegistry, DecodingError, DecodingErrorKind,
    RegistrationError,
};
pub use tagjson_types::{Map, NativeValue, OffsetTime, Value};

/// Serializes a tree with the process-wide registry.
pub fn dumps(tree: &Value) -> CodecResult<String> {
    Codec::global().dumps(tree)
}

/// Parses JSON text with the process-wide registry.
pub fn loads(text: &str) -> CodecResult<Value> {
    Codec::global().loads(text)
}

/// Encodes one native value into its bare wire form.
pub fn value_to_json(value: &NativeValue) -> CodecResult<serde_json::Value> {
    Ok(ConverterRegistry::global().value_to_json(value)?)
}

/// Decodes one wrapper object into its native value.
pub fn json_to_value(wrapper: &serde_json::Value) -> CodecResult<NativeValue> {
    Ok(ConverterRegistry::global().json_to_value(wrapper)?)
}
