//! Converter registry for tagged JSON values.
//!
//! A [`Converter`] binds one native Rust type to a short wire key and a pair
//! of pure functions. The [`ConverterRegistry`] holds the bindings, enforces
//! that keys and types are unique, and answers lookups in both directions:
//!
//! - by native value, when writing (`{"__type__": key, "value": ...}`)
//! - by key, when reading a wrapper object back into a native value
//!
//! The five built-in converters (`date`, `time`, `datetime`, `timedelta`,
//! `uuid`) live in [`builtin`].

pub mod builtin;
mod converter;
mod error;
mod registry;

pub use converter::{Binding, Converter, NaiveCounterpart, TYPE_FIELD, VALUE_FIELD};
pub use error::{
    ConvertError, ConvertResult, DecodingError, DecodingErrorKind, RegistrationError,
};
pub use registry::ConverterRegistry;
