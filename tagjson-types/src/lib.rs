//! Core type definitions for tagjson.
//!
//! This crate defines the data that flows through the converter registry and
//! the round-trip codec:
//! - [`Value`], the JSON-shaped tree that may also carry native values
//! - [`NativeValue`], a type-erased value matched by exact runtime type
//! - [`OffsetTime`], a time of day pinned to a fixed UTC offset
//!
//! Nothing here knows about wire keys or converters; those live in
//! `tagjson-registry`.

mod native;
mod time;
mod value;

pub use native::{NativeType, NativeValue};
pub use time::OffsetTime;
pub use value::{Map, Value};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid time of day: {0}")]
    InvalidTime(String),

    #[error("time of day has no UTC offset: {0}")]
    MissingOffset(String),

    #[error("invalid UTC offset: {0}")]
    InvalidOffset(String),
}
