//! The round-trip codec.
//!
//! serde_json is the text layer. This module supplies the two substitution
//! steps around it: native values become wrapper objects on the way out,
//! wrapper objects become native values on the way in.

use crate::config::CodecConfig;
use crate::error::CodecResult;
use serde::Serialize;
use std::sync::Arc;
use tagjson_registry::{ConverterRegistry, TYPE_FIELD};
use tagjson_types::{Map, NativeValue, Value};
use tracing::trace;

/// Writes and reads JSON text using one converter registry.
#[derive(Debug, Clone)]
pub struct Codec {
    registry: Arc<ConverterRegistry>,
    config: CodecConfig,
}

impl Codec {
    pub fn new(registry: Arc<ConverterRegistry>) -> Self {
        Self::with_config(registry, CodecConfig::default())
    }

    pub fn with_config(registry: Arc<ConverterRegistry>, config: CodecConfig) -> Self {
        Self { registry, config }
    }

    /// A codec over the process-wide registry with default settings.
    pub fn global() -> Self {
        Self::new(ConverterRegistry::global())
    }

    pub fn registry(&self) -> &ConverterRegistry {
        &self.registry
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    // ================================================================
    // Substitution hooks
    // ================================================================

    /// Replaces a native value with its wrapper object.
    ///
    /// Fails if the value's type has no converter; nothing is dropped.
    pub fn write_substitute(&self, value: &NativeValue) -> CodecResult<serde_json::Value> {
        trace!(type_name = value.type_name(), "Substituting native value");
        Ok(self.registry.wrap(value)?)
    }

    /// Inspects a decoded object. Returns `None` for ordinary objects
    /// (no `__type__` key), or the native value a wrapper stands for.
    ///
    /// Wrappers are recognised top-down: `object` is inspected before any of
    /// its children are decoded, so a wrapper nested inside another wrapper's
    /// `value` reaches that converter as a plain JSON object, not as a native
    /// value. Converters that nest wrappers unwrap them with
    /// [`ConverterRegistry::json_to_value`] themselves.
    pub fn read_substitute(
        &self,
        object: &serde_json::Map<String, serde_json::Value>,
    ) -> CodecResult<Option<NativeValue>> {
        if !object.contains_key(TYPE_FIELD) {
            return Ok(None);
        }
        Ok(Some(self.registry.unwrap(object)?))
    }

    // ================================================================
    // Tree <-> JSON
    // ================================================================

    /// Converts a tree into plain JSON, wrapping every native value.
    pub fn to_json(&self, tree: &Value) -> CodecResult<serde_json::Value> {
        Ok(match tree {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::Number(n.clone()),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => serde_json::Value::Array(
                items
                    .iter()
                    .map(|item| self.to_json(item))
                    .collect::<CodecResult<_>>()?,
            ),
            Value::Object(map) => {
                let mut object = serde_json::Map::with_capacity(map.len());
                for (key, value) in map {
                    object.insert(key.clone(), self.to_json(value)?);
                }
                serde_json::Value::Object(object)
            }
            Value::Native(native) => self.write_substitute(native)?,
        })
    }

    /// Converts plain JSON into a tree, unwrapping every wrapper object.
    ///
    /// A wrapper's `value` is handed to its converter as raw JSON; see
    /// [`Codec::read_substitute`].
    pub fn from_json(&self, json: serde_json::Value) -> CodecResult<Value> {
        Ok(match json {
            serde_json::Value::Object(object) => match self.read_substitute(&object)? {
                Some(native) => Value::Native(native),
                None => Value::Object(
                    object
                        .into_iter()
                        .map(|(key, value)| Ok((key, self.from_json(value)?)))
                        .collect::<CodecResult<Map>>()?,
                ),
            },
            serde_json::Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| self.from_json(item))
                    .collect::<CodecResult<_>>()?,
            ),
            other => Value::from(other),
        })
    }

    // ================================================================
    // Text
    // ================================================================

    /// Serializes a tree to JSON text. Object keys keep their order.
    pub fn dumps(&self, tree: &Value) -> CodecResult<String> {
        let json = self.to_json(tree)?;
        if !self.config.pretty {
            return Ok(serde_json::to_string(&json)?);
        }
        let indent = " ".repeat(self.config.indent);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
        let mut out = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        json.serialize(&mut serializer)?;
        Ok(String::from_utf8(out)?)
    }

    /// Parses JSON text into a tree, restoring native values.
    pub fn loads(&self, text: &str) -> CodecResult<Value> {
        let json: serde_json::Value = serde_json::from_str(text)?;
        self.from_json(json)
    }

    // ================================================================
    // Single values
    // ================================================================

    /// Encodes one native value into its bare wire form.
    pub fn value_to_json(&self, value: &NativeValue) -> CodecResult<serde_json::Value> {
        Ok(self.registry.value_to_json(value)?)
    }

    /// Decodes one wrapper object into its native value.
    pub fn json_to_value(&self, wrapper: &serde_json::Value) -> CodecResult<NativeValue> {
        Ok(self.registry.json_to_value(wrapper)?)
    }
}
