//! The converter registry.
//!
//! One `Vec<Binding>` is the source of truth; the key, type and naive-type
//! indexes are derived from it on registration and always agree with it.

use crate::builtin;
use crate::converter::{Binding, Converter, TYPE_FIELD, VALUE_FIELD};
use crate::error::{ConvertError, ConvertResult, RegistrationError};
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tagjson_types::{Map, NativeValue, Value};
use tracing::{debug, trace, warn};

static GLOBAL: OnceLock<Arc<ConverterRegistry>> = OnceLock::new();

/// Types the data tree already represents. A converter for one of these
/// would never be consulted, so registering it is a configuration error.
fn is_json_native(type_id: TypeId) -> bool {
    [
        TypeId::of::<()>(),
        TypeId::of::<bool>(),
        TypeId::of::<String>(),
        TypeId::of::<&'static str>(),
        TypeId::of::<i8>(),
        TypeId::of::<i16>(),
        TypeId::of::<i32>(),
        TypeId::of::<i64>(),
        TypeId::of::<i128>(),
        TypeId::of::<isize>(),
        TypeId::of::<u8>(),
        TypeId::of::<u16>(),
        TypeId::of::<u32>(),
        TypeId::of::<u64>(),
        TypeId::of::<u128>(),
        TypeId::of::<usize>(),
        TypeId::of::<f32>(),
        TypeId::of::<f64>(),
        TypeId::of::<serde_json::Value>(),
        TypeId::of::<serde_json::Number>(),
        TypeId::of::<serde_json::Map<String, serde_json::Value>>(),
        TypeId::of::<Value>(),
        TypeId::of::<Map>(),
        TypeId::of::<Vec<Value>>(),
        TypeId::of::<NativeValue>(),
    ]
    .contains(&type_id)
}

/// Table of converters, looked up by wire key or by exact native type.
#[derive(Debug, Default)]
pub struct ConverterRegistry {
    bindings: Vec<Binding>,
    by_key: HashMap<String, usize>,
    by_type: HashMap<TypeId, usize>,
    by_naive_type: HashMap<TypeId, usize>,
}

impl ConverterRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the five built-in converters.
    ///
    /// # Panics
    ///
    /// Never in practice: the built-in set has distinct keys and types.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .register_builtins()
            .expect("built-in converters have distinct keys and types");
        registry
    }

    /// Registers `date`, `time`, `datetime`, `timedelta` and `uuid`.
    pub fn register_builtins(&mut self) -> Result<(), RegistrationError> {
        self.register(builtin::DateConverter)?;
        self.register(builtin::TimeConverter)?;
        self.register(builtin::DateTimeConverter)?;
        self.register(builtin::TimeDeltaConverter)?;
        self.register(builtin::UuidConverter)?;
        Ok(())
    }

    /// Adds a converter.
    ///
    /// Fails without touching the registry if the key is malformed or taken,
    /// or if the native type (or its naive twin) already has a converter.
    pub fn register<C: Converter>(&mut self, converter: C) -> Result<(), RegistrationError> {
        let binding = Binding::new(converter);
        if let Err(err) = self.validate(&binding) {
            warn!(
                key = binding.key(),
                type_name = binding.type_name(),
                error = %err,
                "Converter registration rejected"
            );
            return Err(err);
        }

        let index = self.bindings.len();
        self.by_key.insert(binding.key().to_string(), index);
        self.by_type.insert(binding.type_id(), index);
        if let Some(naive) = binding.naive_counterpart() {
            self.by_naive_type.insert(naive.type_id(), index);
        }
        debug!(
            key = binding.key(),
            type_name = binding.type_name(),
            "Converter registered"
        );
        self.bindings.push(binding);
        Ok(())
    }

    fn validate(&self, binding: &Binding) -> Result<(), RegistrationError> {
        let key = binding.key();
        if key.is_empty() || key.chars().any(char::is_whitespace) {
            return Err(RegistrationError::InvalidKey(key.to_string()));
        }
        if let Some(existing) = self.converter_for_key(key) {
            return Err(RegistrationError::DuplicateKey {
                key: key.to_string(),
                existing_type: existing.type_name(),
            });
        }
        self.check_type_free(binding.type_id(), binding.type_name())?;

        if let Some(naive) = binding.naive_counterpart() {
            if naive.type_id() == binding.type_id() {
                return Err(RegistrationError::DuplicateType {
                    type_name: naive.type_name(),
                    existing_key: key.to_string(),
                });
            }
            self.check_type_free(naive.type_id(), naive.type_name())?;
        }
        Ok(())
    }

    fn check_type_free(
        &self,
        type_id: TypeId,
        type_name: &'static str,
    ) -> Result<(), RegistrationError> {
        if is_json_native(type_id) {
            return Err(RegistrationError::JsonNativeType { type_name });
        }
        let taken = self
            .by_type
            .get(&type_id)
            .or_else(|| self.by_naive_type.get(&type_id));
        match taken {
            Some(&index) => Err(RegistrationError::DuplicateType {
                type_name,
                existing_key: self.bindings[index].key().to_string(),
            }),
            None => Ok(()),
        }
    }

    // ================================================================
    // Process-wide registry
    // ================================================================

    /// The process-wide registry. Initialised with the built-ins on first
    /// use unless [`install_global`](Self::install_global) ran earlier.
    pub fn global() -> Arc<Self> {
        Arc::clone(GLOBAL.get_or_init(|| {
            debug!("Initialising global converter registry with built-ins");
            Arc::new(Self::with_builtins())
        }))
    }

    /// Makes this registry the process-wide one, closing registration.
    ///
    /// Fails once the global registry has been installed or read.
    pub fn install_global(self) -> Result<Arc<Self>, RegistrationError> {
        let registry = Arc::new(self);
        GLOBAL
            .set(Arc::clone(&registry))
            .map_err(|_| RegistrationError::GlobalAlreadyInstalled)?;
        debug!(converters = registry.len(), "Global converter registry installed");
        Ok(registry)
    }

    // ================================================================
    // Lookup
    // ================================================================

    /// Exact-type lookup. Never matches a related or wrapping type.
    pub fn converter_for_value(&self, value: &NativeValue) -> Option<&Binding> {
        self.by_type
            .get(&value.type_id())
            .map(|&index| &self.bindings[index])
    }

    pub fn converter_for_type<T: 'static>(&self) -> Option<&Binding> {
        self.by_type
            .get(&TypeId::of::<T>())
            .map(|&index| &self.bindings[index])
    }

    pub fn converter_for_key(&self, key: &str) -> Option<&Binding> {
        self.by_key.get(key).map(|&index| &self.bindings[index])
    }

    pub fn key_for_type(&self, type_id: TypeId) -> Option<&str> {
        self.by_type
            .get(&type_id)
            .map(|&index| self.bindings[index].key())
    }

    pub fn type_for_key(&self, key: &str) -> Option<TypeId> {
        self.converter_for_key(key).map(Binding::type_id)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    pub fn contains_type<T: 'static>(&self) -> bool {
        self.by_type.contains_key(&TypeId::of::<T>())
    }

    /// Registered keys, in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(Binding::key)
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    // ================================================================
    // Single-value conversion
    // ================================================================

    fn binding_for_write(&self, value: &NativeValue) -> ConvertResult<&Binding> {
        if let Some(binding) = self.converter_for_value(value) {
            return Ok(binding);
        }
        match self.by_naive_type.get(&value.type_id()) {
            Some(&index) => Err(ConvertError::NaiveTime {
                key: self.bindings[index].key().to_string(),
                type_name: value.type_name(),
            }),
            None => Err(ConvertError::Unconvertible {
                type_name: value.type_name(),
            }),
        }
    }

    /// Encodes a native value into its wire form, without the envelope.
    pub fn value_to_json(&self, value: &NativeValue) -> ConvertResult<serde_json::Value> {
        self.binding_for_write(value)?.encode(value)
    }

    /// Encodes a native value into a `{"__type__": key, "value": ...}` object.
    pub fn wrap(&self, value: &NativeValue) -> ConvertResult<serde_json::Value> {
        let binding = self.binding_for_write(value)?;
        trace!(key = binding.key(), "Wrapping native value");
        binding.wrap(value)
    }

    /// Decodes a full wrapper object back into its native value.
    pub fn json_to_value(&self, wrapper: &serde_json::Value) -> ConvertResult<NativeValue> {
        match wrapper {
            serde_json::Value::Object(object) => self.unwrap(object),
            _ => Err(ConvertError::MissingTypeKey),
        }
    }

    /// Decodes the fields of a wrapper object.
    ///
    /// A `null` value counts as missing. Keys other than `__type__` and
    /// `value` are ignored.
    pub fn unwrap(
        &self,
        object: &serde_json::Map<String, serde_json::Value>,
    ) -> ConvertResult<NativeValue> {
        let key = match object.get(TYPE_FIELD) {
            None => return Err(ConvertError::MissingTypeKey),
            Some(serde_json::Value::String(key)) => key.as_str(),
            Some(other) => return Err(ConvertError::UnknownTypeKey(other.to_string())),
        };
        let wire = match object.get(VALUE_FIELD) {
            None | Some(serde_json::Value::Null) => {
                return Err(ConvertError::MissingValue {
                    key: key.to_string(),
                });
            }
            Some(wire) => wire,
        };
        let binding = self
            .converter_for_key(key)
            .ok_or_else(|| ConvertError::UnknownTypeKey(key.to_string()))?;
        trace!(key, "Unwrapping native value");
        binding.decode(wire)
    }
}
