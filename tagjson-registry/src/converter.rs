//! The converter capability and its type-erased binding.

use crate::error::{ConvertError, ConvertResult};
use std::any::TypeId;
use std::fmt;
use tagjson_types::{NativeType, NativeValue};

/// Wire field holding the converter key.
pub const TYPE_FIELD: &str = "__type__";
/// Wire field holding the encoded value.
pub const VALUE_FIELD: &str = "value";

/// Binds one native type to a wire key and an encode/decode pair.
///
/// `decode(encode(v))` must equal `v` for every value `encode` accepts.
pub trait Converter: Send + Sync + 'static {
    /// The exact runtime type this converter handles.
    type Native: NativeType;

    /// Stable wire discriminator, written to `__type__`.
    fn key(&self) -> &str;

    /// Encodes a native value into the JSON placed under `value`.
    fn encode(&self, value: &Self::Native) -> ConvertResult<serde_json::Value>;

    /// Decodes the JSON found under `value` back into a native value.
    fn decode(&self, wire: &serde_json::Value) -> ConvertResult<Self::Native>;

    /// Timezone-less twin of an aware native type. Values of this type are
    /// rejected with [`ConvertError::NaiveTime`] instead of being reported as
    /// unconvertible.
    ///
    /// The twin type is reserved by this converter: registering another
    /// converter whose native type is the twin fails with
    /// [`RegistrationError::DuplicateType`], whatever its key. With the
    /// built-ins installed this reserves `NaiveTime` and `NaiveDateTime`.
    ///
    /// [`RegistrationError::DuplicateType`]: crate::RegistrationError::DuplicateType
    fn naive_counterpart(&self) -> Option<NaiveCounterpart> {
        None
    }
}

/// Identifies the naive twin of an aware native type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NaiveCounterpart {
    type_id: TypeId,
    type_name: &'static str,
}

impl NaiveCounterpart {
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }
}

trait ErasedConverter: Send + Sync {
    fn encode(&self, value: &NativeValue) -> ConvertResult<serde_json::Value>;
    fn decode(&self, wire: &serde_json::Value) -> ConvertResult<NativeValue>;
}

impl<C: Converter> ErasedConverter for C {
    fn encode(&self, value: &NativeValue) -> ConvertResult<serde_json::Value> {
        let native = value
            .downcast_ref::<C::Native>()
            .ok_or_else(|| ConvertError::TypeMismatch {
                key: self.key().to_string(),
                expected: std::any::type_name::<C::Native>(),
                found: value.type_name(),
            })?;
        Converter::encode(self, native)
    }

    fn decode(&self, wire: &serde_json::Value) -> ConvertResult<NativeValue> {
        Converter::decode(self, wire).map(NativeValue::new)
    }
}

/// A registered converter with its type information erased.
pub struct Binding {
    key: String,
    type_id: TypeId,
    type_name: &'static str,
    naive: Option<NaiveCounterpart>,
    converter: Box<dyn ErasedConverter>,
}

impl Binding {
    pub(crate) fn new<C: Converter>(converter: C) -> Self {
        Self {
            key: converter.key().to_string(),
            type_id: TypeId::of::<C::Native>(),
            type_name: std::any::type_name::<C::Native>(),
            naive: converter.naive_counterpart(),
            converter: Box::new(converter),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn naive_counterpart(&self) -> Option<NaiveCounterpart> {
        self.naive
    }

    /// Encodes a value, which must be exactly this binding's native type.
    pub fn encode(&self, value: &NativeValue) -> ConvertResult<serde_json::Value> {
        self.converter.encode(value)
    }

    pub fn decode(&self, wire: &serde_json::Value) -> ConvertResult<NativeValue> {
        self.converter.decode(wire)
    }

    /// Encodes a value and wraps it in a `{"__type__", "value"}` envelope.
    pub fn wrap(&self, value: &NativeValue) -> ConvertResult<serde_json::Value> {
        let encoded = self.encode(value)?;
        let mut envelope = serde_json::Map::with_capacity(2);
        envelope.insert(TYPE_FIELD.to_string(), serde_json::Value::String(self.key.clone()));
        envelope.insert(VALUE_FIELD.to_string(), encoded);
        Ok(serde_json::Value::Object(envelope))
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("key", &self.key)
            .field("type_name", &self.type_name)
            .field("naive", &self.naive.map(|n| n.type_name))
            .finish()
    }
}
