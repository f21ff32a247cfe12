//! Type-erased native values carried inside a [`Value`](crate::Value) tree.
//!
//! Lookup in the converter registry is by exact runtime type, so a native
//! value keeps its concrete [`TypeId`] and never matches a "related" type.

use std::any::{Any, TypeId};
use std::fmt;

/// Capability a type needs to travel through the tree as a native value.
///
/// Implemented automatically for every `'static` type that is
/// `Debug + Clone + PartialEq + Send + Sync`.
pub trait NativeType: Any + fmt::Debug + Send + Sync {
    /// Returns `self` as `&dyn Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Clones the value behind a fresh box.
    fn clone_boxed(&self) -> Box<dyn NativeType>;

    /// Equality across erased values: same concrete type and equal value.
    fn eq_native(&self, other: &dyn NativeType) -> bool;

    /// Fully qualified name of the concrete type, for diagnostics.
    fn native_type_name(&self) -> &'static str;
}

impl<T> NativeType for T
where
    T: Any + fmt::Debug + Clone + PartialEq + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_boxed(&self) -> Box<dyn NativeType> {
        Box::new(self.clone())
    }

    fn eq_native(&self, other: &dyn NativeType) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn native_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// A value of some registered (or unregistered) native type.
pub struct NativeValue(Box<dyn NativeType>);

impl NativeValue {
    /// Wraps a native value. Wrapping a `NativeValue` again is a no-op.
    #[must_use]
    pub fn new<T: NativeType>(value: T) -> Self {
        if let Some(inner) = (&value as &dyn Any).downcast_ref::<NativeValue>() {
            return inner.clone();
        }
        Self(Box::new(value))
    }

    /// Exact runtime type of the wrapped value.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.0.as_any().type_id()
    }

    /// Name of the wrapped value's type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.0.native_type_name()
    }

    /// Returns true if the wrapped value is exactly a `T`.
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.0.as_any().is::<T>()
    }

    /// Borrows the wrapped value as a `T` if it is exactly that type.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }
}

impl Clone for NativeValue {
    fn clone(&self) -> Self {
        Self(self.0.clone_boxed())
    }
}

impl PartialEq for NativeValue {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_native(&*other.0)
    }
}

impl fmt::Debug for NativeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}
