// Named references to implementation types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Name of an implementation type, as written in configuration.
///
/// Registries key singletons, constructors and named beans by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRef(String);

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Reference a Rust type by its type name.
    pub fn of<T: ?Sized>() -> Self {
        Self(std::any::type_name::<T>().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeRef {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// One configurable aspect of a client in an override layer.
pub enum Component<C: ?Sized> {
    /// Not mentioned by the layer; lower layers show through.
    Unset,
    /// A ready instance.
    Instance(Arc<C>),
    /// A type to look up or instantiate when the layer is applied.
    Type(TypeRef),
}

impl<C: ?Sized> Component<C> {
    pub fn is_set(&self) -> bool {
        !matches!(self, Self::Unset)
    }
}

impl<C: ?Sized> Default for Component<C> {
    fn default() -> Self {
        Self::Unset
    }
}

impl<C: ?Sized> Clone for Component<C> {
    fn clone(&self) -> Self {
        match self {
            Self::Unset => Self::Unset,
            Self::Instance(instance) => Self::Instance(instance.clone()),
            Self::Type(type_ref) => Self::Type(type_ref.clone()),
        }
    }
}

impl<C: ?Sized> From<Option<TypeRef>> for Component<C> {
    fn from(type_ref: Option<TypeRef>) -> Self {
        type_ref.map_or(Self::Unset, Self::Type)
    }
}

impl<C: ?Sized> fmt::Debug for Component<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => f.write_str("Unset"),
            Self::Instance(_) => f.write_str("Instance"),
            Self::Type(type_ref) => f.debug_tuple("Type").field(type_ref).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker;

    #[test]
    fn test_type_ref_of() {
        assert!(TypeRef::of::<Marker>().as_str().ends_with("Marker"));
        assert_eq!(TypeRef::from("fast-retry").to_string(), "fast-retry");
    }

    #[test]
    fn test_component_from_optional_type() {
        let unset: Component<str> = None.into();
        let typed: Component<str> = Some(TypeRef::new("strict")).into();

        assert!(!unset.is_set());
        assert!(matches!(typed, Component::Type(ref t) if t.as_str() == "strict"));
    }
}
