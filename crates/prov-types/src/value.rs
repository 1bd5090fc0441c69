use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::ValueError;
use crate::model_type::{ModelType, TypeRegistry};

/// Reference to a composite object held in a model store.
///
/// A `TypedValue` is an immutable `(id, type)` pair. Two typed values are
/// equal when both components are equal. The namespace and store are
/// implied by where the value is held.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "TypedValueRepr")]
pub struct TypedValue {
    id: String,
    ty: ModelType,
}

impl TypedValue {
    /// Build a typed reference, checking `ty` against `registry`.
    pub fn new(
        id: impl Into<String>,
        ty: ModelType,
        registry: &dyn TypeRegistry,
    ) -> Result<Self, ValueError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValueError::MissingIdentifier);
        }
        if !registry.contains(&ty) {
            return Err(ValueError::UnregisteredType(ty));
        }
        Ok(Self { id, ty })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn ty(&self) -> &ModelType {
        &self.ty
    }

    pub fn into_parts(self) -> (String, ModelType) {
        (self.id, self.ty)
    }
}

#[derive(Deserialize)]
struct TypedValueRepr {
    id: String,
    ty: ModelType,
}

/// Deserialized values keep the non-empty id rule. Type registration is
/// checked where the value is used, since no registry is at hand here.
impl TryFrom<TypedValueRepr> for TypedValue {
    type Error = ValueError;

    fn try_from(repr: TypedValueRepr) -> Result<Self, Self::Error> {
        if repr.id.is_empty() {
            return Err(ValueError::MissingIdentifier);
        }
        Ok(Self {
            id: repr.id,
            ty: repr.ty,
        })
    }
}

impl fmt::Debug for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypedValue({}: {})", self.id, self.ty)
    }
}

/// Anything identified by a single URI: enum constants, literal singletons,
/// reference types, external element stubs and the bare
/// [`IndividualUriValue`] itself.
pub trait IndividualUri {
    fn individual_uri(&self) -> &str;

    /// The lightweight, URI-only form of this value.
    fn to_uri_value(&self) -> IndividualUriValue {
        IndividualUriValue {
            uri: self.individual_uri().to_string(),
        }
    }
}

/// A bare URI-identified leaf value.
///
/// This is the form persisted in a store. Equality and hashing use only the
/// URI, and [`impl_individual_uri_eq!`](crate::impl_individual_uri_eq) makes
/// any inflated representation compare equal to it.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "IndividualUriRepr")]
pub struct IndividualUriValue {
    uri: String,
}

impl IndividualUriValue {
    pub fn new(uri: impl Into<String>) -> Result<Self, ValueError> {
        let uri = uri.into();
        if uri.is_empty() {
            return Err(ValueError::MissingUri);
        }
        Ok(Self { uri })
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }
}

#[derive(Deserialize)]
struct IndividualUriRepr {
    uri: String,
}

impl TryFrom<IndividualUriRepr> for IndividualUriValue {
    type Error = ValueError;

    fn try_from(repr: IndividualUriRepr) -> Result<Self, Self::Error> {
        Self::new(repr.uri)
    }
}

impl IndividualUri for IndividualUriValue {
    fn individual_uri(&self) -> &str {
        &self.uri
    }
}

impl fmt::Debug for IndividualUriValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IndividualUriValue({})", self.uri)
    }
}

impl fmt::Display for IndividualUriValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

/// Implements URI-only equality and hashing for a type implementing
/// [`IndividualUri`], plus equality with [`IndividualUriValue`] in both
/// directions.
#[macro_export]
macro_rules! impl_individual_uri_eq {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl ::std::cmp::PartialEq for $ty {
                fn eq(&self, other: &Self) -> bool {
                    $crate::IndividualUri::individual_uri(self)
                        == $crate::IndividualUri::individual_uri(other)
                }
            }

            impl ::std::cmp::Eq for $ty {}

            impl ::std::hash::Hash for $ty {
                fn hash<H: ::std::hash::Hasher>(&self, state: &mut H) {
                    ::std::hash::Hash::hash($crate::IndividualUri::individual_uri(self), state);
                }
            }

            impl ::std::cmp::PartialEq<$crate::IndividualUriValue> for $ty {
                fn eq(&self, other: &$crate::IndividualUriValue) -> bool {
                    $crate::IndividualUri::individual_uri(self) == other.uri()
                }
            }

            impl ::std::cmp::PartialEq<$ty> for $crate::IndividualUriValue {
                fn eq(&self, other: &$ty) -> bool {
                    self.uri() == $crate::IndividualUri::individual_uri(other)
                }
            }
        )+
    };
}

/// Primitive property values stored verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Primitive {
    String(String),
    Bool(bool),
    Integer(i64),
}

impl Primitive {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl From<&str> for Primitive {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Primitive {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Primitive {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Primitive {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

/// The three shapes a property value takes inside a store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoredValue {
    Primitive(Primitive),
    Uri(IndividualUriValue),
    Typed(TypedValue),
}

impl StoredValue {
    pub fn as_typed(&self) -> Option<&TypedValue> {
        match self {
            Self::Typed(tv) => Some(tv),
            _ => None,
        }
    }

    pub fn as_uri(&self) -> Option<&IndividualUriValue> {
        match self {
            Self::Uri(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_primitive(&self) -> Option<&Primitive> {
        match self {
            Self::Primitive(p) => Some(p),
            _ => None,
        }
    }

    /// Returns `true` if this is a typed reference to `id`.
    pub fn references(&self, id: &str) -> bool {
        self.as_typed().is_some_and(|tv| tv.id() == id)
    }
}

impl Hash for StoredValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Primitive(p) => p.hash(state),
            Self::Uri(u) => u.hash(state),
            Self::Typed(t) => t.hash(state),
        }
    }
}

impl From<Primitive> for StoredValue {
    fn from(p: Primitive) -> Self {
        Self::Primitive(p)
    }
}

impl From<IndividualUriValue> for StoredValue {
    fn from(u: IndividualUriValue) -> Self {
        Self::Uri(u)
    }
}

impl From<TypedValue> for StoredValue {
    fn from(t: TypedValue) -> Self {
        Self::Typed(t)
    }
}
