use std::fmt;

use prov_types::{
    EnumConstant, IndividualUri, IndividualUriValue, Literal, Primitive, ReferenceType,
};

use crate::external::ExternalElement;
use crate::object::ModelObject;

/// A property value as seen by model code, after inflation.
///
/// URI-shaped variants compare by URI regardless of variant, so an
/// unresolved [`ModelValue::Uri`] equals the enum constant with the same
/// URI.
#[derive(Clone)]
pub enum ModelValue {
    Primitive(Primitive),
    Enum(EnumConstant),
    Literal(Literal),
    ReferenceType(ReferenceType),
    External(ExternalElement),
    /// A URI that resolved to nothing known. Still a usable leaf value.
    Uri(IndividualUriValue),
    Object(ModelObject),
}

impl ModelValue {
    /// The URI of a URI-shaped value.
    pub fn individual_uri(&self) -> Option<&str> {
        match self {
            Self::Enum(v) => Some(v.individual_uri()),
            Self::Literal(v) => Some(v.individual_uri()),
            Self::ReferenceType(v) => Some(v.individual_uri()),
            Self::External(v) => Some(v.individual_uri()),
            Self::Uri(v) => Some(v.individual_uri()),
            Self::Primitive(_) | Self::Object(_) => None,
        }
    }

    pub fn as_object(&self) -> Option<&ModelObject> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn into_object(self) -> Option<ModelObject> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumConstant> {
        match self {
            Self::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Primitive(p) => p.as_str(),
            _ => None,
        }
    }
}

impl PartialEq for ModelValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Primitive(a), Self::Primitive(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            _ => match (self.individual_uri(), other.individual_uri()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl fmt::Debug for ModelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => write!(f, "Primitive({p:?})"),
            Self::Object(o) => write!(f, "Object({o:?})"),
            Self::Enum(e) => write!(f, "Enum({e})"),
            other => write!(f, "Uri({})", other.individual_uri().unwrap_or_default()),
        }
    }
}

impl From<Primitive> for ModelValue {
    fn from(p: Primitive) -> Self {
        Self::Primitive(p)
    }
}

impl From<&str> for ModelValue {
    fn from(s: &str) -> Self {
        Self::Primitive(Primitive::from(s))
    }
}

impl From<String> for ModelValue {
    fn from(s: String) -> Self {
        Self::Primitive(Primitive::from(s))
    }
}

impl From<bool> for ModelValue {
    fn from(b: bool) -> Self {
        Self::Primitive(Primitive::from(b))
    }
}

impl From<i64> for ModelValue {
    fn from(i: i64) -> Self {
        Self::Primitive(Primitive::from(i))
    }
}

impl From<EnumConstant> for ModelValue {
    fn from(e: EnumConstant) -> Self {
        Self::Enum(e)
    }
}

impl From<Literal> for ModelValue {
    fn from(l: Literal) -> Self {
        Self::Literal(l)
    }
}

impl From<ExternalElement> for ModelValue {
    fn from(e: ExternalElement) -> Self {
        Self::External(e)
    }
}

impl From<IndividualUriValue> for ModelValue {
    fn from(u: IndividualUriValue) -> Self {
        Self::Uri(u)
    }
}

impl From<ModelObject> for ModelValue {
    fn from(o: ModelObject) -> Self {
        Self::Object(o)
    }
}

impl From<&ModelObject> for ModelValue {
    fn from(o: &ModelObject) -> Self {
        Self::Object(o.clone())
    }
}
