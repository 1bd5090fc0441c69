//! Value model for the provenance object graph.
//!
//! Every property of a model object holds one of three shapes, captured by
//! [`StoredValue`]: a primitive, an [`IndividualUriValue`] (a URI-identified
//! leaf such as an enum constant) or a [`TypedValue`] (an `(id, type)`
//! reference to another composite object in the same store and namespace).
//!
//! # Key Types
//!
//! - [`IdKind`]: lexical classification of identifiers
//! - [`ModelType`] / [`TypeRegistry`]: injectable type sets
//! - [`TypedValue`]: structural `(id, type)` reference
//! - [`IndividualUriValue`] / [`IndividualUri`]: URI-equality leaf values
//! - [`EnumRegistry`], [`Literal`], [`ReferenceType`]: per-version vocabularies
//! - [`Schema`]: version plus the tables active for it

pub mod error;
pub mod id;
pub mod model_type;
pub mod schema;
pub mod value;
pub mod vocab;

pub use error::ValueError;
pub use id::IdKind;
pub use model_type::{core_types, ModelType, StaticTypeRegistry, TypeRegistry};
pub use schema::Schema;
pub use value::{IndividualUri, IndividualUriValue, Primitive, StoredValue, TypedValue};
pub use vocab::{
    families, EnumConstant, EnumRegistry, Literal, LiteralKind, ReferenceType, SpecVersion,
};
