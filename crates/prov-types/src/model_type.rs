use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Type names of the core element model.
pub mod core_types {
    pub const ELEMENT: &str = "Element";
    pub const SPDX_DOCUMENT: &str = "SpdxDocument";
    pub const PACKAGE: &str = "Package";
    pub const FILE: &str = "File";
    pub const SNIPPET: &str = "Snippet";
    pub const RELATIONSHIP: &str = "Relationship";
    pub const ANNOTATION: &str = "Annotation";
    pub const CHECKSUM: &str = "Checksum";
    pub const EXTERNAL_REF: &str = "ExternalRef";
    pub const EXTERNAL_DOCUMENT_REF: &str = "ExternalDocumentRef";
    pub const EXTRACTED_LICENSE_INFO: &str = "ExtractedLicenseInfo";
    pub const LISTED_LICENSE: &str = "ListedLicense";
    pub const LISTED_LICENSE_EXCEPTION: &str = "ListedLicenseException";
    pub const EXTERNAL_ELEMENT: &str = "ExternalElement";
}

/// The type of a composite object held in a model store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ModelType {
    /// A type known by name to a [`TypeRegistry`].
    Named(String),
    /// An object whose concrete type is not (yet) known. Used for
    /// scaffolding and incompletely typed graphs.
    Placeholder,
}

impl ModelType {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// The type name, or `None` for the placeholder.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(n) => Some(n),
            Self::Placeholder => None,
        }
    }

    /// Returns `true` if this is the named type `name`.
    pub fn is(&self, name: &str) -> bool {
        self.name() == Some(name)
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder)
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(n) => f.write_str(n),
            Self::Placeholder => f.write_str("<placeholder>"),
        }
    }
}

impl From<&str> for ModelType {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

/// Registry of the object types valid for a schema.
///
/// Kept as a trait so alternate schemas and test fixtures can supply their
/// own type sets without touching the core list.
pub trait TypeRegistry: Send + Sync {
    /// Whether `ty` may appear in a typed reference.
    fn contains(&self, ty: &ModelType) -> bool;

    /// Whether a value of type `sub` may be used where `sup` is expected.
    fn is_assignable(&self, sub: &ModelType, sup: &ModelType) -> bool;

    /// All registered type names, sorted.
    fn type_names(&self) -> Vec<String>;
}

/// A [`TypeRegistry`] backed by a fixed single-inheritance table.
#[derive(Clone, Debug, Default)]
pub struct StaticTypeRegistry {
    parents: HashMap<String, Option<String>>,
    allow_placeholders: bool,
}

impl StaticTypeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The core element model.
    pub fn core() -> Self {
        use core_types::*;
        Self::new()
            .with_type(ELEMENT, None)
            .with_type(SPDX_DOCUMENT, Some(ELEMENT))
            .with_type(PACKAGE, Some(ELEMENT))
            .with_type(FILE, Some(ELEMENT))
            .with_type(SNIPPET, Some(ELEMENT))
            .with_type(RELATIONSHIP, None)
            .with_type(ANNOTATION, None)
            .with_type(CHECKSUM, None)
            .with_type(EXTERNAL_REF, None)
            .with_type(EXTERNAL_DOCUMENT_REF, None)
            .with_type(EXTRACTED_LICENSE_INFO, None)
            .with_type(LISTED_LICENSE, None)
            .with_type(LISTED_LICENSE_EXCEPTION, None)
            .with_type(EXTERNAL_ELEMENT, Some(ELEMENT))
    }

    /// Register `name`, optionally as a subtype of an already known `parent`.
    pub fn with_type(mut self, name: &str, parent: Option<&str>) -> Self {
        self.parents
            .insert(name.to_string(), parent.map(str::to_string));
        self
    }

    /// Accept [`ModelType::Placeholder`] in typed references.
    pub fn allow_placeholders(mut self) -> Self {
        self.allow_placeholders = true;
        self
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

impl TypeRegistry for StaticTypeRegistry {
    fn contains(&self, ty: &ModelType) -> bool {
        match ty {
            ModelType::Named(n) => self.parents.contains_key(n),
            ModelType::Placeholder => self.allow_placeholders,
        }
    }

    fn is_assignable(&self, sub: &ModelType, sup: &ModelType) -> bool {
        let (Some(sub), Some(sup)) = (sub.name(), sup.name()) else {
            return sub == sup;
        };
        let mut current = Some(sub);
        // Bounded by the table size so a malformed parent loop cannot spin.
        for _ in 0..=self.parents.len() {
            match current {
                Some(name) if name == sup => return true,
                Some(name) => current = self.parents.get(name).and_then(|p| p.as_deref()),
                None => return false,
            }
        }
        false
    }

    fn type_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.parents.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::core_types::*;
    use super::*;

    #[test]
    fn core_registry_contains_element_types() {
        let reg = StaticTypeRegistry::core();
        assert!(reg.contains(&ModelType::named(PACKAGE)));
        assert!(reg.contains(&ModelType::named(RELATIONSHIP)));
        assert!(!reg.contains(&ModelType::named("Spaceship")));
    }

    #[test]
    fn subtypes_are_assignable_to_parents() {
        let reg = StaticTypeRegistry::core();
        let pkg = ModelType::named(PACKAGE);
        let element = ModelType::named(ELEMENT);
        assert!(reg.is_assignable(&pkg, &element));
        assert!(reg.is_assignable(&pkg, &pkg));
        assert!(!reg.is_assignable(&element, &pkg));
        assert!(!reg.is_assignable(&ModelType::named(CHECKSUM), &element));
    }

    #[test]
    fn registry_is_extensible() {
        let reg = StaticTypeRegistry::core().with_type("TestElement", Some(ELEMENT));
        let ty = ModelType::named("TestElement");
        assert!(reg.contains(&ty));
        assert!(reg.is_assignable(&ty, &ModelType::named(ELEMENT)));
    }

    #[test]
    fn placeholders_require_opt_in() {
        let strict = StaticTypeRegistry::core();
        assert!(!strict.contains(&ModelType::Placeholder));

        let lenient = StaticTypeRegistry::core().allow_placeholders();
        assert!(lenient.contains(&ModelType::Placeholder));
        assert!(lenient.is_assignable(&ModelType::Placeholder, &ModelType::Placeholder));
        assert!(!lenient.is_assignable(&ModelType::Placeholder, &ModelType::named(ELEMENT)));
    }

    #[test]
    fn parent_loops_terminate() {
        let reg = StaticTypeRegistry::new()
            .with_type("A", Some("B"))
            .with_type("B", Some("A"));
        assert!(!reg.is_assignable(&ModelType::named("A"), &ModelType::named("C")));
    }

    #[test]
    fn type_names_are_sorted() {
        let names = StaticTypeRegistry::core().type_names();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert!(names.contains(&PACKAGE.to_string()));
    }
}
