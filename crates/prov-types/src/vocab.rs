//! Per-version URI vocabularies: enum constants, literal singletons and
//! reference types.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::IndividualUri;

/// Namespace of the legacy (2.x) term vocabulary.
pub const LEGACY_TERMS_NAMESPACE: &str = "http://spdx.org/rdf/terms#";
/// Namespace of the current (3.x) core vocabulary.
pub const CURRENT_CORE_NAMESPACE: &str = "https://spdx.org/rdf/3.0.1/terms/Core/";
/// Namespace of the current (3.x) licensing vocabulary.
pub const CURRENT_LICENSING_NAMESPACE: &str = "https://spdx.org/rdf/3.0.1/terms/ExpandedLicensing/";
/// Namespace under which reference types are defined.
pub const REFERENCE_TYPE_NAMESPACE: &str = "http://spdx.org/rdf/references/";

/// Schema generation a store or object is interpreted under.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecVersion {
    /// 2.x documents (legacy schema).
    #[serde(rename = "2.3")]
    V2_3,
    /// 3.x documents (current schema).
    #[default]
    #[serde(rename = "3.0")]
    V3_0,
}

impl SpecVersion {
    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::V2_3)
    }
}

impl fmt::Display for SpecVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V2_3 => f.write_str("2.3"),
            Self::V3_0 => f.write_str("3.0"),
        }
    }
}

/// A member of an enumerated vocabulary, identified by its URI.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnumConstant {
    family: String,
    name: String,
    uri: String,
}

impl EnumConstant {
    pub fn new(family: impl Into<String>, name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            name: name.into(),
            uri: uri.into(),
        }
    }

    /// The enumeration this constant belongs to, e.g. `RelationshipType`.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// The constant's canonical name, e.g. `DEPENDS_ON`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }
}

impl IndividualUri for EnumConstant {
    fn individual_uri(&self) -> &str {
        &self.uri
    }
}

crate::impl_individual_uri_eq!(EnumConstant);

impl fmt::Display for EnumConstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.family, self.name)
    }
}

/// Enumeration families known to the core vocabulary.
pub mod families {
    pub const RELATIONSHIP_TYPE: &str = "RelationshipType";
    pub const CHECKSUM_ALGORITHM: &str = "ChecksumAlgorithm";
    pub const HASH_ALGORITHM: &str = "HashAlgorithm";
    pub const REFERENCE_CATEGORY: &str = "ReferenceCategory";
}

const RELATIONSHIP_TYPES: [&str; 6] = [
    "DESCRIBES",
    "CONTAINS",
    "DEPENDS_ON",
    "GENERATED_FROM",
    "COPY_OF",
    "OTHER",
];
const CHECKSUM_ALGORITHMS: [&str; 3] = ["SHA1", "SHA256", "MD5"];
const REFERENCE_CATEGORIES: [&str; 3] = ["SECURITY", "PACKAGE_MANAGER", "OTHER"];

/// Per-version URI → enum constant tables.
#[derive(Clone, Debug, Default)]
pub struct EnumRegistry {
    by_uri: HashMap<(SpecVersion, String), EnumConstant>,
    by_name: HashMap<(SpecVersion, String, String), String>,
}

impl EnumRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Relationship types, checksum algorithms and reference categories for
    /// both schema generations.
    pub fn core() -> Self {
        use families::*;
        let mut reg = Self::new();
        for name in RELATIONSHIP_TYPES {
            reg.register_legacy(RELATIONSHIP_TYPE, name);
            reg.register_current(RELATIONSHIP_TYPE, name);
        }
        for name in CHECKSUM_ALGORITHMS {
            reg.register_legacy(CHECKSUM_ALGORITHM, name);
            reg.register_current(HASH_ALGORITHM, name);
        }
        for name in REFERENCE_CATEGORIES {
            reg.register_legacy(REFERENCE_CATEGORY, name);
            reg.register_current(REFERENCE_CATEGORY, name);
        }
        reg
    }

    /// Register a constant for `version`. A later registration for the same
    /// URI replaces the earlier one.
    pub fn register(&mut self, version: SpecVersion, constant: EnumConstant) {
        self.by_name.insert(
            (version, constant.family.clone(), constant.name.clone()),
            constant.uri.clone(),
        );
        self.by_uri.insert((version, constant.uri.clone()), constant);
    }

    fn register_legacy(&mut self, family: &str, name: &str) {
        let uri = format!(
            "{LEGACY_TERMS_NAMESPACE}{}_{}",
            lower_camel(family),
            lower_camel(name)
        );
        self.register(SpecVersion::V2_3, EnumConstant::new(family, name, uri));
    }

    fn register_current(&mut self, family: &str, name: &str) {
        let uri = format!("{CURRENT_CORE_NAMESPACE}{family}/{}", lower_camel(name));
        self.register(SpecVersion::V3_0, EnumConstant::new(family, name, uri));
    }

    /// Resolve `uri` to a constant registered for `version`.
    pub fn from_uri(&self, version: SpecVersion, uri: &str) -> Option<&EnumConstant> {
        self.by_uri.get(&(version, uri.to_string()))
    }

    /// Look up a constant by family and canonical name.
    pub fn constant(
        &self,
        version: SpecVersion,
        family: &str,
        name: &str,
    ) -> Option<&EnumConstant> {
        let uri = self
            .by_name
            .get(&(version, family.to_string(), name.to_string()))?;
        self.from_uri(version, uri)
    }

    pub fn len(&self) -> usize {
        self.by_uri.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_uri.is_empty()
    }
}

/// `DEPENDS_ON` → `dependsOn`, `RelationshipType` → `relationshipType`.
fn lower_camel(s: &str) -> String {
    if s.contains('_') || s.chars().all(|c| !c.is_ascii_lowercase()) {
        let mut out = String::with_capacity(s.len());
        for (i, part) in s.split('_').filter(|p| !p.is_empty()).enumerate() {
            let lower = part.to_ascii_lowercase();
            if i == 0 {
                out.push_str(&lower);
            } else {
                let mut chars = lower.chars();
                if let Some(first) = chars.next() {
                    out.push(first.to_ascii_uppercase());
                    out.extend(chars);
                }
            }
        }
        out
    } else {
        let mut chars = s.chars();
        match chars.next() {
            Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
            None => String::new(),
        }
    }
}

/// Well-known literal values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiteralKind {
    NoAssertion,
    None,
}

/// A literal singleton such as "no assertion", carrying the URI it was
/// resolved from.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Literal {
    kind: LiteralKind,
    uri: String,
}

impl Literal {
    /// The canonical literal for `kind` under `version`.
    pub fn for_version(kind: LiteralKind, version: SpecVersion) -> Self {
        let uri = match (version, kind) {
            (SpecVersion::V2_3, LiteralKind::NoAssertion) => {
                format!("{LEGACY_TERMS_NAMESPACE}noassertion")
            }
            (SpecVersion::V2_3, LiteralKind::None) => format!("{LEGACY_TERMS_NAMESPACE}none"),
            (SpecVersion::V3_0, LiteralKind::NoAssertion) => {
                format!("{CURRENT_CORE_NAMESPACE}NoAssertionElement")
            }
            (SpecVersion::V3_0, LiteralKind::None) => {
                format!("{CURRENT_CORE_NAMESPACE}NoneElement")
            }
        };
        Self { kind, uri }
    }

    /// Recognize any literal URI of any schema generation.
    pub fn from_uri(uri: &str) -> Option<Self> {
        let kind = if let Some(local) = uri.strip_prefix(LEGACY_TERMS_NAMESPACE) {
            match local {
                "noassertion" => LiteralKind::NoAssertion,
                "none" => LiteralKind::None,
                _ => return None,
            }
        } else if let Some(local) = uri.strip_prefix(CURRENT_CORE_NAMESPACE) {
            match local {
                "NoAssertionElement" => LiteralKind::NoAssertion,
                "NoneElement" => LiteralKind::None,
                _ => return None,
            }
        } else if let Some(local) = uri.strip_prefix(CURRENT_LICENSING_NAMESPACE) {
            match local {
                "NoAssertionLicense" => LiteralKind::NoAssertion,
                "NoneLicense" => LiteralKind::None,
                _ => return None,
            }
        } else {
            return None;
        };
        Some(Self {
            kind,
            uri: uri.to_string(),
        })
    }

    pub fn kind(&self) -> LiteralKind {
        self.kind
    }
}

impl IndividualUri for Literal {
    fn individual_uri(&self) -> &str {
        &self.uri
    }
}

crate::impl_individual_uri_eq!(Literal);

/// A reference type (for external references) identified by URI.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReferenceType {
    uri: String,
}

impl ReferenceType {
    /// Recognize `uri` if it lies under [`REFERENCE_TYPE_NAMESPACE`].
    pub fn from_uri(uri: &str) -> Option<Self> {
        let local = uri.strip_prefix(REFERENCE_TYPE_NAMESPACE)?;
        if local.is_empty() {
            return None;
        }
        Some(Self {
            uri: uri.to_string(),
        })
    }

    /// The short name, e.g. `cpe23Type`.
    pub fn name(&self) -> &str {
        &self.uri[REFERENCE_TYPE_NAMESPACE.len()..]
    }
}

impl IndividualUri for ReferenceType {
    fn individual_uri(&self) -> &str {
        &self.uri
    }
}

crate::impl_individual_uri_eq!(ReferenceType);
