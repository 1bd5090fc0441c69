use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix for store-local identifiers that carry no meaning outside the store.
pub const ANONYMOUS_PREFIX: &str = "__anon__";
/// Prefix for element identifiers (`SPDXRef-...`).
pub const ELEMENT_REF_PREFIX: &str = "SPDXRef-";
/// Prefix for locally defined license identifiers.
pub const LICENSE_REF_PREFIX: &str = "LicenseRef-";
/// Prefix for external document reference identifiers.
pub const DOCUMENT_REF_PREFIX: &str = "DocumentRef-";
/// Infix used for identifiers minted by a store.
pub const GENERATED_INFIX: &str = "gnrtd";

const LITERAL_IDS: [&str; 2] = ["NONE", "NOASSERTION"];

/// Classification of an identifier within a document namespace.
///
/// The kind decides how an identifier is treated when an object is copied
/// into another namespace: anonymous identifiers are always re-minted, the
/// prefixed kinds are re-minted only on collision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdKind {
    Anonymous,
    ElementRef,
    LicenseRef,
    DocumentRef,
    ListedLicense,
    Literal,
    Unknown,
}

impl IdKind {
    /// Classify an identifier from its lexical form.
    ///
    /// [`IdKind::ListedLicense`] is never returned here: whether an id names
    /// a listed license depends on reference data, not on its spelling.
    pub fn classify(id: &str) -> Self {
        if id.starts_with(ANONYMOUS_PREFIX) {
            Self::Anonymous
        } else if id.starts_with(ELEMENT_REF_PREFIX) {
            Self::ElementRef
        } else if id.starts_with(LICENSE_REF_PREFIX) {
            Self::LicenseRef
        } else if id.starts_with(DOCUMENT_REF_PREFIX) {
            Self::DocumentRef
        } else if LITERAL_IDS.iter().any(|l| l.eq_ignore_ascii_case(id)) {
            Self::Literal
        } else {
            Self::Unknown
        }
    }

    /// Whether a store can mint fresh identifiers of this kind.
    pub fn is_mintable(&self) -> bool {
        matches!(
            self,
            Self::Anonymous | Self::ElementRef | Self::LicenseRef | Self::DocumentRef
        )
    }

    /// Format the `n`th generated identifier of this kind.
    ///
    /// Returns `None` for kinds that cannot be minted.
    pub fn generated(&self, n: u64) -> Option<String> {
        match self {
            Self::Anonymous => Some(format!("{ANONYMOUS_PREFIX}{n}")),
            Self::ElementRef => Some(format!("{ELEMENT_REF_PREFIX}{GENERATED_INFIX}{n}")),
            Self::LicenseRef => Some(format!("{LICENSE_REF_PREFIX}{GENERATED_INFIX}{n}")),
            Self::DocumentRef => Some(format!("{DOCUMENT_REF_PREFIX}{GENERATED_INFIX}{n}")),
            Self::ListedLicense | Self::Literal | Self::Unknown => None,
        }
    }
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Anonymous => "anonymous",
            Self::ElementRef => "element-ref",
            Self::LicenseRef => "license-ref",
            Self::DocumentRef => "document-ref",
            Self::ListedLicense => "listed-license",
            Self::Literal => "literal",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}
