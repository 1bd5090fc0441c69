//! Stubs for elements defined in other documents.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use prov_types::{id::ELEMENT_REF_PREFIX, IndividualUri};

/// Where an externally defined element can be found.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalMapping {
    /// Namespace of the document that defines the element, when known.
    pub defining_document: Option<String>,
    /// A location hint for retrieving the element.
    pub location_hint: Option<String>,
}

/// Element URIs a document declares as defined elsewhere.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalMap {
    entries: HashMap<String, ExternalMapping>,
}

impl ExternalMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, uri: impl Into<String>, mapping: ExternalMapping) {
        self.entries.insert(uri.into(), mapping);
    }

    pub fn get(&self, uri: &str) -> Option<&ExternalMapping> {
        self.entries.get(uri)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Placeholder for an element that lives in another document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExternalElement {
    uri: String,
    mapping: ExternalMapping,
}

impl ExternalElement {
    pub fn new(uri: impl Into<String>, mapping: ExternalMapping) -> Self {
        Self {
            uri: uri.into(),
            mapping,
        }
    }

    /// Parse a legacy `namespace#SPDXRef-...` reference. Returns `None` if the
    /// URI does not have that shape or points into `local_namespace`.
    pub fn from_legacy_uri(uri: &str, local_namespace: Option<&str>) -> Option<Self> {
        let (namespace, local_id) = uri.rsplit_once('#')?;
        if namespace.is_empty() || !local_id.starts_with(ELEMENT_REF_PREFIX) {
            return None;
        }
        if local_id.len() == ELEMENT_REF_PREFIX.len() {
            return None;
        }
        if local_namespace.is_some_and(|local| local.trim_end_matches('#') == namespace) {
            return None;
        }
        Some(Self::new(
            uri,
            ExternalMapping {
                defining_document: Some(namespace.to_string()),
                location_hint: None,
            },
        ))
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn mapping(&self) -> &ExternalMapping {
        &self.mapping
    }

    /// The element id within its defining document, if the URI has a
    /// fragment.
    pub fn local_id(&self) -> Option<&str> {
        self.uri.rsplit_once('#').map(|(_, id)| id)
    }
}

impl IndividualUri for ExternalElement {
    fn individual_uri(&self) -> &str {
        &self.uri
    }
}

prov_types::impl_individual_uri_eq!(ExternalElement);

#[cfg(test)]
mod tests {
    use prov_types::IndividualUriValue;

    use super::*;

    #[test]
    fn legacy_uri_parses_namespace_and_id() {
        let e = ExternalElement::from_legacy_uri("http://doc/2#SPDXRef-pkg", Some("http://doc/1"))
            .unwrap();
        assert_eq!(e.local_id(), Some("SPDXRef-pkg"));
        assert_eq!(e.mapping().defining_document.as_deref(), Some("http://doc/2"));
    }

    #[test]
    fn legacy_uri_in_local_namespace_is_not_external() {
        let uri = "http://doc/1#SPDXRef-pkg";
        assert!(ExternalElement::from_legacy_uri(uri, Some("http://doc/1")).is_none());
        assert!(ExternalElement::from_legacy_uri(uri, Some("http://doc/1#")).is_none());
    }

    #[test]
    fn legacy_uri_requires_element_ref() {
        assert!(ExternalElement::from_legacy_uri("http://doc/2#LicenseRef-x", None).is_none());
        assert!(ExternalElement::from_legacy_uri("http://doc/2#SPDXRef-", None).is_none());
        assert!(ExternalElement::from_legacy_uri("SPDXRef-x", None).is_none());
    }

    #[test]
    fn external_element_equals_bare_uri() {
        let e = ExternalElement::new("http://doc/2#SPDXRef-a", ExternalMapping::default());
        let bare = IndividualUriValue::new("http://doc/2#SPDXRef-a").unwrap();
        assert!(e == bare);
        assert!(bare == e);
    }

    #[test]
    fn external_map_lookup() {
        let mut map = ExternalMap::new();
        map.insert(
            "https://other.example/elem",
            ExternalMapping {
                defining_document: Some("https://other.example/doc".into()),
                location_hint: None,
            },
        );
        assert_eq!(map.len(), 1);
        assert!(map.get("https://other.example/elem").is_some());
        assert!(map.get("https://other.example/none").is_none());
    }
}
