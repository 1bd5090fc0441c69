//! Resolution of bare URIs into the richest known representation.

use tracing::{debug, warn};

use prov_types::{IndividualUri, IndividualUriValue, Literal, ReferenceType};

use crate::env::ModelEnv;
use crate::external::ExternalElement;
use crate::value::ModelValue;

/// Turn a stored URI into a model value.
pub trait Inflate {
    /// Resolve against `env`. `default_namespace` is the namespace of the
    /// document being read; legacy references into it are not external.
    ///
    /// Never fails: a URI that matches nothing comes back as
    /// [`ModelValue::Uri`].
    fn inflate(&self, env: &ModelEnv, default_namespace: Option<&str>) -> ModelValue;
}

impl Inflate for IndividualUriValue {
    fn inflate(&self, env: &ModelEnv, default_namespace: Option<&str>) -> ModelValue {
        let uri = self.individual_uri();
        let schema = env.schema();

        if let Some(constant) = schema.enums().from_uri(schema.version(), uri) {
            return ModelValue::Enum(constant.clone());
        }
        if let Some(mapping) = env.external_map().and_then(|map| map.get(uri)) {
            return ModelValue::External(ExternalElement::new(uri, mapping.clone()));
        }
        if env.config().legacy_external_refs {
            if let Some(external) = ExternalElement::from_legacy_uri(uri, default_namespace) {
                return ModelValue::External(external);
            }
        }
        if let Some(literal) = Literal::from_uri(uri) {
            return ModelValue::Literal(literal);
        }
        if let Some(reference) = ReferenceType::from_uri(uri) {
            return ModelValue::ReferenceType(reference);
        }

        if env.config().warn_unresolved_uris {
            warn!(uri, version = ?schema.version(), "unresolved individual URI");
        } else {
            debug!(uri, version = ?schema.version(), "unresolved individual URI");
        }
        ModelValue::Uri(self.clone())
    }
}
