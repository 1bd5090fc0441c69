use std::fmt;
use std::sync::Arc;

use crate::model_type::{StaticTypeRegistry, TypeRegistry};
use crate::vocab::{EnumRegistry, SpecVersion};

/// The active schema: version, type registry and enum tables.
///
/// Cheap to clone; all tables are shared.
#[derive(Clone)]
pub struct Schema {
    version: SpecVersion,
    types: Arc<dyn TypeRegistry>,
    enums: Arc<EnumRegistry>,
}

impl Schema {
    pub fn new(
        version: SpecVersion,
        types: Arc<dyn TypeRegistry>,
        enums: Arc<EnumRegistry>,
    ) -> Self {
        Self {
            version,
            types,
            enums,
        }
    }

    /// Core types and enums under `version`.
    pub fn core(version: SpecVersion) -> Self {
        Self::new(
            version,
            Arc::new(StaticTypeRegistry::core()),
            Arc::new(EnumRegistry::core()),
        )
    }

    pub fn version(&self) -> SpecVersion {
        self.version
    }

    pub fn types(&self) -> &dyn TypeRegistry {
        self.types.as_ref()
    }

    pub fn enums(&self) -> &EnumRegistry {
        &self.enums
    }

    /// The same tables interpreted under another version.
    pub fn with_version(&self, version: SpecVersion) -> Self {
        Self {
            version,
            ..self.clone()
        }
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("version", &self.version)
            .field("types", &self.types.type_names().len())
            .field("enums", &self.enums.len())
            .finish()
    }
}
