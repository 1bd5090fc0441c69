use std::fmt;
use std::sync::Arc;

use prov_copy::CopyManager;
use prov_types::Schema;

use crate::config::ModelConfig;
use crate::external::ExternalMap;
use crate::factory::{GenericObjectFactory, ObjectFactory};

/// Everything model objects need besides their store: the schema, the
/// object factory, an optional copy manager for cross-store writes and an
/// optional external map for the document being read.
///
/// Shared by every [`ModelObject`](crate::ModelObject) created under it.
pub struct ModelEnv {
    schema: Schema,
    factory: Arc<dyn ObjectFactory>,
    copy_manager: Option<Arc<CopyManager>>,
    external_map: Option<Arc<ExternalMap>>,
    config: ModelConfig,
}

impl ModelEnv {
    /// An environment using the [`GenericObjectFactory`] and no copy manager.
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            factory: Arc::new(GenericObjectFactory),
            copy_manager: None,
            external_map: None,
            config: ModelConfig::default(),
        }
    }

    pub fn with_factory(mut self, factory: Arc<dyn ObjectFactory>) -> Self {
        self.factory = factory;
        self
    }

    pub fn with_copy_manager(mut self, copy_manager: Arc<CopyManager>) -> Self {
        self.copy_manager = Some(copy_manager);
        self
    }

    pub fn with_external_map(mut self, map: Arc<ExternalMap>) -> Self {
        self.external_map = Some(map);
        self
    }

    pub fn with_config(mut self, config: ModelConfig) -> Self {
        self.config = config;
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn factory(&self) -> &dyn ObjectFactory {
        self.factory.as_ref()
    }

    pub fn copy_manager(&self) -> Option<&Arc<CopyManager>> {
        self.copy_manager.as_ref()
    }

    pub fn external_map(&self) -> Option<&ExternalMap> {
        self.external_map.as_deref()
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl fmt::Debug for ModelEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelEnv")
            .field("schema", &self.schema)
            .field("copy_manager", &self.copy_manager.is_some())
            .field("external_map", &self.external_map.as_ref().map(|m| m.len()))
            .field("config", &self.config)
            .finish()
    }
}
