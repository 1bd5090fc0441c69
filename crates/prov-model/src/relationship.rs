use prov_types::{core_types, EnumConstant, ModelType};

use crate::error::{ModelError, ModelResult};
use crate::object::ModelObject;
use crate::properties;
use crate::value::ModelValue;

/// Typed accessors over a `Relationship` object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relationship {
    object: ModelObject,
}

impl Relationship {
    /// Wrap `object`, which must be of a type assignable to `Relationship`.
    pub fn from_object(object: ModelObject) -> ModelResult<Self> {
        let expected = ModelType::from(core_types::RELATIONSHIP);
        if !object.env().schema().types().is_assignable(object.ty(), &expected) {
            return Err(ModelError::Type(format!("{object:?} is not a relationship")));
        }
        Ok(Self { object })
    }

    pub fn id(&self) -> &str {
        self.object.id()
    }

    pub fn object(&self) -> &ModelObject {
        &self.object
    }

    pub fn into_object(self) -> ModelObject {
        self.object
    }

    /// The relationship type, or `None` if unset or not a known constant.
    pub fn relationship_type(&self) -> ModelResult<Option<EnumConstant>> {
        Ok(match self.object.get(properties::RELATIONSHIP_TYPE)? {
            Some(ModelValue::Enum(constant)) => Some(constant),
            _ => None,
        })
    }

    pub fn related_element(&self) -> ModelResult<Option<ModelValue>> {
        self.object.get(properties::RELATED_ELEMENT)
    }

    pub fn comment(&self) -> ModelResult<Option<String>> {
        self.object.get_string(properties::COMMENT)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use prov_store::{InMemoryModelStore, ModelStore};
    use prov_types::{families, Schema, SpecVersion};

    use super::*;
    use crate::env::ModelEnv;

    #[test]
    fn accessors_read_relationship_properties() {
        let store: Arc<dyn ModelStore> = Arc::new(InMemoryModelStore::new());
        let env = ModelEnv::new(Schema::core(SpecVersion::V2_3)).into_shared();
        let doc = ModelObject::create(
            Arc::clone(&store),
            "http://doc/1",
            "SPDXRef-DOCUMENT",
            &core_types::SPDX_DOCUMENT.into(),
            &env,
        )
        .unwrap();
        let pkg = ModelObject::create(
            Arc::clone(&store),
            "http://doc/1",
            "SPDXRef-p",
            &core_types::PACKAGE.into(),
            &env,
        )
        .unwrap();
        let describes = env
            .schema()
            .enums()
            .constant(SpecVersion::V2_3, families::RELATIONSHIP_TYPE, "DESCRIBES")
            .unwrap()
            .clone();

        let created = doc
            .create_relationship(&pkg.clone().into(), &describes, Some("main"))
            .unwrap();
        let rel = Relationship::from_object(created).unwrap();
        assert_eq!(rel.relationship_type().unwrap(), Some(describes));
        assert_eq!(rel.related_element().unwrap().unwrap().as_object(), Some(&pkg));
        assert_eq!(rel.comment().unwrap().as_deref(), Some("main"));
    }

    #[test]
    fn non_relationship_is_rejected() {
        let store: Arc<dyn ModelStore> = Arc::new(InMemoryModelStore::new());
        let env = ModelEnv::new(Schema::core(SpecVersion::V3_0)).into_shared();
        let pkg = ModelObject::create(store, "ns", "SPDXRef-p", &core_types::PACKAGE.into(), &env)
            .unwrap();
        assert!(matches!(Relationship::from_object(pkg), Err(ModelError::Type(_))));
    }
}
