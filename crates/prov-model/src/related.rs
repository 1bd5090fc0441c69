//! Filtered projection from an element's relationships to the elements
//! they point at.

use std::collections::HashSet;
use std::sync::Mutex;

use tracing::{debug, warn};

use prov_store::StoreError;
use prov_types::{EnumConstant, ModelType};

use crate::collection::ModelCollection;
use crate::convert::{model_to_stored, stored_to_model};
use crate::error::{ModelError, ModelResult};
use crate::object::ModelObject;
use crate::relationship::Relationship;
use crate::value::ModelValue;

/// The elements related to an owner through relationships of an optional
/// type, optionally restricted to related elements of one type.
///
/// Adding an element creates a relationship owned by this view. Removing an
/// element detaches its relationship from the owner and, if this view
/// created it, deletes the relationship object too. A relationship still
/// referenced elsewhere is left in place.
///
/// Every check-then-act sequence runs inside the owner's namespace critical
/// section. The section is not a transaction: a failure part way through
/// can leave a created relationship that was never attached.
pub struct RelatedElementCollection {
    owner: ModelObject,
    relationships: ModelCollection,
    relationship_type: Option<EnumConstant>,
    element_type: Option<ModelType>,
    created: Mutex<HashSet<String>>,
}

impl RelatedElementCollection {
    pub fn new(
        owner: ModelObject,
        relationship_type: Option<EnumConstant>,
        element_type: Option<ModelType>,
    ) -> ModelResult<Self> {
        let relationships = owner.relationships()?;
        Ok(Self {
            owner,
            relationships,
            relationship_type,
            element_type,
            created: Mutex::new(HashSet::new()),
        })
    }

    pub fn owner(&self) -> &ModelObject {
        &self.owner
    }

    pub fn relationship_type(&self) -> Option<&EnumConstant> {
        self.relationship_type.as_ref()
    }

    pub fn element_type(&self) -> Option<&ModelType> {
        self.element_type.as_ref()
    }

    /// The related elements, in relationship order.
    pub fn to_vec(&self) -> ModelResult<Vec<ModelValue>> {
        Ok(self
            .matching()?
            .into_iter()
            .map(|(_, element)| element)
            .collect())
    }

    pub fn size(&self) -> ModelResult<usize> {
        Ok(self.matching()?.len())
    }

    pub fn is_empty(&self) -> ModelResult<bool> {
        Ok(self.size()? == 0)
    }

    pub fn contains(&self, element: &ModelValue) -> ModelResult<bool> {
        Ok(self
            .matching()?
            .iter()
            .any(|(_, related)| related == element))
    }

    /// Relate `element` to the owner. Needs a relationship type filter to
    /// know what type to give the new relationship.
    pub fn add(&self, element: impl Into<ModelValue>) -> ModelResult<bool> {
        let Some(relationship_type) = &self.relationship_type else {
            return Err(ModelError::AmbiguousOperation(
                "add needs a relationship type filter",
            ));
        };
        let element = element.into();
        self.check_element_type(&element)?;

        let _section = self.enter()?;
        let element = self.localize(&element)?;
        if self.contains(&element)? {
            return Ok(false);
        }
        let relationship = self.owner.create_relationship(&element, relationship_type, None)?;
        self.created_ids()?.insert(relationship.id().to_string());
        self.relationships.add(&relationship)?;
        Ok(true)
    }

    /// Unrelate `element`. Returns `true` if a matching relationship was
    /// detached.
    pub fn remove(&self, element: &ModelValue) -> ModelResult<bool> {
        let _section = self.enter()?;
        let found = self
            .matching()?
            .into_iter()
            .find(|(_, related)| related == element);
        let Some((relationship, _)) = found else {
            return Ok(false);
        };
        self.detach(relationship)?;
        Ok(true)
    }

    pub fn add_all<I>(&self, elements: I) -> ModelResult<bool>
    where
        I: IntoIterator,
        I::Item: Into<ModelValue>,
    {
        let _section = self.enter()?;
        let mut changed = false;
        for element in elements {
            changed |= self.add(element)?;
        }
        Ok(changed)
    }

    pub fn remove_all(&self, elements: &[ModelValue]) -> ModelResult<bool> {
        let _section = self.enter()?;
        let mut changed = false;
        for element in elements {
            changed |= self.remove(element)?;
        }
        Ok(changed)
    }

    /// Keep only the related elements found in `elements`.
    pub fn retain_all(&self, elements: &[ModelValue]) -> ModelResult<bool> {
        let _section = self.enter()?;
        let mut changed = false;
        for (relationship, related) in self.matching()? {
            if !elements.contains(&related) {
                self.detach(relationship)?;
                changed = true;
            }
        }
        Ok(changed)
    }

    pub fn clear(&self) -> ModelResult<()> {
        let _section = self.enter()?;
        for (relationship, _) in self.matching()? {
            self.detach(relationship)?;
        }
        Ok(())
    }

    fn enter(&self) -> ModelResult<prov_store::CriticalSection> {
        Ok(self
            .owner
            .store()
            .enter_critical_section(self.owner.namespace(), false)?)
    }

    fn created_ids(&self) -> ModelResult<std::sync::MutexGuard<'_, HashSet<String>>> {
        self.created
            .lock()
            .map_err(|_| StoreError::LockPoisoned("related element view".into()).into())
    }

    /// Relationships that pass both filters, paired with their related
    /// element. Relationships that cannot be read are skipped.
    fn matching(&self) -> ModelResult<Vec<(Relationship, ModelValue)>> {
        let mut out = Vec::new();
        for member in self.relationships.iter()? {
            let relationship = match member
                .and_then(|value| match value {
                    ModelValue::Object(object) => Relationship::from_object(object),
                    other => Err(ModelError::Type(format!("{other:?} is not a relationship"))),
                }) {
                Ok(relationship) => relationship,
                Err(err) => {
                    warn!(
                        owner = %self.owner.id(),
                        error = %err,
                        "skipping unreadable relationship"
                    );
                    continue;
                }
            };
            let relationship_type = match relationship.relationship_type() {
                Ok(Some(ty)) => ty,
                Ok(None) => {
                    warn!(
                        relationship = %relationship.id(),
                        "skipping relationship without a known type"
                    );
                    continue;
                }
                Err(err) => {
                    warn!(
                        relationship = %relationship.id(),
                        error = %err,
                        "skipping relationship with unreadable type"
                    );
                    continue;
                }
            };
            if self
                .relationship_type
                .as_ref()
                .is_some_and(|filter| *filter != relationship_type)
            {
                continue;
            }
            let related = match relationship.related_element() {
                Ok(Some(related)) => related,
                Ok(None) => {
                    warn!(
                        relationship = %relationship.id(),
                        "skipping relationship without a related element"
                    );
                    continue;
                }
                Err(err) => {
                    warn!(
                        relationship = %relationship.id(),
                        error = %err,
                        "skipping relationship with unresolvable related element"
                    );
                    continue;
                }
            };
            if !self.element_type_matches(&related) {
                continue;
            }
            out.push((relationship, related));
        }
        Ok(out)
    }

    /// Remove `relationship` from the owner and delete it if this view
    /// created it.
    fn detach(&self, relationship: Relationship) -> ModelResult<()> {
        self.relationships
            .remove(&ModelValue::from(relationship.object()))?;
        let owned = self.created_ids()?.remove(relationship.id());
        if !owned {
            return Ok(());
        }
        match self
            .owner
            .store()
            .delete(self.owner.namespace(), relationship.id())
        {
            Ok(()) => {
                debug!(relationship = %relationship.id(), "deleted detached relationship");
                Ok(())
            }
            Err(err) if err.is_in_use() || err.is_not_found() => {
                warn!(
                    relationship = %relationship.id(),
                    error = %err,
                    "detached relationship left in store"
                );
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Bring `element` into the owner's store and namespace, copying it if
    /// it lives elsewhere.
    fn localize(&self, element: &ModelValue) -> ModelResult<ModelValue> {
        match element {
            ModelValue::Object(object)
                if !object.is_bound_to(self.owner.store_id(), self.owner.namespace()) =>
            {
                let stored = model_to_stored(
                    element,
                    self.owner.namespace(),
                    self.owner.store().as_ref(),
                    self.owner.env(),
                )?;
                stored_to_model(
                    stored,
                    self.owner.namespace(),
                    self.owner.store(),
                    self.owner.env(),
                )
            }
            _ => Ok(element.clone()),
        }
    }

    fn element_type_matches(&self, element: &ModelValue) -> bool {
        match (&self.element_type, element) {
            (None, _) => true,
            (Some(expected), ModelValue::Object(object)) => self
                .owner
                .env()
                .schema()
                .types()
                .is_assignable(object.ty(), expected),
            (Some(_), _) => false,
        }
    }

    fn check_element_type(&self, element: &ModelValue) -> ModelResult<()> {
        if self.element_type_matches(element) {
            return Ok(());
        }
        Err(ModelError::Type(format!(
            "{element:?} does not match the related element type filter"
        )))
    }
}
