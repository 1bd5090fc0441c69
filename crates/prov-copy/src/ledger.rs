//! The copy ledger: which source objects have already been copied, and to
//! which target id.
//!
//! The ledger is a nested table keyed by
//! `source store → target store → source namespace → target namespace →
//! source id`. Each level is populated with get-or-create under its own
//! lock, so threads copying disjoint parts of the key space never contend on
//! a single global lock.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

use prov_store::StoreId;

use crate::error::{CopyError, CopyResult};

/// One level of the nested ledger.
#[derive(Debug)]
struct Level<K, V> {
    entries: RwLock<HashMap<K, Arc<V>>>,
}

impl<K, V> Default for Level<K, V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash + Clone, V: Default> Level<K, V> {
    fn get(&self, key: &K) -> CopyResult<Option<Arc<V>>> {
        let entries = self.entries.read().map_err(|_| CopyError::LedgerPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    /// Get the child for `key`, creating it if absent. Whoever creates it
    /// first wins; everyone re-reads the winner.
    fn get_or_create(&self, key: &K) -> CopyResult<Arc<V>> {
        if let Some(existing) = self.get(key)? {
            return Ok(existing);
        }
        let mut entries = self.entries.write().map_err(|_| CopyError::LedgerPoisoned)?;
        Ok(Arc::clone(entries.entry(key.clone()).or_default()))
    }

    fn values(&self) -> CopyResult<Vec<Arc<V>>> {
        let entries = self.entries.read().map_err(|_| CopyError::LedgerPoisoned)?;
        Ok(entries.values().cloned().collect())
    }
}

/// Source id → target id for one `(stores, namespaces)` combination.
#[derive(Debug, Default)]
pub struct IdMap {
    ids: RwLock<HashMap<String, String>>,
}

impl IdMap {
    /// The target id recorded for `source_id`, if any.
    pub fn get(&self, source_id: &str) -> CopyResult<Option<String>> {
        let ids = self.ids.read().map_err(|_| CopyError::LedgerPoisoned)?;
        Ok(ids.get(source_id).cloned())
    }

    /// Record `target_id` for `source_id` unless another id was recorded
    /// first. Returns the id that is recorded after the call.
    pub fn insert_if_absent(&self, source_id: &str, target_id: &str) -> CopyResult<String> {
        let mut ids = self.ids.write().map_err(|_| CopyError::LedgerPoisoned)?;
        Ok(ids
            .entry(source_id.to_string())
            .or_insert_with(|| target_id.to_string())
            .clone())
    }

    pub fn len(&self) -> CopyResult<usize> {
        let ids = self.ids.read().map_err(|_| CopyError::LedgerPoisoned)?;
        Ok(ids.len())
    }

    pub fn is_empty(&self) -> CopyResult<bool> {
        Ok(self.len()? == 0)
    }
}

type ByTargetNamespace = Level<String, IdMap>;
type BySourceNamespace = Level<String, ByTargetNamespace>;
type ByTargetStore = Level<StoreId, BySourceNamespace>;

/// The full copy ledger owned by one copy manager.
#[derive(Debug, Default)]
pub struct CopyLedger {
    by_source_store: Level<StoreId, ByTargetStore>,
}

impl CopyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id map for a `(stores, namespaces)` combination, created on
    /// first use.
    pub fn id_map(
        &self,
        source_store: StoreId,
        target_store: StoreId,
        source_namespace: &str,
        target_namespace: &str,
    ) -> CopyResult<Arc<IdMap>> {
        self.by_source_store
            .get_or_create(&source_store)?
            .get_or_create(&target_store)?
            .get_or_create(&source_namespace.to_string())?
            .get_or_create(&target_namespace.to_string())
    }

    /// Look up a recorded target id without creating intermediate levels.
    pub fn lookup(
        &self,
        source_store: StoreId,
        target_store: StoreId,
        source_namespace: &str,
        target_namespace: &str,
        source_id: &str,
    ) -> CopyResult<Option<String>> {
        let Some(by_target_store) = self.by_source_store.get(&source_store)? else {
            return Ok(None);
        };
        let Some(by_source_ns) = by_target_store.get(&target_store)? else {
            return Ok(None);
        };
        let Some(by_target_ns) = by_source_ns.get(&source_namespace.to_string())? else {
            return Ok(None);
        };
        let Some(ids) = by_target_ns.get(&target_namespace.to_string())? else {
            return Ok(None);
        };
        ids.get(source_id)
    }

    /// Total number of recorded copies.
    pub fn len(&self) -> CopyResult<usize> {
        let mut total = 0;
        for by_target_store in self.by_source_store.values()? {
            for by_source_ns in by_target_store.values()? {
                for by_target_ns in by_source_ns.values()? {
                    for ids in by_target_ns.values()? {
                        total += ids.len()?;
                    }
                }
            }
        }
        Ok(total)
    }
}
