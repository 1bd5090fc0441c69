//! Namespace-scoped critical sections.
//!
//! A [`CriticalSection`] is a cooperative, re-entrant mutual-exclusion scope
//! over one document namespace. It serializes multi-step read-modify-write
//! sequences issued by well-behaved callers; it does not block callers that
//! skip it, and it never rolls back. A failure halfway through a sequence
//! leaves the store partially updated.

use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, ThreadId};

use crate::error::{StoreError, StoreResult};

#[derive(Default)]
struct Ownership {
    owner: Option<ThreadId>,
    depth: usize,
}

#[derive(Default)]
struct NamespaceLock {
    state: Mutex<Ownership>,
    released: Condvar,
}

impl NamespaceLock {
    fn acquire(&self) -> StoreResult<()> {
        let me = thread::current().id();
        let mut state = self
            .state
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        loop {
            match state.owner {
                None => {
                    state.owner = Some(me);
                    state.depth = 1;
                    return Ok(());
                }
                Some(owner) if owner == me => {
                    state.depth += 1;
                    return Ok(());
                }
                Some(_) => {
                    state = self
                        .released
                        .wait(state)
                        .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
                }
            }
        }
    }

    fn release(&self) {
        let mut state: MutexGuard<'_, Ownership> =
            self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.depth = state.depth.saturating_sub(1);
        if state.depth == 0 {
            state.owner = None;
            drop(state);
            self.released.notify_one();
        }
    }
}

/// Per-namespace lock table shared by a store.
#[derive(Default)]
pub struct NamespaceLocks {
    locks: Mutex<HashMap<String, Arc<NamespaceLock>>>,
}

impl NamespaceLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the critical section for `namespace`, blocking while another
    /// thread holds it. Re-entering from the owning thread nests.
    ///
    /// All sections are exclusive; `read_only` is advisory and recorded on
    /// the guard.
    pub fn enter(&self, namespace: &str, read_only: bool) -> StoreResult<CriticalSection> {
        let lock = {
            let mut locks = self
                .locks
                .lock()
                .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
            Arc::clone(locks.entry(namespace.to_string()).or_default())
        };
        lock.acquire()?;
        Ok(CriticalSection {
            namespace: namespace.to_string(),
            read_only,
            lock,
        })
    }
}

impl std::fmt::Debug for NamespaceLocks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamespaceLocks").finish_non_exhaustive()
    }
}

/// RAII guard for a namespace critical section. Leaving is dropping.
#[must_use = "the critical section is left as soon as the guard is dropped"]
pub struct CriticalSection {
    namespace: String,
    read_only: bool,
    lock: Arc<NamespaceLock>,
}

impl CriticalSection {
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }
}

impl Drop for CriticalSection {
    fn drop(&mut self) {
        self.lock.release();
    }
}

impl std::fmt::Debug for CriticalSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CriticalSection")
            .field("namespace", &self.namespace)
            .field("read_only", &self.read_only)
            .finish()
    }
}
