//! # Registry Cache
//!
//! In-memory snapshot of every instance's last-published state, refreshed
//! wholesale from the store. The snapshot is immutable after fetch: a
//! refresh builds a new collection off to the side and swaps it in, so
//! concurrent list/search callers either see the old snapshot or the new
//! one, never a partially built mix.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{error, warn};

use crate::constants::operations;
use crate::database::RegistryStore;
use crate::models::ServerRecord;
use crate::registry::identity::IdentityHandle;

/// What a refresh attempt did. Failures are logged here because most
/// refreshes run on fire-and-forget tasks with no caller left to report to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Identity is unresolved; the previous snapshot was left untouched and
    /// no store query was issued.
    SkippedUnresolved,
    /// The snapshot was replaced with this many records.
    Replaced(usize),
    /// The store fault was logged; the previous snapshot survives.
    Failed,
}

pub struct RegistryCache {
    snapshot: RwLock<Arc<Vec<ServerRecord>>>,
}

impl RegistryCache {
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Cheap point-in-time view; the `Arc` keeps it alive across a
    /// concurrent refresh.
    pub fn snapshot(&self) -> Arc<Vec<ServerRecord>> {
        Arc::clone(&self.snapshot.read())
    }

    pub fn len(&self) -> usize {
        self.snapshot.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.read().is_empty()
    }

    /// Wholesale snapshot replacement — the only mutation the cache
    /// supports. Refresh goes through here; tests may seed through it.
    pub fn replace(&self, records: Vec<ServerRecord>) {
        *self.snapshot.write() = Arc::new(records);
    }

    /// Refresh the snapshot from the store. Preconditions and failure
    /// semantics follow the publishing rules: unresolved identity means no
    /// store contact at all, and a store fault leaves the old snapshot in
    /// place for readers.
    pub async fn refresh(
        &self,
        store: &RegistryStore,
        identity: &IdentityHandle,
    ) -> RefreshOutcome {
        if !identity.is_resolved() {
            warn!("Could not reload servers because self-identity is not set");
            return RefreshOutcome::SkippedUnresolved;
        }

        match store.list_all().await {
            Ok(records) => {
                if records.is_empty() {
                    warn!("Did not reload any servers from database");
                }
                let count = records.len();
                self.replace(records);
                RefreshOutcome::Replaced(count)
            }
            Err(e) => {
                error!(
                    operation = operations::REFRESH_CACHE,
                    error = %e,
                    "Store fault during cache refresh. Operation will not happen: 'refresh_cache'"
                );
                RefreshOutcome::Failed
            }
        }
    }

    /// Case-insensitive substring search over name and map name, in store
    /// fetch order.
    pub fn search(&self, term: &str) -> Vec<ServerRecord> {
        self.snapshot()
            .iter()
            .filter(|r| r.matches_term(term))
            .cloned()
            .collect()
    }
}

impl Default for RegistryCache {
    fn default() -> Self {
        Self::new()
    }
}
