//! # Identity Resolution
//!
//! Determines which registry row corresponds to the running instance and
//! owns the process-wide identity state. Two sources exist, selected by
//! configuration: an address lookup against the shared table, or a
//! pre-assigned id read from an external file.
//!
//! Resolution never panics and never retries on its own; every failure path
//! lands on the unresolved sentinel and is surfaced through logs, leaving
//! the instance in degraded read-only mode until the operator reloads.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{error, info, warn};

use crate::config::ServerIdFile;
use crate::constants::{identity, operations, UNSET_ADDRESS};
use crate::database::RegistryStore;
use crate::logging::log_identity_transition;

/// Point-in-time self-identity value. Re-resolution produces a whole new
/// value; nothing mutates one in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityState {
    id: i32,
}

impl IdentityState {
    /// Identity before the first resolution attempt.
    pub const fn uninitialized() -> Self {
        Self {
            id: identity::UNINITIALIZED,
        }
    }

    /// Resolution was attempted and failed.
    pub const fn unresolved() -> Self {
        Self {
            id: identity::UNRESOLVED,
        }
    }

    /// A successfully resolved registry row id (`> 0`).
    pub fn resolved(id: i32) -> Self {
        debug_assert!(id > 0, "resolved identity requires a positive id");
        Self { id }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn is_resolved(&self) -> bool {
        self.id > 0
    }
}

/// Shared handle to the current identity, owned here and passed to the
/// cache, publisher, and admin façade. Readers copy the value out; writers
/// swap in a replacement.
#[derive(Clone)]
pub struct IdentityHandle {
    inner: Arc<RwLock<IdentityState>>,
}

impl IdentityHandle {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(IdentityState::uninitialized())),
        }
    }

    pub fn get(&self) -> IdentityState {
        *self.inner.read()
    }

    pub fn id(&self) -> i32 {
        self.get().id()
    }

    pub fn is_resolved(&self) -> bool {
        self.get().is_resolved()
    }

    pub fn set(&self, state: IdentityState, source: &str) {
        let previous = {
            let mut guard = self.inner.write();
            let previous = *guard;
            *guard = state;
            previous
        };
        log_identity_transition(previous.id(), state.id(), source, None);
    }
}

impl Default for IdentityHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Where the self-identity comes from.
#[derive(Debug, Clone)]
pub enum IdentitySource {
    /// Look up the row whose `address` equals this instance's configured
    /// address.
    AddressLookup { address: String },

    /// Read a pre-assigned id from an external JSON file and verify the row
    /// exists.
    IdFile { path: PathBuf },
}

impl IdentitySource {
    fn name(&self) -> &'static str {
        match self {
            IdentitySource::AddressLookup { .. } => "address_lookup",
            IdentitySource::IdFile { .. } => "id_file",
        }
    }
}

pub struct IdentityResolver {
    store: RegistryStore,
    source: IdentitySource,
}

impl IdentityResolver {
    pub fn new(store: RegistryStore, source: IdentitySource) -> Self {
        Self { store, source }
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// Resolve this instance's identity. Idempotent: safe to re-run on every
    /// explicit reload. Failures are logged, never returned.
    pub async fn resolve(&self) -> IdentityState {
        match &self.source {
            IdentitySource::AddressLookup { address } => self.resolve_by_address(address).await,
            IdentitySource::IdFile { path } => self.resolve_from_file(path.clone()).await,
        }
    }

    async fn resolve_by_address(&self, address: &str) -> IdentityState {
        if address.is_empty() || address == UNSET_ADDRESS {
            error!(
                critical = true,
                address = %address,
                "Self address is not configured; identity cannot be resolved. Publishing is suppressed until corrected and reloaded"
            );
            return IdentityState::unresolved();
        }

        match self.store.find_by_address(address).await {
            Ok(Some(record)) => {
                info!(id = record.id, address = %address, "Resolved self-identity by address");
                IdentityState::resolved(record.id)
            }
            Ok(None) => {
                warn!(
                    address = %address,
                    "No registry row matches this instance's address. Use the register mutation to create one, then reload"
                );
                IdentityState::unresolved()
            }
            Err(e) if RegistryStore::is_undefined_table(&e) => {
                self.bootstrap_schema().await;
                IdentityState::unresolved()
            }
            Err(e) => {
                error!(
                    operation = operations::RESOLVE_IDENTITY,
                    error = %e,
                    "Store fault during identity resolution. Operation will not happen: 'resolve_identity'"
                );
                IdentityState::unresolved()
            }
        }
    }

    async fn resolve_from_file(&self, path: PathBuf) -> IdentityState {
        let id = match ServerIdFile::load(&path) {
            Ok(file) => file.id as i32,
            Err(e) => {
                error!(critical = true, error = %e, "Error loading server id file");
                return IdentityState::unresolved();
            }
        };
        if id <= 0 {
            error!(critical = true, id = id, "Server id file contains a non-positive id");
            return IdentityState::unresolved();
        }

        match self.store.find_by_id(id).await {
            Ok(Some(record)) => {
                if record.address.len() < 3 || record.name.len() < 3 {
                    error!(
                        critical = true,
                        id = id,
                        "This server has no name/address set in the database; the registry may not work correctly"
                    );
                }
                info!(id = id, "Resolved self-identity from id file");
                IdentityState::resolved(id)
            }
            Ok(None) => {
                error!(
                    critical = true,
                    id = id,
                    "This server does not exist in the database; identity stays unresolved"
                );
                IdentityState::unresolved()
            }
            Err(e) if RegistryStore::is_undefined_table(&e) => {
                self.bootstrap_schema().await;
                IdentityState::unresolved()
            }
            Err(e) => {
                error!(
                    operation = operations::RESOLVE_IDENTITY,
                    error = %e,
                    "Store fault during identity resolution. Operation will not happen: 'resolve_identity'"
                );
                IdentityState::unresolved()
            }
        }
    }

    /// Self-healing schema bootstrap, hit when the first query reports an
    /// undefined table. Idempotent; resolution must be re-run afterwards,
    /// once data has been inserted.
    async fn bootstrap_schema(&self) {
        match self.store.create_table_if_missing().await {
            Ok(()) => {
                info!(table = self.store.table(), "Table not found in database, creating one");
                info!(
                    "You need to insert data about servers into the database for the registry to work. To add this server use the register mutation"
                );
            }
            Err(e) => {
                error!(
                    operation = operations::CREATE_TABLE,
                    error = %e,
                    "Store fault while creating the registry table. Operation will not happen: 'create_table_if_missing'"
                );
            }
        }
    }
}
