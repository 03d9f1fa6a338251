//! # Administrative Mutations
//!
//! Register/edit, delete, and offset writes issued directly against the
//! store, bypassing the cache (the caller refreshes afterwards). Each
//! operation validates its input before any store contact.
//!
//! None of this is transactional: an existence check followed by a mutation
//! can race a concurrent delete. That lost update is accepted as best-effort
//! and shows up as a logged affected-row anomaly rather than an error.

use tracing::warn;

use crate::constants::operations;
use crate::database::RegistryStore;
use crate::error::{RegistryError, Result};
use crate::models::{NewServerRecord, ServerRecord};
use crate::registry::identity::IdentityHandle;

/// Successful administrative outcomes the host renders distinctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminOutcome {
    /// Existing row updated (id-keyed upsert hit the conflict arm).
    Updated,
    /// New row inserted; the store assigned this id.
    Inserted { id: i32 },
    Deleted,
    OffsetSet,
    /// The mutation succeeded but affected an unexpected number of rows —
    /// a concurrent delete or stale identity. Logged, not escalated.
    Anomaly { rows: u64 },
}

pub struct AdminFacade {
    store: RegistryStore,
    identity: IdentityHandle,
    /// Whether the configured self-address can key a bootstrap insert while
    /// identity is still unresolved.
    self_address_usable: bool,
}

impl AdminFacade {
    pub fn new(store: RegistryStore, identity: IdentityHandle, self_address_usable: bool) -> Self {
        Self {
            store,
            identity,
            self_address_usable,
        }
    }

    /// Register or edit this instance's row. With resolved identity this is
    /// an id-keyed upsert of address and name; while unresolved it falls
    /// back to a plain insert (store assigns the id), which bootstraps the
    /// row the resolver needs before the next reload.
    pub async fn register(&self, address: &str, name: &str) -> Result<AdminOutcome> {
        if address.is_empty() || name.is_empty() {
            return Err(RegistryError::validation("Too short name/address"));
        }

        let state = self.identity.get();
        if state.is_resolved() {
            let rows = self
                .store
                .upsert_self(state.id(), address, name)
                .await
                .map_err(|e| RegistryError::database(operations::ADMIN_REGISTER, e))?;
            // Postgres reports 1 affected row for both upsert arms.
            if rows == 1 {
                Ok(AdminOutcome::Updated)
            } else {
                warn!(
                    operation = operations::ADMIN_REGISTER,
                    rows_affected = rows,
                    "{rows} rows affected instead of 1"
                );
                Ok(AdminOutcome::Anomaly { rows })
            }
        } else if self.self_address_usable {
            let record = NewServerRecord {
                address: address.to_string(),
                name: name.to_string(),
            };
            let id = self
                .store
                .insert_new(&record)
                .await
                .map_err(|e| RegistryError::database(operations::ADMIN_REGISTER, e))?;
            Ok(AdminOutcome::Inserted { id })
        } else {
            Err(RegistryError::Identity {
                message: "Can't edit/insert server data, identity is not hooked to any server"
                    .to_string(),
            })
        }
    }

    /// Delete a row by id. The existence check runs first so "not found" is
    /// reported distinctly from a failed delete.
    pub async fn delete(&self, id: i32) -> Result<AdminOutcome> {
        let existing = self
            .store
            .find_by_id(id)
            .await
            .map_err(|e| RegistryError::database(operations::ADMIN_DELETE, e))?;
        if existing.is_none() {
            return Err(RegistryError::not_found(format!(
                "Server with id {id} does not exist in database"
            )));
        }

        let rows = self
            .store
            .delete(id)
            .await
            .map_err(|e| RegistryError::database(operations::ADMIN_DELETE, e))?;
        if rows == 1 {
            Ok(AdminOutcome::Deleted)
        } else {
            warn!(
                operation = operations::ADMIN_DELETE,
                rows_affected = rows,
                "{rows} rows affected instead of 1"
            );
            Ok(AdminOutcome::Anomaly { rows })
        }
    }

    /// Set `max_players_offset` for a row. The raw value must parse as an
    /// integer before any store access; then the row must exist.
    pub async fn set_offset(&self, id: i32, raw_offset: &str) -> Result<AdminOutcome> {
        let offset: i32 = raw_offset
            .trim()
            .parse()
            .map_err(|_| RegistryError::validation("Given offset is not a valid number"))?;

        let existing = self
            .store
            .find_by_id(id)
            .await
            .map_err(|e| RegistryError::database(operations::ADMIN_OFFSET, e))?;
        if existing.is_none() {
            return Err(RegistryError::not_found(format!(
                "Server with id {id} does not exist in database"
            )));
        }

        let rows = self
            .store
            .set_offset(id, offset)
            .await
            .map_err(|e| RegistryError::database(operations::ADMIN_OFFSET, e))?;
        if rows == 1 {
            Ok(AdminOutcome::OffsetSet)
        } else {
            warn!(
                operation = operations::ADMIN_OFFSET,
                rows_affected = rows,
                "{rows} rows affected instead of 1"
            );
            Ok(AdminOutcome::Anomaly { rows })
        }
    }

    /// Raw full-table read, bypassing the cache. Root-tier listing.
    pub async fn list_raw(&self) -> Result<Vec<ServerRecord>> {
        self.store
            .list_all()
            .await
            .map_err(|e| RegistryError::database(operations::ADMIN_LIST, e))
    }
}
