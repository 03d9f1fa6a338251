//! # Registry Core Components
//!
//! The four components built on the database layer:
//!
//! - [`identity`] — resolves which registry row is *this* instance and owns
//!   the process-wide identity handle.
//! - [`cache`] — wholesale-replaced snapshot of every instance's
//!   last-published state.
//! - [`publisher`] — best-effort liveness publishing into our own row.
//! - [`queries`] — cache-backed search/list with record classification.
//! - [`admin`] — administrative mutations issued directly against the store.
//!
//! Nothing here blocks the host's event loop: store I/O happens on spawned
//! tasks or inside operations the host already awaits (reload, shutdown).

pub mod admin;
pub mod cache;
pub mod identity;
pub mod publisher;
pub mod queries;

pub use admin::{AdminFacade, AdminOutcome};
pub use cache::{RefreshOutcome, RegistryCache};
pub use identity::{IdentityHandle, IdentityResolver, IdentitySource, IdentityState};
pub use publisher::{PublishOutcome, StatePublisher};
pub use queries::{ClassifiedServer, QueryFacade, SearchOutcome, ServerClass};
