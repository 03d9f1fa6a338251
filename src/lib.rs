#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # ServersList Core
//!
//! Registry synchronization core for a fleet of server instances sharing one
//! relational store. Each running instance publishes its own liveness state
//! (player count, active map, shutdown flag) into its registry row and keeps
//! a local read cache of every instance's last-published state, so
//! list/search queries answer without per-query round trips.
//!
//! ## Architecture
//!
//! The hard part is reconciling a locally running process with a remote
//! shared table under partial failure: missing schema, missing row,
//! transient connection faults, concurrent readers and writers — all without
//! ever blocking the host's event loop. The core splits into:
//!
//! - [`database`] — pooled store connector and every SQL statement.
//! - [`registry::identity`] — which registry row is *this* instance, with
//!   self-healing schema bootstrap and an unresolved sentinel that
//!   suppresses publishing.
//! - [`registry::cache`] — wholesale-replaced snapshot backing all reads.
//! - [`registry::publisher`] — fire-and-forget liveness publishing; only
//!   the shutdown publish is awaited.
//! - [`registry::queries`] / [`registry::admin`] — the read and write
//!   façades the host's command layer calls.
//! - [`service`] — wiring plus the host trigger surface (startup, reload,
//!   map start, player connect/disconnect, round start, pre-shutdown).
//!
//! ## Consistency model
//!
//! Pull-based and best-effort: the cache refreshes by piggybacking on
//! frequent host events, publishes are independent spawned tasks, and no
//! ordering is guaranteed across independently triggered operations. A
//! missed liveness update self-heals on the next trigger.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use serverslist_core::config::RegistryConfig;
//! use serverslist_core::service::RegistryService;
//!
//! # async fn example() {
//! let config = RegistryConfig {
//!     database_credentials: "/etc/fleet/database.json".into(),
//!     self_address: "10.0.0.1:27015".to_string(),
//!     ..RegistryConfig::default()
//! };
//! let service = RegistryService::initialize(config).await;
//!
//! // Host event hooks:
//! service.on_map_start("de_dust2", 16);
//! service.on_player_connect_complete(1);
//!
//! // Player-facing search:
//! let outcome = service.queries().search("dust");
//! # let _ = outcome;
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod registry;
pub mod service;

pub use config::{DatabaseCredentials, PoolSettings, RegistryConfig, ServerIdFile};
pub use database::{DatabaseConnection, RegistryStore};
pub use error::{RegistryError, Result};
pub use logging::init_structured_logging;
pub use models::{NewServerRecord, ServerRecord};
pub use registry::{
    AdminFacade, AdminOutcome, ClassifiedServer, IdentityHandle, IdentityResolver, IdentitySource,
    IdentityState, PublishOutcome, QueryFacade, RefreshOutcome, RegistryCache, SearchOutcome,
    ServerClass, StatePublisher,
};
pub use service::{InfoReport, RegistryService, ReloadOutcome};
