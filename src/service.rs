//! # Registry Service
//!
//! Wires the store, identity, cache, publisher, and façades together and
//! exposes the trigger surface the host drives: startup, explicit reloads,
//! map start, player connect/disconnect, round start, and pre-shutdown.
//!
//! Construction never fails. When the credential file is missing or the
//! store is unreachable the service comes up in degraded read-only mode:
//! cache queries still answer from whatever was last fetched, publishing is
//! suppressed, and an explicit reload retries the whole bootstrap.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{error, info};

use crate::config::{DatabaseCredentials, RegistryConfig};
use crate::database::{DatabaseConnection, RegistryStore};
use crate::registry::{
    AdminFacade, IdentityHandle, IdentityResolver, IdentitySource, IdentityState, QueryFacade,
    RegistryCache, StatePublisher,
};

/// Everything that depends on a live credential load. Rebuilt wholesale on
/// every reload, so a credential fix takes effect without a restart.
#[derive(Clone)]
struct ActiveStore {
    connection: DatabaseConnection,
    store: RegistryStore,
}

/// Result of an explicit reload, for operator-facing rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadOutcome {
    /// The id the instance hooked to, when resolution succeeded.
    pub hooked_id: Option<i32>,
}

/// Operator-facing info report (identity, cache size, store connectivity).
#[derive(Debug, Clone)]
pub struct InfoReport {
    pub version: &'static str,
    pub server_identifier: i32,
    pub servers_loaded: usize,
    /// "Connected" or the store fault message.
    pub database_connection: String,
    pub basic_permissions: String,
    pub root_permissions: String,
}

pub struct RegistryService {
    config: RegistryConfig,
    identity: IdentityHandle,
    cache: Arc<RegistryCache>,
    active: RwLock<Option<ActiveStore>>,
}

impl RegistryService {
    /// Build the service and run the startup sequence: credential load,
    /// identity resolution, initial cache refresh.
    pub async fn initialize(mut config: RegistryConfig) -> Self {
        crate::logging::init_structured_logging();
        config.normalize();
        info!(version = env!("CARGO_PKG_VERSION"), "Registry core version");

        let service = Self {
            config,
            identity: IdentityHandle::new(),
            cache: Arc::new(RegistryCache::new()),
            active: RwLock::new(None),
        };
        service.connect_and_resolve().await;
        if service.identity.is_resolved() {
            info!(id = service.identity.id(), "Loaded registry core, hooked to id");
        }
        service.spawn_refresh();
        service
    }

    /// Re-run credential load + identity resolution, then refresh the cache
    /// if an id was hooked. Safe to call at any time.
    pub async fn reload(&self) -> ReloadOutcome {
        self.connect_and_resolve().await;
        let state = self.identity.get();
        if state.is_resolved() {
            info!(id = state.id(), "Reloaded, hooked to id");
            self.spawn_refresh();
            ReloadOutcome {
                hooked_id: Some(state.id()),
            }
        } else {
            info!(
                "Reloaded, but couldn't hook to any id. Check configuration and that this server is present in the database; use the register mutation to add it"
            );
            ReloadOutcome { hooked_id: None }
        }
    }

    /// Cache-only reload (the cheap operator command).
    pub fn reload_servers(&self) {
        self.spawn_refresh();
    }

    /// Map change: reset player count, publish the new map and capacity.
    pub fn on_map_start(&self, map_name: &str, capacity: i32) {
        if let Some(publisher) = self.publisher() {
            publisher.publish_map_start(map_name.to_string(), capacity);
        }
    }

    /// A player finished connecting. `count` is the host-supplied current
    /// active-player count.
    pub fn on_player_connect_complete(&self, count: i32) {
        self.spawn_refresh();
        self.publish_player_count(count);
    }

    pub fn on_player_disconnect(&self, count: i32) {
        self.spawn_refresh();
        self.publish_player_count(count);
    }

    pub fn on_round_start(&self, count: i32) {
        self.spawn_refresh();
        self.publish_player_count(count);
    }

    /// Pre-fatal-shutdown hook: the one publish that is awaited, because the
    /// process will not survive to observe a deferred failure.
    pub async fn on_pre_shutdown(&self) {
        if let Some(publisher) = self.publisher() {
            publisher.publish_shutdown().await;
        }
    }

    /// Cache-backed read façade. Always available, even degraded.
    pub fn queries(&self) -> QueryFacade {
        QueryFacade::new(Arc::clone(&self.cache), self.identity.clone())
    }

    /// Administrative write façade; `None` until a store is configured.
    pub fn admin(&self) -> Option<AdminFacade> {
        let store = self.current_store()?;
        Some(AdminFacade::new(
            store,
            self.identity.clone(),
            self.config.has_usable_self_address(),
        ))
    }

    pub fn identity(&self) -> IdentityState {
        self.identity.get()
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Operator info: version, identity, cache size, live connectivity.
    pub async fn info(&self) -> InfoReport {
        // Clone the connection out so no lock guard lives across the await.
        let connection = self.active.read().as_ref().map(|a| a.connection.clone());
        let database_connection = match connection {
            Some(connection) => match connection.health_check().await {
                Ok(true) => "Connected".to_string(),
                Ok(false) => "Unhealthy".to_string(),
                Err(e) => e.to_string(),
            },
            None => "Not configured".to_string(),
        };
        InfoReport {
            version: env!("CARGO_PKG_VERSION"),
            server_identifier: self.identity.id(),
            servers_loaded: self.cache.len(),
            database_connection,
            basic_permissions: self.config.basic_permissions.clone(),
            root_permissions: self.config.root_permissions.clone(),
        }
    }

    fn publisher(&self) -> Option<StatePublisher> {
        let store = self.current_store()?;
        Some(StatePublisher::new(store, self.identity.clone()))
    }

    fn publish_player_count(&self, count: i32) {
        if let Some(publisher) = self.publisher() {
            publisher.publish_player_count(count);
        }
    }

    fn current_store(&self) -> Option<RegistryStore> {
        self.active.read().as_ref().map(|a| a.store.clone())
    }

    /// Fire-and-forget cache refresh; all state travels as `Arc` clones.
    fn spawn_refresh(&self) {
        let Some(store) = self.current_store() else {
            return;
        };
        let cache = Arc::clone(&self.cache);
        let identity = self.identity.clone();
        tokio::spawn(async move {
            cache.refresh(&store, &identity).await;
        });
    }

    /// The bootstrap shared by startup and reload: load credentials, build
    /// a lazy pool, resolve identity. Every failure collapses identity to
    /// the unresolved sentinel and leaves the previous store (if any) alone.
    async fn connect_and_resolve(&self) {
        let credentials = match DatabaseCredentials::load(&self.config.database_credentials) {
            Ok(credentials) => {
                info!("Loaded database configuration");
                credentials
            }
            Err(e) => {
                error!(critical = true, error = %e, "Error loading database configuration");
                self.identity.set(IdentityState::unresolved(), "bootstrap");
                return;
            }
        };

        // Lazy pool: a store that is down right now degrades the first
        // operation instead of the whole bootstrap.
        let connection =
            match DatabaseConnection::connect_lazy(&credentials.database_url(), &self.config.pool) {
                Ok(connection) => connection,
                Err(e) => {
                    error!(critical = true, error = %e, "Could not configure the store connection");
                    self.identity.set(IdentityState::unresolved(), "bootstrap");
                    return;
                }
            };

        let store = RegistryStore::new(connection.pool().clone(), self.config.table_name.clone());
        *self.active.write() = Some(ActiveStore {
            connection,
            store: store.clone(),
        });

        let resolver = IdentityResolver::new(store, self.identity_source());
        let resolved = resolver.resolve().await;
        self.identity.set(resolved, resolver.source_name());
    }

    fn identity_source(&self) -> IdentitySource {
        match &self.config.server_id_file {
            Some(path) => IdentitySource::IdFile { path: path.clone() },
            None => IdentitySource::AddressLookup {
                address: self.config.self_address.clone(),
            },
        }
    }
}
