//! # Query Façade
//!
//! Cache-backed reads: list and substring search, with every matched record
//! classified for rendering. The host turns classifications into chat
//! output; this module only decides *what* each record is.
//!
//! Classification precedence is Offline > CacheError > Self > Online: a
//! record that reported itself offline renders as offline even when it is
//! our own row.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::models::ServerRecord;
use crate::registry::cache::RegistryCache;
use crate::registry::identity::IdentityHandle;

/// How one record should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerClass {
    /// `active_players == -1`: the instance reported a clean shutdown.
    Offline,
    /// `active_players == -2`: the querying side failed to read this record.
    /// Defensive-only under wholesale refresh.
    CacheError,
    /// Our own row: rendered without a connect affordance.
    SelfInstance,
    /// A live remote instance.
    Online,
}

/// A record paired with its classification and display capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedServer {
    pub record: ServerRecord,
    pub class: ServerClass,
    /// `max_players + max_players_offset`, the capacity shown to players.
    pub effective_capacity: i32,
}

/// The three response shapes a search produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    NotFound,
    /// A unique match carries full detail and a connect directive.
    Unique(ClassifiedServer),
    /// Multiple matches render one summary line per record.
    Multiple(Vec<ClassifiedServer>),
}

pub fn classify(record: &ServerRecord, self_id: i32) -> ServerClass {
    if record.is_offline() {
        ServerClass::Offline
    } else if record.is_cache_error() {
        ServerClass::CacheError
    } else if record.id == self_id {
        ServerClass::SelfInstance
    } else {
        ServerClass::Online
    }
}

fn classified(record: ServerRecord, self_id: i32) -> ClassifiedServer {
    let class = classify(&record, self_id);
    let effective_capacity = record.effective_capacity();
    ClassifiedServer {
        record,
        class,
        effective_capacity,
    }
}

/// Read-side façade over the cache. Reads keep working from the last
/// snapshot even when the instance is otherwise degraded.
#[derive(Clone)]
pub struct QueryFacade {
    cache: Arc<RegistryCache>,
    identity: IdentityHandle,
}

impl QueryFacade {
    pub fn new(cache: Arc<RegistryCache>, identity: IdentityHandle) -> Self {
        Self { cache, identity }
    }

    /// Every cached record, classified, in store fetch order.
    pub fn list(&self) -> Vec<ClassifiedServer> {
        let self_id = self.identity.id();
        self.cache
            .snapshot()
            .iter()
            .map(|r| classified(r.clone(), self_id))
            .collect()
    }

    /// Case-insensitive substring search over name and map name.
    pub fn search(&self, term: &str) -> SearchOutcome {
        let self_id = self.identity.id();
        let mut matches = self.cache.search(term);
        match matches.len() {
            0 => SearchOutcome::NotFound,
            1 => SearchOutcome::Unique(classified(matches.remove(0), self_id)),
            _ => SearchOutcome::Multiple(
                matches.into_iter().map(|r| classified(r, self_id)).collect(),
            ),
        }
    }

    /// Whether reads should warn the operator: nothing cached, or identity
    /// resolution has failed outright.
    pub fn is_degraded(&self) -> bool {
        self.cache.is_empty() || self.identity.id() == crate::constants::identity::UNRESOLVED
    }
}
