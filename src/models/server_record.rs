//! `ServerRecord` — one row per fleet instance in the shared registry table.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::constants::liveness;

/// Last-published state of one fleet instance.
///
/// `active_players` carries sentinel meanings alongside live counts:
/// `-1` means the instance reported itself offline, `-2` means the querying
/// side failed to read the record locally, anything `>= 0` is the last known
/// live count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ServerRecord {
    pub id: i32,
    pub address: String,
    pub name: String,
    pub active_players: i32,
    pub max_players: i32,
    pub max_players_offset: i32,
    pub map_name: String,
}

/// Insert payload for administrative registration (id assigned by the store).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewServerRecord {
    pub address: String,
    pub name: String,
}

impl ServerRecord {
    /// Displayed capacity: instance-reported capacity plus the
    /// administrative offset (e.g. reserved slots).
    pub fn effective_capacity(&self) -> i32 {
        self.max_players + self.max_players_offset
    }

    pub fn is_offline(&self) -> bool {
        self.active_players == liveness::OFFLINE
    }

    pub fn is_cache_error(&self) -> bool {
        self.active_players == liveness::CACHE_ERROR
    }

    /// Case-insensitive substring containment against name or map name.
    pub fn matches_term(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self.map_name.to_lowercase().contains(&needle)
    }
}
