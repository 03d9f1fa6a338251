//! # System Constants
//!
//! Sentinel values, configuration defaults, and operation names that define
//! the operational boundaries of the fleet registry core.
//!
//! The liveness sentinels are part of the persisted data model: every reader
//! of the shared table interprets them the same way, so they must never
//! change meaning between releases.

/// Liveness sentinels stored in the `active_players` column.
pub mod liveness {
    /// The instance reported a clean shutdown (or never came back up).
    pub const OFFLINE: i32 = -1;

    /// The querying side failed to read this record locally. Never written
    /// by a remote instance about itself.
    pub const CACHE_ERROR: i32 = -2;
}

/// Self-identity sentinels. A positive value is a resolved registry row id.
pub mod identity {
    /// Identity has not been resolved yet this process lifetime.
    pub const UNINITIALIZED: i32 = 0;

    /// Resolution was attempted and failed; publishing stays suppressed
    /// until a reload succeeds.
    pub const UNRESOLVED: i32 = -1;
}

/// Configuration defaults, applied with a logged warning when the host
/// supplies an empty or unusable value.
pub mod defaults {
    pub const TABLE_NAME: &str = "serverslist_servers";
    pub const BASIC_PERMISSIONS: &str = "registry/basic";
    pub const ROOT_PERMISSIONS: &str = "registry/root";
    pub const POOL_MAX_CONNECTIONS: u32 = 10;
    pub const POOL_IDLE_TIMEOUT_SECS: u64 = 30;
    pub const POOL_ACQUIRE_TIMEOUT_SECS: u64 = 5;
}

/// Address value meaning "not configured". Resolution treats it the same as
/// an empty string: a configuration error, not a lookup candidate.
pub const UNSET_ADDRESS: &str = "0.0.0.0";

/// The `map_name` column default for rows that never published a map.
pub const UNKNOWN_MAP: &str = "null";

/// Operation names used to identify failed store operations in logs.
pub mod operations {
    pub const RESOLVE_IDENTITY: &str = "resolve_identity";
    pub const CREATE_TABLE: &str = "create_table_if_missing";
    pub const REFRESH_CACHE: &str = "refresh_cache";
    pub const PUBLISH_PLAYER_COUNT: &str = "publish_player_count";
    pub const PUBLISH_MAP_START: &str = "publish_map_start";
    pub const PUBLISH_SHUTDOWN: &str = "publish_shutdown";
    pub const ADMIN_REGISTER: &str = "admin_register";
    pub const ADMIN_DELETE: &str = "admin_delete";
    pub const ADMIN_OFFSET: &str = "admin_offset";
    pub const ADMIN_LIST: &str = "admin_list";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_are_distinct() {
        assert_ne!(liveness::OFFLINE, liveness::CACHE_ERROR);
        assert!(liveness::OFFLINE < 0);
        assert!(liveness::CACHE_ERROR < 0);
        assert_ne!(identity::UNINITIALIZED, identity::UNRESOLVED);
    }

    #[test]
    fn unset_address_is_not_empty() {
        // Both spellings of "unset" are rejected by resolution, but they are
        // different values and both must be covered.
        assert!(!UNSET_ADDRESS.is_empty());
    }
}
