//! Property-based tests for cache search and record classification.

use proptest::prelude::*;
use std::sync::Arc;

use serverslist_core::{
    IdentityHandle, IdentityState, QueryFacade, RegistryCache, SearchOutcome, ServerClass,
    ServerRecord,
};

fn record_strategy() -> impl Strategy<Value = ServerRecord> {
    (
        1..500i32,
        "[a-zA-Z0-9 _-]{0,16}",
        "[a-z0-9_]{0,16}",
        -2..64i32,
        0..64i32,
        -8..8i32,
    )
        .prop_map(|(id, name, map_name, active, max, offset)| ServerRecord {
            id,
            address: format!("10.0.0.{}:27015", id % 250),
            name,
            active_players: active,
            max_players: max,
            max_players_offset: offset,
            map_name,
        })
}

proptest! {
    /// Every search hit contains the term case-insensitively in name or
    /// map name, and every record left out does not.
    #[test]
    fn search_results_are_exactly_the_containment_matches(
        records in proptest::collection::vec(record_strategy(), 0..24),
        term in "[a-zA-Z0-9_]{1,6}",
    ) {
        let cache = RegistryCache::new();
        cache.replace(records.clone());

        let hits = cache.search(&term);
        let needle = term.to_lowercase();

        for hit in &hits {
            prop_assert!(
                hit.name.to_lowercase().contains(&needle)
                    || hit.map_name.to_lowercase().contains(&needle)
            );
        }

        let hit_count = records
            .iter()
            .filter(|r| {
                r.name.to_lowercase().contains(&needle)
                    || r.map_name.to_lowercase().contains(&needle)
            })
            .count();
        prop_assert_eq!(hits.len(), hit_count);
    }

    /// Search never inverts fetch order.
    #[test]
    fn search_preserves_fetch_order(
        records in proptest::collection::vec(record_strategy(), 0..24),
    ) {
        let cache = RegistryCache::new();
        cache.replace(records);
        let everything = cache.search("");
        let positions: Vec<usize> = everything
            .iter()
            .map(|r| {
                cache
                    .snapshot()
                    .iter()
                    .position(|s| s == r)
                    .expect("hit must come from the snapshot")
            })
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] <= w[1]));
    }

    /// The outcome shape is determined purely by the number of matches.
    #[test]
    fn outcome_shape_matches_hit_count(
        records in proptest::collection::vec(record_strategy(), 0..24),
        term in "[a-zA-Z0-9_]{1,6}",
        self_id in 0..500i32,
    ) {
        let cache = Arc::new(RegistryCache::new());
        cache.replace(records);
        let identity = IdentityHandle::new();
        if self_id > 0 {
            identity.set(IdentityState::resolved(self_id), "test");
        }
        let facade = QueryFacade::new(Arc::clone(&cache), identity);

        let hit_count = cache.search(&term).len();
        match facade.search(&term) {
            SearchOutcome::NotFound => prop_assert_eq!(hit_count, 0),
            SearchOutcome::Unique(_) => prop_assert_eq!(hit_count, 1),
            SearchOutcome::Multiple(hits) => {
                prop_assert!(hit_count > 1);
                prop_assert_eq!(hits.len(), hit_count);
            }
        }
    }

    /// Offline and cache-error sentinels always win over the self check,
    /// and the self class only ever appears on the resolved id's row.
    #[test]
    fn classification_precedence_holds(
        records in proptest::collection::vec(record_strategy(), 1..24),
        self_id in 1..500i32,
    ) {
        let cache = Arc::new(RegistryCache::new());
        cache.replace(records);
        let identity = IdentityHandle::new();
        identity.set(IdentityState::resolved(self_id), "test");
        let facade = QueryFacade::new(Arc::clone(&cache), identity);

        for entry in facade.list() {
            match entry.record.active_players {
                -1 => prop_assert_eq!(entry.class, ServerClass::Offline),
                -2 => prop_assert_eq!(entry.class, ServerClass::CacheError),
                _ if entry.record.id == self_id => {
                    prop_assert_eq!(entry.class, ServerClass::SelfInstance)
                }
                _ => prop_assert_eq!(entry.class, ServerClass::Online),
            }
            prop_assert_eq!(
                entry.effective_capacity,
                entry.record.max_players + entry.record.max_players_offset
            );
        }
    }
}
