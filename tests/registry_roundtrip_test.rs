//! Store-backed round-trip test.
//!
//! Requires a reachable PostgreSQL instance; set `DATABASE_URL` to run it.
//! Without the variable the test is a no-op so the default suite stays
//! database-free.

use serverslist_core::{
    DatabaseConnection, IdentityHandle, IdentityResolver, IdentitySource, NewServerRecord,
    PoolSettings, PublishOutcome, RefreshOutcome, RegistryCache, RegistryStore, SearchOutcome,
    ServerClass, StatePublisher,
};

fn database_url() -> Option<String> {
    std::env::var("DATABASE_URL").ok()
}

#[tokio::test]
async fn resolve_publish_refresh_search_roundtrip() {
    let Some(url) = database_url() else {
        eprintln!("DATABASE_URL not set, skipping store-backed roundtrip test");
        return;
    };
    let connection = DatabaseConnection::connect(&url, &PoolSettings::default())
        .await
        .expect("connect");
    assert!(connection.health_check().await.expect("health check"));
    let pool = connection.pool().clone();

    // Isolated table per run so concurrent test invocations don't collide.
    let table = format!("serverslist_rt_{}", std::process::id());
    let store = RegistryStore::new(pool.clone(), table.clone());
    store.create_table_if_missing().await.expect("create table");
    // Repeated creation is idempotent.
    store.create_table_if_missing().await.expect("create table twice");

    // Seed one row the way the administrative register bootstrap does.
    let id = store
        .insert_new(&NewServerRecord {
            address: "10.0.0.1:27015".to_string(),
            name: "Alpha".to_string(),
        })
        .await
        .expect("insert");

    // Resolve by address.
    let resolver = IdentityResolver::new(
        store.clone(),
        IdentitySource::AddressLookup {
            address: "10.0.0.1:27015".to_string(),
        },
    );
    let state = resolver.resolve().await;
    assert!(state.is_resolved());
    assert_eq!(state.id(), id);

    let identity = IdentityHandle::new();
    identity.set(state, "test");

    // Publish a map start and wait for the row to reflect it.
    let publisher = StatePublisher::new(store.clone(), identity.clone());
    assert_eq!(
        publisher.publish_map_start("de_dust2".to_string(), 16),
        PublishOutcome::Dispatched
    );
    let mut updated = None;
    for _ in 0..50 {
        let row = store.find_by_id(id).await.expect("find").expect("row");
        if row.map_name == "de_dust2" {
            updated = Some(row);
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    }
    let row = updated.expect("map start publish should land");
    assert_eq!(row.active_players, 0);
    assert_eq!(row.max_players, 16);

    // Refresh the cache and search.
    let cache = RegistryCache::new();
    let outcome = cache.refresh(&store, &identity).await;
    assert_eq!(outcome, RefreshOutcome::Replaced(1));

    let queries = serverslist_core::QueryFacade::new(std::sync::Arc::new(cache), identity.clone());
    match queries.search("alpha") {
        SearchOutcome::Unique(hit) => {
            assert_eq!(hit.record.id, id);
            assert_eq!(hit.class, ServerClass::SelfInstance);
        }
        other => panic!("expected unique self match, got {other:?}"),
    }

    // Shutdown publish marks the row offline.
    publisher.publish_shutdown().await;
    let row = store.find_by_id(id).await.expect("find").expect("row");
    assert_eq!(row.active_players, -1);

    // Offset mutation touches only max_players_offset.
    let admin = serverslist_core::AdminFacade::new(store.clone(), identity.clone(), true);
    admin.set_offset(id, "5").await.expect("offset");
    let row = store.find_by_id(id).await.expect("find").expect("row");
    assert_eq!(row.max_players_offset, 5);
    assert_eq!(row.active_players, -1);
    assert_eq!(row.map_name, "de_dust2");

    // Delete on a missing id is NotFound; on the real id it works.
    let missing = admin.delete(id + 1000).await;
    assert!(matches!(
        missing,
        Err(serverslist_core::RegistryError::NotFound { .. })
    ));
    admin.delete(id).await.expect("delete");
    assert!(store.find_by_id(id).await.expect("find").is_none());

    sqlx::query(&format!("DROP TABLE IF EXISTS {table}"))
        .execute(&pool)
        .await
        .expect("drop");
}
