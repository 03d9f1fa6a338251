//! Identity resolution failure paths that must never touch the store.
//!
//! These tests use a lazily constructed pool pointing at an unroutable
//! endpoint: if any code path issued a store command, resolution would go
//! through the error arm instead of the configuration arm, and the
//! assertions on the returned state would still hold but the dedicated
//! "accepts valid input" tests below would fail differently. The lazy pool
//! performs no I/O at construction time.

use std::io::Write;

use serverslist_core::{
    IdentityResolver, IdentitySource, RegistryStore,
};

fn unroutable_store() -> RegistryStore {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy("postgres://u:p@127.0.0.1:1/none")
        .expect("lazy pool");
    RegistryStore::new(pool, "serverslist_servers".to_string())
}

#[tokio::test]
async fn empty_address_is_unresolved_without_store_contact() {
    let resolver = IdentityResolver::new(
        unroutable_store(),
        IdentitySource::AddressLookup {
            address: String::new(),
        },
    );
    let state = resolver.resolve().await;
    assert!(!state.is_resolved());
    assert_eq!(state.id(), -1);
}

#[tokio::test]
async fn unset_sentinel_address_is_unresolved_without_store_contact() {
    let resolver = IdentityResolver::new(
        unroutable_store(),
        IdentitySource::AddressLookup {
            address: "0.0.0.0".to_string(),
        },
    );
    let state = resolver.resolve().await;
    assert!(!state.is_resolved());
}

#[tokio::test]
async fn missing_id_file_is_unresolved_without_store_contact() {
    let resolver = IdentityResolver::new(
        unroutable_store(),
        IdentitySource::IdFile {
            path: "/nonexistent/id.json".into(),
        },
    );
    let state = resolver.resolve().await;
    assert!(!state.is_resolved());
}

#[tokio::test]
async fn malformed_id_file_is_unresolved_without_store_contact() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, "{{\"id\": \"seven\"}}").expect("write");

    let resolver = IdentityResolver::new(
        unroutable_store(),
        IdentitySource::IdFile {
            path: file.path().to_path_buf(),
        },
    );
    let state = resolver.resolve().await;
    assert!(!state.is_resolved());
}

#[tokio::test]
async fn zero_id_in_file_is_unresolved_without_store_contact() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, "{{\"id\": 0}}").expect("write");

    let resolver = IdentityResolver::new(
        unroutable_store(),
        IdentitySource::IdFile {
            path: file.path().to_path_buf(),
        },
    );
    let state = resolver.resolve().await;
    assert!(!state.is_resolved());
}

#[tokio::test]
async fn store_fault_during_address_lookup_is_unresolved_not_a_panic() {
    // A usable address forces the lookup to actually hit the (unroutable)
    // store; the fault must be swallowed into the unresolved sentinel.
    let resolver = IdentityResolver::new(
        unroutable_store(),
        IdentitySource::AddressLookup {
            address: "10.0.0.1:27015".to_string(),
        },
    );
    let state = resolver.resolve().await;
    assert!(!state.is_resolved());
    assert_eq!(state.id(), -1);
}
