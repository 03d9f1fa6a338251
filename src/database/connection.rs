//! Pooled connection to the shared relational store.
//!
//! The pool is deliberately bounded and idle-timed: liveness publishing is
//! high-frequency fire-and-forget, and pooling amortizes connection setup
//! across those bursts without pinning idle sockets between rounds.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

use crate::config::PoolSettings;

#[derive(Clone)]
pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    /// Connect eagerly, verifying the credentials with a real handshake.
    pub async fn connect(database_url: &str, pool: &PoolSettings) -> Result<Self, sqlx::Error> {
        let pool = Self::options(pool).connect(database_url).await?;
        Ok(Self { pool })
    }

    /// Build the pool without touching the network. Connections are opened
    /// on first use, so a store that is down at startup degrades the first
    /// operation instead of failing construction.
    pub fn connect_lazy(database_url: &str, pool: &PoolSettings) -> Result<Self, sqlx::Error> {
        let pool = Self::options(pool).connect_lazy(database_url)?;
        Ok(Self { pool })
    }

    fn options(settings: &PoolSettings) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .idle_timeout(Duration::from_secs(settings.idle_timeout_secs))
            .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Round-trip probe used by the operator-facing info report.
    pub async fn health_check(&self) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 as health").fetch_one(&self.pool).await?;
        let health: i32 = row.get("health");
        Ok(health == 1)
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}
