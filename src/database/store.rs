//! All SQL issued against the registry table.
//!
//! The table name is configurable, so statements are assembled at runtime
//! around a pre-validated identifier; every value travels as a bound
//! parameter. Callers get raw `sqlx` results back — classification into the
//! crate error taxonomy happens at the component layer, where the attempted
//! operation is known.

use sqlx::PgPool;

use crate::models::{NewServerRecord, ServerRecord};

const COLUMNS: &str = "id, address, name, active_players, max_players, max_players_offset, map_name";

/// PostgreSQL `undefined_table`, raised on the first query before anyone has
/// bootstrapped the shared schema.
const UNDEFINED_TABLE: &str = "42P01";

#[derive(Clone)]
pub struct RegistryStore {
    pool: PgPool,
    table: String,
}

impl RegistryStore {
    /// `table` must already be validated as a bare SQL identifier
    /// (`RegistryConfig::normalize` enforces this).
    pub fn new(pool: PgPool, table: String) -> Self {
        Self { pool, table }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Whether a store fault means the registry table does not exist yet.
    pub fn is_undefined_table(err: &sqlx::Error) -> bool {
        match err {
            sqlx::Error::Database(db) => db.code().as_deref() == Some(UNDEFINED_TABLE),
            _ => false,
        }
    }

    /// Idempotent schema bootstrap. Column defaults match what an instance
    /// that has never published looks like: offline, empty capacity, no map.
    pub async fn create_table_if_missing(&self) -> Result<(), sqlx::Error> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {table} (\
                id INTEGER GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY, \
                address VARCHAR(64), \
                name VARCHAR(64), \
                map_name VARCHAR(64) DEFAULT '{unknown_map}', \
                active_players INTEGER DEFAULT {offline}, \
                max_players INTEGER DEFAULT 0, \
                max_players_offset INTEGER DEFAULT 0\
            )",
            table = self.table,
            unknown_map = crate::constants::UNKNOWN_MAP,
            offline = crate::constants::liveness::OFFLINE,
        );
        sqlx::query(&sql).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn find_by_address(
        &self,
        address: &str,
    ) -> Result<Option<ServerRecord>, sqlx::Error> {
        let sql = format!(
            "SELECT {COLUMNS} FROM {table} WHERE address = $1",
            table = self.table
        );
        sqlx::query_as::<_, ServerRecord>(&sql)
            .bind(address)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<ServerRecord>, sqlx::Error> {
        let sql = format!(
            "SELECT {COLUMNS} FROM {table} WHERE id = $1",
            table = self.table
        );
        sqlx::query_as::<_, ServerRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Single wholesale read backing every cache refresh and the raw admin
    /// list. Fetch order is the order queriers see.
    pub async fn list_all(&self) -> Result<Vec<ServerRecord>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM {table} ORDER BY id", table = self.table);
        sqlx::query_as::<_, ServerRecord>(&sql)
            .fetch_all(&self.pool)
            .await
    }

    /// Id-keyed upsert used by register/edit once identity is resolved.
    pub async fn upsert_self(
        &self,
        id: i32,
        address: &str,
        name: &str,
    ) -> Result<u64, sqlx::Error> {
        let sql = format!(
            "INSERT INTO {table} (id, address, name) VALUES ($1, $2, $3) \
             ON CONFLICT (id) DO UPDATE SET address = EXCLUDED.address, name = EXCLUDED.name",
            table = self.table
        );
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(address)
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Plain insert for bootstrapping a row before identity exists; the
    /// store assigns the id.
    pub async fn insert_new(&self, record: &NewServerRecord) -> Result<i32, sqlx::Error> {
        let sql = format!(
            "INSERT INTO {table} (address, name) VALUES ($1, $2) RETURNING id",
            table = self.table
        );
        let (id,): (i32,) = sqlx::query_as(&sql)
            .bind(&record.address)
            .bind(&record.name)
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    pub async fn delete(&self, id: i32) -> Result<u64, sqlx::Error> {
        let sql = format!("DELETE FROM {table} WHERE id = $1", table = self.table);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Administrative offset mutation. Touches only `max_players_offset`.
    pub async fn set_offset(&self, id: i32, offset: i32) -> Result<u64, sqlx::Error> {
        let sql = format!(
            "UPDATE {table} SET max_players_offset = $1 WHERE id = $2",
            table = self.table
        );
        let result = sqlx::query(&sql)
            .bind(offset)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn set_player_count(&self, id: i32, count: i32) -> Result<u64, sqlx::Error> {
        let sql = format!(
            "UPDATE {table} SET active_players = $1 WHERE id = $2",
            table = self.table
        );
        let result = sqlx::query(&sql)
            .bind(count)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Map-start reset: zero players, new map, current capacity.
    pub async fn set_map_start(
        &self,
        id: i32,
        map_name: &str,
        max_players: i32,
    ) -> Result<u64, sqlx::Error> {
        let sql = format!(
            "UPDATE {table} SET active_players = 0, map_name = $1, max_players = $2 WHERE id = $3",
            table = self.table
        );
        let result = sqlx::query(&sql)
            .bind(map_name)
            .bind(max_players)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Clean-shutdown marker, written once before process exit.
    pub async fn set_shutdown(&self, id: i32) -> Result<u64, sqlx::Error> {
        let sql = format!(
            "UPDATE {table} SET active_players = $1 WHERE id = $2",
            table = self.table
        );
        let result = sqlx::query(&sql)
            .bind(crate::constants::liveness::OFFLINE)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_table_detection_ignores_non_database_errors() {
        assert!(!RegistryStore::is_undefined_table(&sqlx::Error::RowNotFound));
        assert!(!RegistryStore::is_undefined_table(&sqlx::Error::PoolClosed));
    }
}
