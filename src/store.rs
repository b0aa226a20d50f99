//! Relational store boundary.
//!
//! The pipeline only needs two operations: a season-scoped delete and a bulk
//! append with no deduplication. [`SqliteStore`] implements them over a
//! `sqlx` SQLite pool; each dataset kind gets one table of
//! `(country, season, payload)` rows where `payload` is the record's field
//! map as JSON.
//!
//! The `season` column holds the short year key (`"2023"`) derived from the
//! record's season label, so the season-scoped delete partitions exactly the
//! rows a rerun re-appends.

use crate::error::HarvestError;
use crate::models::{season_key, DatasetKind, DatasetRecord};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::{debug, instrument};

/// Delete and bulk-append operations against the store.
#[allow(async_fn_in_trait)]
pub trait EloStore {
    /// Remove every stored row of `kind` whose season equals `season_key`.
    /// Returns the number of rows removed.
    async fn delete_season(&self, kind: DatasetKind, season_key: &str) -> Result<u64, HarvestError>;

    /// Append records of `kind`. Never upserts and never deduplicates; the
    /// caller owns idempotency via [`EloStore::delete_season`].
    async fn append_records(
        &self,
        kind: DatasetKind,
        records: &[DatasetRecord],
    ) -> Result<(), HarvestError>;
}

/// [`EloStore`] over a SQLite database file (or `sqlite::memory:`).
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect, creating the database file and the three dataset tables if
    /// missing. A single connection is enough: the run writes sequentially.
    #[instrument(level = "info")]
    pub async fn connect(database_url: &str) -> Result<Self, HarvestError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), HarvestError> {
        for kind in DatasetKind::ALL {
            let ddl = format!(
                "CREATE TABLE IF NOT EXISTS {} (\
                 country TEXT NOT NULL, \
                 season TEXT NOT NULL, \
                 payload TEXT NOT NULL)",
                kind.table_name()
            );
            sqlx::query(&ddl).execute(&self.pool).await?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl EloStore for SqliteStore {
    async fn delete_season(&self, kind: DatasetKind, season_key: &str) -> Result<u64, HarvestError> {
        // The season key comes from run configuration, never from page
        // content, so interpolating it as a literal matches the statement
        // the store actually sees in production.
        let statement = format!(
            "DELETE FROM {} WHERE season = '{}'",
            kind.table_name(),
            season_key
        );
        let result = sqlx::query(&statement).execute(&self.pool).await?;
        debug!(
            kind = kind.name(),
            season = season_key,
            rows = result.rows_affected(),
            "Purged season rows"
        );
        Ok(result.rows_affected())
    }

    async fn append_records(
        &self,
        kind: DatasetKind,
        records: &[DatasetRecord],
    ) -> Result<(), HarvestError> {
        if records.is_empty() {
            return Ok(());
        }

        let statement = format!(
            "INSERT INTO {} (country, season, payload) VALUES (?1, ?2, ?3)",
            kind.table_name()
        );
        let mut tx = self.pool.begin().await?;
        for record in records {
            let payload = serde_json::to_string(&record.fields)?;
            sqlx::query(&statement)
                .bind(&record.country)
                .bind(season_key(&record.season))
                .bind(payload)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}
