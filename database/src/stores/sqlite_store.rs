use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use super::{PendingChanges, PendingOp, PersistenceGateway};
use crate::{
    models::{EntityKind, Record},
    retry::{retry_with_backoff, RetryFuture},
    DatabaseConfig, DatabaseError,
};

const CREATE_RECORDS: &str = "CREATE TABLE IF NOT EXISTS records (
    kind TEXT NOT NULL,
    id TEXT NOT NULL,
    payload TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (kind, id)
)";

pub struct SqliteStore {
    pool: SqlitePool,
    pending: PendingChanges,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            pending: PendingChanges::new(),
        }
    }

    /// Opens the pool with retries and makes sure the records table exists.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let retries = config.connect_retries;
        let pool = retry_with_backoff(
            || -> RetryFuture<SqlitePool, DatabaseError> {
                let config = config.clone();
                Box::pin(async move { config.create_pool().await })
            },
            retries,
            Duration::from_millis(100),
        )
        .await
        .map_err(|e| DatabaseError::RetryExhausted(format!("{} attempts: {e}", retries + 1)))?;

        let store = Self::new(pool);
        store.ensure_schema().await?;
        tracing::info!("Opened record store at {}", config.url);
        Ok(store)
    }

    pub async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        sqlx::query(CREATE_RECORDS)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn apply(&self, ops: Vec<PendingOp>) -> Result<(), DatabaseError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DatabaseError::Transaction(e.to_string()))?;

        for op in ops {
            match op {
                PendingOp::Upsert(record) => {
                    let payload = serde_json::to_string(&record.payload)?;
                    sqlx::query(
                        "INSERT INTO records (kind, id, payload, updated_at) VALUES (?, ?, ?, ?)
                         ON CONFLICT(kind, id) DO UPDATE SET payload = excluded.payload, updated_at = excluded.updated_at",
                    )
                    .bind(record.kind.as_str())
                    .bind(&record.id)
                    .bind(payload)
                    .bind(record.updated_at)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| DatabaseError::Query(e.to_string()))?;
                }
                PendingOp::Delete { kind, id } => {
                    sqlx::query("DELETE FROM records WHERE kind = ? AND id = ?")
                        .bind(kind.as_str())
                        .bind(&id)
                        .execute(&mut *tx)
                        .await
                        .map_err(|e| DatabaseError::Query(e.to_string()))?;
                }
            }
        }

        tx.commit()
            .await
            .map_err(|e| DatabaseError::Transaction(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl PersistenceGateway for SqliteStore {
    async fn load(&self, kind: EntityKind) -> Result<Vec<Record>, DatabaseError> {
        let rows =
            sqlx::query("SELECT id, payload, updated_at FROM records WHERE kind = ? ORDER BY id")
                .bind(kind.as_str())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| DatabaseError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                let payload: String = row.get("payload");
                let updated_at: DateTime<Utc> = row
                    .try_get("updated_at")
                    .map_err(|e| DatabaseError::Query(e.to_string()))?;
                Ok(Record {
                    kind,
                    id: row.get("id"),
                    payload: serde_json::from_str(&payload)?,
                    updated_at,
                })
            })
            .collect()
    }

    async fn insert(&mut self, record: Record) -> Result<(), DatabaseError> {
        self.pending.upsert(record);
        Ok(())
    }

    async fn delete(&mut self, kind: EntityKind, id: &str) -> Result<(), DatabaseError> {
        self.pending.delete(kind, id);
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), DatabaseError> {
        let ops = self.pending.take();
        if ops.is_empty() {
            return Ok(());
        }
        let count = ops.len();
        match self.apply(ops).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!("Commit of {} staged changes failed: {}", count, e);
                Err(e)
            }
        }
    }
}
