use async_trait::async_trait;

use crate::{
    models::{EntityKind, Record},
    DatabaseError,
};

/// Record store behind the engine. Inserts and deletes are staged and only
/// become visible to `load` after a successful `commit`.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    async fn load(&self, kind: EntityKind) -> Result<Vec<Record>, DatabaseError>;

    /// Stages an upsert keyed by `(record.kind, record.id)`.
    async fn insert(&mut self, record: Record) -> Result<(), DatabaseError>;

    async fn delete(&mut self, kind: EntityKind, id: &str) -> Result<(), DatabaseError>;

    /// Applies staged changes. On failure the staged changes are dropped.
    async fn commit(&mut self) -> Result<(), DatabaseError>;
}
