pub mod config;
pub mod entity;
pub mod error;
pub mod models;
pub mod retry;
pub mod seed;
pub mod stores;

pub use config::DatabaseConfig;
pub use entity::{delete_entity, insert_entity, load_all, load_entity, Entity};
pub use error::DatabaseError;
pub use models::{EntityKind, FailedWrite, FrequentPlayer, Record, SavedConfig};
pub use retry::retry_with_backoff;
pub use seed::{seed_defaults, SeedReport};
pub use stores::{MemoryStore, PendingOp, PersistenceGateway, SqliteStore};

// NoopStore for when persistence is not needed
pub struct NoopStore;

#[async_trait::async_trait]
impl PersistenceGateway for NoopStore {
    async fn load(&self, _kind: EntityKind) -> Result<Vec<Record>, DatabaseError> {
        Ok(Vec::new())
    }

    async fn insert(&mut self, _record: Record) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn delete(&mut self, _kind: EntityKind, _id: &str) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
