use std::collections::BTreeMap;

use async_trait::async_trait;

use super::{PendingChanges, PendingOp, PersistenceGateway};
use crate::{
    models::{EntityKind, Record},
    DatabaseError,
};

/// Process-local store. `set_available(false)` makes every load and commit
/// fail, to exercise degraded durability.
#[derive(Debug)]
pub struct MemoryStore {
    records: BTreeMap<(EntityKind, String), Record>,
    pending: PendingChanges,
    available: bool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
            pending: PendingChanges::new(),
            available: true,
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn check_available(&self) -> Result<(), DatabaseError> {
        if self.available {
            Ok(())
        } else {
            Err(DatabaseError::Unavailable("memory store is offline".to_string()))
        }
    }
}

#[async_trait]
impl PersistenceGateway for MemoryStore {
    async fn load(&self, kind: EntityKind) -> Result<Vec<Record>, DatabaseError> {
        self.check_available()?;
        Ok(self
            .records
            .iter()
            .filter(|((record_kind, _), _)| *record_kind == kind)
            .map(|(_, record)| record.clone())
            .collect())
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
        self.check_available()?;
        for op in ops {
            match op {
                PendingOp::Upsert(record) => {
                    self.records.insert((record.kind, record.id.clone()), record);
                }
                PendingOp::Delete { kind, id } => {
                    self.records.remove(&(kind, id));
                }
            }
        }
        Ok(())
    }
}
