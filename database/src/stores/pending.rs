use serde::{Deserialize, Serialize};

use crate::models::{EntityKind, Record};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PendingOp {
    Upsert(Record),
    Delete { kind: EntityKind, id: String },
}

impl PendingOp {
    pub fn key(&self) -> (EntityKind, &str) {
        match self {
            PendingOp::Upsert(record) => (record.kind, record.id.as_str()),
            PendingOp::Delete { kind, id } => (*kind, id.as_str()),
        }
    }
}

/// Changes collected between commits, applied in the order they were made.
#[derive(Debug, Clone, Default)]
pub struct PendingChanges {
    ops: Vec<PendingOp>,
}

impl PendingChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&mut self, record: Record) {
        self.ops.push(PendingOp::Upsert(record));
    }

    pub fn delete(&mut self, kind: EntityKind, id: impl Into<String>) {
        self.ops.push(PendingOp::Delete {
            kind,
            id: id.into(),
        });
    }

    pub fn ops(&self) -> &[PendingOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn take(&mut self) -> Vec<PendingOp> {
        std::mem::take(&mut self.ops)
    }
}
