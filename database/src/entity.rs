use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use types::{HouseRules, RoleDefinition, RolePreset};

use crate::{
    models::{EntityKind, FrequentPlayer, Record, SavedConfig},
    DatabaseError, PersistenceGateway,
};

/// A value that can be stored as a [`Record`].
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    const KIND: EntityKind;

    fn record_id(&self) -> String;

    fn to_record(&self) -> Result<Record, DatabaseError> {
        Ok(Record {
            kind: Self::KIND,
            id: self.record_id(),
            payload: serde_json::to_value(self)?,
            updated_at: Utc::now(),
        })
    }

    fn from_record(record: &Record) -> Result<Self, DatabaseError> {
        Ok(serde_json::from_value(record.payload.clone())?)
    }
}

impl Entity for RoleDefinition {
    const KIND: EntityKind = EntityKind::RoleDefinition;

    fn record_id(&self) -> String {
        self.id.as_str().to_string()
    }
}

impl Entity for RolePreset {
    const KIND: EntityKind = EntityKind::RolePreset;

    fn record_id(&self) -> String {
        self.id.clone()
    }
}

pub const HOUSE_RULES_ID: &str = "default";

/// House rules are a singleton record.
impl Entity for HouseRules {
    const KIND: EntityKind = EntityKind::HouseRules;

    fn record_id(&self) -> String {
        HOUSE_RULES_ID.to_string()
    }
}

impl Entity for SavedConfig {
    const KIND: EntityKind = EntityKind::SavedConfig;

    fn record_id(&self) -> String {
        self.id.to_string()
    }
}

impl Entity for FrequentPlayer {
    const KIND: EntityKind = EntityKind::FrequentPlayer;

    fn record_id(&self) -> String {
        self.id.to_string()
    }
}

pub async fn load_all<T, S>(store: &S) -> Result<Vec<T>, DatabaseError>
where
    T: Entity,
    S: PersistenceGateway + ?Sized,
{
    store
        .load(T::KIND)
        .await?
        .iter()
        .map(T::from_record)
        .collect()
}

pub async fn load_entity<T, S>(store: &S, id: &str) -> Result<T, DatabaseError>
where
    T: Entity,
    S: PersistenceGateway + ?Sized,
{
    let records = store.load(T::KIND).await?;
    let record = records
        .iter()
        .find(|record| record.id == id)
        .ok_or_else(|| DatabaseError::RecordNotFound {
            kind: T::KIND.to_string(),
            id: id.to_string(),
        })?;
    T::from_record(record)
}

pub async fn insert_entity<T, S>(store: &mut S, entity: &T) -> Result<(), DatabaseError>
where
    T: Entity,
    S: PersistenceGateway + ?Sized,
{
    let record = entity.to_record()?;
    store.insert(record).await
}

pub async fn delete_entity<T, S>(store: &mut S, entity: &T) -> Result<(), DatabaseError>
where
    T: Entity,
    S: PersistenceGateway + ?Sized,
{
    store.delete(T::KIND, &entity.record_id()).await
}
