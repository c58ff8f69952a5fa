use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use types::RoleCounts;
use uuid::Uuid;

use crate::DatabaseError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    RoleDefinition,
    RolePreset,
    SavedConfig,
    MatchSession,
    HouseRules,
    FrequentPlayer,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::RoleDefinition,
        EntityKind::RolePreset,
        EntityKind::SavedConfig,
        EntityKind::MatchSession,
        EntityKind::HouseRules,
        EntityKind::FrequentPlayer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::RoleDefinition => "role_definition",
            EntityKind::RolePreset => "role_preset",
            EntityKind::SavedConfig => "saved_config",
            EntityKind::MatchSession => "match_session",
            EntityKind::HouseRules => "house_rules",
            EntityKind::FrequentPlayer => "frequent_player",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .iter()
            .find(|kind| kind.as_str() == s)
            .copied()
            .ok_or_else(|| DatabaseError::UnknownKind(s.to_string()))
    }
}

/// One stored row: a JSON payload addressed by `(kind, id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub kind: EntityKind,
    pub id: String,
    pub payload: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

impl Record {
    pub fn uuid_id(&self) -> Result<Uuid, DatabaseError> {
        Ok(Uuid::parse_str(&self.id)?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedWrite {
    pub id: Option<i64>,
    pub timestamp: DateTime<Utc>,
    pub error_type: String,
    pub error_message: String,
    pub data: Option<serde_json::Value>,
}

impl FailedWrite {
    pub fn new(error: &DatabaseError, data: Option<serde_json::Value>) -> Self {
        Self {
            id: None,
            timestamp: Utc::now(),
            error_type: error.error_type().to_string(),
            error_message: error.to_string(),
            data,
        }
    }
}

/// The last configuration a match was started with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedConfig {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub players_count: usize,
    pub role_selection: RoleCounts,
    pub preset_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequentPlayer {
    pub id: Uuid,
    pub display_name: String,
    pub last_played_at: DateTime<Utc>,
    pub play_count: u32,
}

impl FrequentPlayer {
    pub fn new(display_name: impl Into<String>, played_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            display_name: display_name.into(),
            last_played_at: played_at,
            play_count: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_round_trip_through_their_names() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.as_str().parse::<EntityKind>().unwrap(), kind);
        }
        assert!(matches!(
            "game".parse::<EntityKind>(),
            Err(DatabaseError::UnknownKind(name)) if name == "game"
        ));
    }

    #[test]
    fn record_ids_can_be_read_as_uuids() {
        let id = Uuid::new_v4();
        let record = Record {
            kind: EntityKind::FrequentPlayer,
            id: id.to_string(),
            payload: serde_json::Value::Null,
            updated_at: Utc::now(),
        };
        assert_eq!(record.uuid_id().unwrap(), id);

        let bad = Record {
            id: "default".to_string(),
            ..record
        };
        assert!(matches!(bad.uuid_id(), Err(DatabaseError::UuidParsing(_))));
    }
}
