use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    PlayerEliminated,
    WerewolfTarget,
    DoctorProtection,
    PlayerSaved,
    HunterRevenge,
    MediumCheck,
    JesterWin,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EliminationMethod {
    Vote,
    Werewolf,
    Hunter,
    Unknown,
}

impl Display for EliminationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            EliminationMethod::Vote => "vote",
            EliminationMethod::Werewolf => "werewolf",
            EliminationMethod::Hunter => "hunter",
            EliminationMethod::Unknown => "unknown",
        };
        write!(f, "{text}")
    }
}

/// Entry in a match's append-only history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind,
    pub description: String,
    pub actor: Option<Uuid>,
    pub target: Option<Uuid>,
    pub method: Option<EliminationMethod>,
}

impl GameEvent {
    pub fn new(kind: EventKind, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            kind,
            description: description.into(),
            actor: None,
            target: None,
            method: None,
        }
    }

    pub fn actor(mut self, actor: Uuid) -> Self {
        self.actor = Some(actor);
        self
    }

    pub fn target(mut self, target: Uuid) -> Self {
        self.target = Some(target);
        self
    }

    pub fn method(mut self, method: EliminationMethod) -> Self {
        self.method = Some(method);
        self
    }
}

impl Display for GameEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.timestamp.format("%H:%M:%S"), self.description)
    }
}
