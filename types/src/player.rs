use std::fmt::{Debug, Display};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Action, Phase, RoleId, Step};

/// Chooses the moderator's input for the step the match is waiting on.
pub trait Strategy: Debug {
    fn select_action(
        &mut self,
        step: &Step,
        public_info: &PublicInfo,
        available_actions: &[Action],
    ) -> Action;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: Uuid,
    pub display_name: String,
    pub role: RoleId,
    pub alive: bool,
    pub contact: Option<String>,
}

impl Player {
    pub fn new(display_name: impl Into<String>, role: RoleId) -> Self {
        Self {
            id: Uuid::new_v4(),
            display_name: display_name.into(),
            role,
            alive: true,
            contact: None,
        }
    }

    pub fn public_state(&self) -> PublicPlayerState {
        PublicPlayerState {
            id: self.id,
            name: self.display_name.clone(),
            alive: self.alive,
        }
    }
}

impl Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name)
    }
}

/// One pre-match roster slot. An empty name gets a placeholder at start.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    pub phone: Option<String>,
}

impl RosterEntry {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: None,
        }
    }
}

/// What everyone at the table may know about a player: never the role.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicPlayerState {
    pub id: Uuid,
    pub name: String,
    pub alive: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicInfo {
    pub phase: Phase,
    pub round: u32,
    pub public_table: Vec<PublicPlayerState>,
}

impl PublicInfo {
    pub fn get_player_name(&self, id: Uuid) -> Option<&str> {
        self.public_table
            .iter()
            .find(|player| player.id == id)
            .map(|player| player.name.as_str())
    }

    pub fn living(&self) -> impl Iterator<Item = &PublicPlayerState> {
        self.public_table.iter().filter(|player| player.alive)
    }
}
