use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::RoleId;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Setup,
    Reveal,
    Night,
    Day,
    Ended,
}

impl Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Phase::Setup => "setup",
            Phase::Reveal => "reveal",
            Phase::Night => "night",
            Phase::Day => "day",
            Phase::Ended => "ended",
        };
        write!(f, "{text}")
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NightStage {
    Werewolf,
    Seer,
    Doctor,
    Medium,
}

impl NightStage {
    /// Resolution order within one night.
    pub const ORDER: [NightStage; 4] = [
        NightStage::Werewolf,
        NightStage::Seer,
        NightStage::Doctor,
        NightStage::Medium,
    ];

    pub fn role(&self) -> RoleId {
        match self {
            NightStage::Werewolf => RoleId::Werewolf,
            NightStage::Seer => RoleId::Seer,
            NightStage::Doctor => RoleId::Doctor,
            NightStage::Medium => RoleId::Medium,
        }
    }
}

impl Display for NightStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.role())
    }
}
