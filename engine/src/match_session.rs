use std::fmt::Display;

use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use types::{
    GameEvent, HouseRules, NightStage, Outcome, Phase, Player, PublicInfo, PublicPlayerState,
    RoleId, StateError,
};
use uuid::Uuid;

/// The mutable record of one match.
///
/// Players are fixed at creation and never removed; elimination only flips
/// `alive` and appends to `eliminated`. Mutation goes through the impl
/// blocks in `night`, `elimination`, `win` and `session`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchSession {
    pub(crate) id: Uuid,
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) players: Vec<Player>,
    pub(crate) phase: Phase,
    pub(crate) round: u32,
    pub(crate) eliminated: Vec<Uuid>,
    pub(crate) history: Vec<GameEvent>,
    pub(crate) werewolf_target: Option<Uuid>,
    pub(crate) doctor_protection: Option<Uuid>,
    pub(crate) last_doctor_protection: Option<Uuid>,
    pub(crate) doctor_self_save_used: bool,
    pub(crate) pending_hunter_revenge: Option<Uuid>,
    pub(crate) hunter_target: Option<Uuid>,
    /// Rules in force for this match, fixed at start.
    pub(crate) rules: HouseRules,
    pub(crate) reveal_cursor: usize,
    /// The night stage waiting for input, if any.
    pub(crate) night_stage: Option<NightStage>,
    pub(crate) vote_resolved: bool,
    pub(crate) step: u64,
    pub(crate) outcome: Option<Outcome>,
}

impl MatchSession {
    /// Creates a match in the reveal phase from already-assigned players.
    pub fn with_players(players: Vec<Player>, rules: HouseRules) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            players,
            phase: Phase::Reveal,
            round: 1,
            eliminated: Vec::new(),
            history: Vec::new(),
            werewolf_target: None,
            doctor_protection: None,
            last_doctor_protection: None,
            doctor_self_save_used: false,
            pending_hunter_revenge: None,
            hunter_target: None,
            rules: rules.sanitized(),
            reveal_cursor: 0,
            night_stage: None,
            vote_resolved: false,
            step: 0,
            outcome: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn eliminated(&self) -> &[Uuid] {
        &self.eliminated
    }

    pub fn history(&self) -> &[GameEvent] {
        &self.history
    }

    pub fn werewolf_target(&self) -> Option<Uuid> {
        self.werewolf_target
    }

    pub fn doctor_protection(&self) -> Option<Uuid> {
        self.doctor_protection
    }

    pub fn last_doctor_protection(&self) -> Option<Uuid> {
        self.last_doctor_protection
    }

    pub fn doctor_self_save_used(&self) -> bool {
        self.doctor_self_save_used
    }

    pub fn pending_hunter_revenge(&self) -> Option<Uuid> {
        self.pending_hunter_revenge
    }

    pub fn hunter_target(&self) -> Option<Uuid> {
        self.hunter_target
    }

    pub fn rules(&self) -> &HouseRules {
        &self.rules
    }

    pub fn night_stage(&self) -> Option<NightStage> {
        self.night_stage
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn step_id(&self) -> u64 {
        self.step
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::Ended
    }

    pub fn get_player(&self, id: Uuid) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub(crate) fn get_player_mut(&mut self, id: Uuid) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub(crate) fn require_player(&self, id: Uuid) -> Result<&Player, StateError> {
        self.get_player(id)
            .ok_or(StateError::UnknownPlayer { player: id })
    }

    pub fn living(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.alive)
    }

    pub fn living_with_role(&self, role: RoleId) -> impl Iterator<Item = &Player> {
        self.living().filter(move |p| p.role == role)
    }

    pub fn living_werewolves(&self) -> usize {
        self.living().filter(|p| p.role.is_werewolf()).count()
    }

    pub fn living_non_werewolves(&self) -> usize {
        self.living().filter(|p| !p.role.is_werewolf()).count()
    }

    /// The living mayor, if the match has one. The role carries no rule of
    /// its own; this is for the table to know who leads the vote.
    pub fn mayor(&self) -> Option<&Player> {
        self.living_with_role(RoleId::Mayor).next()
    }

    /// The player whose role card is currently being shown.
    pub fn reveal_current(&self) -> Option<&Player> {
        match self.phase {
            Phase::Reveal => self.players.get(self.reveal_cursor),
            _ => None,
        }
    }

    pub fn public_table(&self) -> Vec<PublicPlayerState> {
        self.players.iter().map(Player::public_state).collect()
    }

    pub fn public_info(&self) -> PublicInfo {
        PublicInfo {
            phase: self.phase,
            round: self.round,
            public_table: self.public_table(),
        }
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        log::debug!("{event}");
        self.history.push(event);
    }
}

impl Display for MatchSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let table = self
            .players
            .iter()
            .map(|p| {
                if p.alive {
                    p.display_name.clone()
                } else {
                    format!("({})", p.display_name)
                }
            })
            .join(", ");
        write!(f, "Round {} [{}]: {table}", self.round, self.phase)
    }
}
