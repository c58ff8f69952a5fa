use thiserror::Error;
use uuid::Uuid;

use crate::{Phase, RoleId, StepKind};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Role counts add up to {total} but there are {player_count} players")]
    CountMismatch { total: usize, player_count: usize },

    #[error("At least {min} players are required, got {player_count}")]
    TooFewPlayers { player_count: usize, min: usize },

    #[error("At least one werewolf is required")]
    NoWerewolves,

    #[error("{werewolves} werewolves is too many, at most {max} allowed")]
    TooManyWerewolves { werewolves: usize, max: usize },

    #[error("Role {role} is unique but was selected {count} times")]
    DuplicateUniqueRole { role: RoleId, count: usize },

    #[error("Roster has {names} names for {player_count} players")]
    RosterTooLong { names: usize, player_count: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("No match is in progress")]
    NoActiveSession,

    #[error("A match is already in progress")]
    SessionAlreadyActive,

    #[error("The match has already ended")]
    MatchEnded,

    #[error("Expected phase {expected}, match is in {actual}")]
    WrongPhase { expected: Phase, actual: Phase },

    #[error("The match is not waiting for any input")]
    NoPendingStep,

    #[error("{action} is not valid during the {step}")]
    OutOfStage { step: StepKind, action: String },

    #[error("Player {target} is not an eligible target")]
    IneligibleTarget { target: Uuid },

    #[error("Unknown player {player}")]
    UnknownPlayer { player: Uuid },

    #[error("The {step} cannot be skipped")]
    SkipNotAllowed { step: StepKind },

    #[error("No hunter revenge is pending")]
    NoPendingRevenge,

    #[error("Hunter {actual} has no pending revenge, {expected} does")]
    WrongHunter { expected: Uuid, actual: Uuid },

    #[error("The phase timer is disabled")]
    TimerDisabled,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid setup: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid action: {0}")]
    State(#[from] StateError),
}
