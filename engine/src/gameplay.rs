use chrono::Utc;
use database::{PersistenceGateway, SavedConfig};
use itertools::Itertools;
use types::{
    dispatch, GameError, HouseRules, MatchObserver, NightStage, Notification, Outcome, Phase,
    PublicPlayerState, RoleCatalog, StateError, Strategy,
};
use uuid::Uuid;

use crate::{
    persistence::DurabilityLog, roster::FrequentPlayers, Command, MatchSession, SessionState,
    SetupDraft,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchReport {
    pub outcome: Outcome,
    pub message: String,
    pub rounds: u32,
    pub failed_writes: usize,
}

/// Observer that only writes to the log.
#[derive(Debug, Default)]
pub struct LogObserver;

impl MatchObserver for LogObserver {
    fn on_phase_changed(&mut self, phase: Phase, round: u32) {
        log::info!("{phase} {round}");
    }

    fn on_night_stage_ready(&mut self, stage: NightStage, eligible: &[PublicPlayerState]) {
        log::debug!("{stage} may choose from {}", names(eligible));
    }

    fn on_hunter_revenge_pending(&mut self, _hunter: Uuid, eligible: &[PublicPlayerState]) {
        log::debug!("The hunter may take one of {}", names(eligible));
    }

    fn on_day_vote_ready(&mut self, eligible: &[PublicPlayerState], can_skip: bool) {
        log::debug!("Vote between {} (skip allowed: {can_skip})", names(eligible));
    }

    fn on_game_ended(&mut self, _outcome: &Outcome, message: &str) {
        log::info!("{message}");
    }
}

fn names(players: &[PublicPlayerState]) -> String {
    players.iter().map(|p| p.name.as_str()).join(", ")
}

/// Validates the draft, starts the match and stores the configuration and
/// the names that played.
pub async fn start_match(
    state: &mut SessionState,
    draft: &SetupDraft,
    rules: HouseRules,
    store: &mut dyn PersistenceGateway,
    durability: &mut DurabilityLog,
    frequent: &mut FrequentPlayers,
) -> Result<Vec<Notification>, GameError> {
    draft.validate()?;
    let notifications = state.apply(draft.start_command(rules))?;
    let session = active(state)?;

    let now = Utc::now();
    let config = SavedConfig {
        id: Uuid::new_v4(),
        date: now,
        players_count: draft.player_count(),
        role_selection: draft.role_counts().clone(),
        preset_id: draft.selected_preset().map(str::to_string),
    };
    durability.save_session(store, session).await;
    durability.save_config(store, &config).await;

    let played = session
        .players()
        .iter()
        .map(|p| p.display_name.as_str())
        .collect_vec();
    let changed = frequent.record_names(&played, now);
    durability.save_frequent_players(store, &changed).await;
    Ok(notifications)
}

/// Drives a started match to the end.
///
/// Every player's card is shown in turn, then the strategy answers each
/// step until a side wins. The session is written after every command;
/// write failures are collected in `durability` and never stop the match.
pub async fn run_match(
    state: &mut SessionState,
    catalog: &RoleCatalog,
    strategy: &mut dyn Strategy,
    observer: &mut dyn MatchObserver,
    store: &mut dyn PersistenceGateway,
    durability: &mut DurabilityLog,
) -> Result<MatchReport, GameError> {
    while let Some(player) = active(state)?.reveal_current() {
        let role = catalog.get(player.role);
        log::info!("{} is the {role}", player.display_name);
        let notifications = state.apply(Command::RevealNext)?;
        dispatch(observer, &notifications);
        durability.save_session(store, active(state)?).await;
    }

    while let Some(step) = state.current_step() {
        let session = active(state)?;
        log::debug!("{session}");
        let available_actions = step.permitted_actions();
        log::debug!("Permitted: {}", available_actions.iter().join(", "));
        let public_info = session.public_info();
        let selected_action = strategy.select_action(&step, &public_info, &available_actions);
        let notifications = state.apply(Command::Submit {
            step: step.id,
            action: selected_action,
        })?;
        dispatch(observer, &notifications);
        durability.save_session(store, active(state)?).await;
    }

    let session = active(state)?;
    let outcome = session.outcome().cloned().ok_or(StateError::NoPendingStep)?;
    Ok(MatchReport {
        message: outcome.message(),
        outcome,
        rounds: session.round(),
        failed_writes: durability.failed_writes().len(),
    })
}

fn active(state: &SessionState) -> Result<&MatchSession, StateError> {
    state.session().ok_or(StateError::NoActiveSession)
}
