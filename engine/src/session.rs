use rand::Rng;
use types::{
    Action, GameError, HouseRules, Notification, Phase, RoleCounts, RosterEntry, StateError, Step,
    StepKind,
};
use uuid::Uuid;

use crate::{assignment, MatchSession};

/// Input to the match state machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Start {
        player_count: usize,
        role_counts: RoleCounts,
        roster: Vec<RosterEntry>,
        rules: HouseRules,
    },
    RevealNext,
    /// Ends the reveal sequence at once and enters the first night.
    SkipReveal,
    Submit {
        step: u64,
        action: Action,
    },
    /// The phase timer ran out on `step`. `selection` is whatever target
    /// the moderator had highlighted.
    TimerElapsed {
        step: u64,
        selection: Option<Uuid>,
    },
    Abandon,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum SessionState {
    #[default]
    NoSession,
    Active(Box<MatchSession>),
}

impl SessionState {
    pub fn session(&self) -> Option<&MatchSession> {
        match self {
            SessionState::NoSession => None,
            SessionState::Active(session) => Some(session),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, SessionState::Active(session) if !session.is_over())
    }

    pub fn current_step(&self) -> Option<Step> {
        self.session().and_then(MatchSession::current_step)
    }

    fn active_mut(&mut self) -> Result<&mut MatchSession, StateError> {
        match self {
            SessionState::NoSession => Err(StateError::NoActiveSession),
            SessionState::Active(session) => Ok(session),
        }
    }

    pub fn apply(&mut self, command: Command) -> Result<Vec<Notification>, GameError> {
        self.apply_with_rng(command, &mut rand::thread_rng())
    }

    /// Applies one command. On error the state is exactly as it was.
    pub fn apply_with_rng<R: Rng + ?Sized>(
        &mut self,
        command: Command,
        rng: &mut R,
    ) -> Result<Vec<Notification>, GameError> {
        match command {
            Command::Start {
                player_count,
                role_counts,
                roster,
                rules,
            } => {
                if self.is_active() {
                    return Err(StateError::SessionAlreadyActive.into());
                }
                let session =
                    assignment::start_game(player_count, &role_counts, &roster, rules, rng)?;
                let notification = Notification::PhaseChanged {
                    phase: session.phase,
                    round: session.round,
                };
                *self = SessionState::Active(Box::new(session));
                Ok(vec![notification])
            }
            Command::Abandon => {
                self.active_mut()?;
                log::info!("Match abandoned");
                *self = SessionState::NoSession;
                Ok(Vec::new())
            }
            Command::RevealNext => Ok(self.active_mut()?.reveal_next()?),
            Command::SkipReveal => Ok(self.active_mut()?.skip_reveal()?),
            Command::Submit { step, action } => Ok(self.active_mut()?.submit(step, action)?),
            Command::TimerElapsed { step, selection } => {
                Ok(self.active_mut()?.timer_elapsed(step, selection)?)
            }
        }
    }
}

impl MatchSession {
    /// The input the match is waiting for, if any. A pending hunter revenge
    /// takes precedence over whatever phase the match is in.
    pub fn current_step(&self) -> Option<Step> {
        if matches!(self.phase, Phase::Setup | Phase::Reveal | Phase::Ended) {
            return None;
        }
        if let Some(hunter) = self.pending_hunter_revenge {
            return Some(Step {
                id: self.step,
                kind: StepKind::HunterRevenge { hunter },
                actors: vec![hunter],
                eligible: self.hunter_targets(),
                can_skip: self.can_skip_hunter_revenge(),
            });
        }
        match self.phase {
            Phase::Night => self.night_stage.map(|stage| Step {
                id: self.step,
                kind: StepKind::Night(stage),
                actors: self.stage_actors(stage),
                eligible: self.stage_targets(stage),
                can_skip: self.stage_can_skip(stage),
            }),
            Phase::Day if !self.vote_resolved => Some(Step {
                id: self.step,
                kind: StepKind::DayVote,
                actors: self.living().map(|p| p.id).collect(),
                eligible: self.vote_targets(),
                can_skip: self.can_skip_vote(),
            }),
            _ => None,
        }
    }

    pub fn vote_targets(&self) -> Vec<types::PublicPlayerState> {
        self.living().map(|p| p.public_state()).collect()
    }

    pub fn can_skip_vote(&self) -> bool {
        self.rules.allow_skip_day_voting || self.vote_targets().is_empty()
    }

    fn missing_step_error(&self) -> StateError {
        match self.phase {
            Phase::Ended => StateError::MatchEnded,
            Phase::Reveal | Phase::Setup => StateError::WrongPhase {
                expected: Phase::Night,
                actual: self.phase,
            },
            _ => StateError::NoPendingStep,
        }
    }

    pub(crate) fn reveal_next(&mut self) -> Result<Vec<Notification>, StateError> {
        self.require_phase(Phase::Reveal)?;
        self.reveal_cursor += 1;
        let mut notifications = Vec::new();
        if self.reveal_cursor >= self.players.len() {
            self.begin_night(&mut notifications);
            self.settle(&mut notifications);
        }
        Ok(notifications)
    }

    pub(crate) fn skip_reveal(&mut self) -> Result<Vec<Notification>, StateError> {
        self.require_phase(Phase::Reveal)?;
        log::info!("Reveal skipped");
        self.reveal_cursor = self.players.len();
        let mut notifications = Vec::new();
        self.begin_night(&mut notifications);
        self.settle(&mut notifications);
        Ok(notifications)
    }

    fn require_phase(&self, expected: Phase) -> Result<(), StateError> {
        match self.phase {
            Phase::Ended => Err(StateError::MatchEnded),
            actual if actual != expected => Err(StateError::WrongPhase { expected, actual }),
            _ => Ok(()),
        }
    }

    pub(crate) fn submit(
        &mut self,
        step_id: u64,
        action: Action,
    ) -> Result<Vec<Notification>, StateError> {
        if step_id < self.step {
            log::debug!("Ignoring {action} for completed step {step_id}");
            return Ok(Vec::new());
        }
        let step = self
            .current_step()
            .filter(|step| step.id == step_id)
            .ok_or_else(|| self.missing_step_error())?;
        if !action.belongs_to(&step.kind) {
            return Err(StateError::OutOfStage {
                step: step.kind,
                action: action.to_string(),
            });
        }
        log::info!("{}", step.describe_action(&action));
        self.complete_step(&step, action.target(), false)
    }

    pub(crate) fn timer_elapsed(
        &mut self,
        step_id: u64,
        selection: Option<Uuid>,
    ) -> Result<Vec<Notification>, StateError> {
        if !self.rules.timer_enabled() {
            return Err(StateError::TimerDisabled);
        }
        if step_id < self.step {
            log::debug!("Timer fired for completed step {step_id}");
            return Ok(Vec::new());
        }
        let step = self
            .current_step()
            .filter(|step| step.id == step_id)
            .ok_or_else(|| self.missing_step_error())?;
        let selection = selection.filter(|target| {
            let eligible = step.is_eligible(*target);
            if !eligible {
                log::warn!("Timer selection {target} is no longer eligible, closing without it");
            }
            eligible
        });
        if let StepKind::HunterRevenge { .. } = step.kind {
            if selection.is_none() && !step.can_skip {
                log::debug!("Timer cannot close a hunter revenge that may not be skipped");
                return Ok(Vec::new());
            }
        }
        log::info!("Timer elapsed on {}", step.kind);
        self.complete_step(&step, selection, true)
    }

    /// `forced` lets a timer finish a night stage or vote with no target even
    /// where a manual skip is not allowed.
    fn complete_step(
        &mut self,
        step: &Step,
        target: Option<Uuid>,
        forced: bool,
    ) -> Result<Vec<Notification>, StateError> {
        let mut notifications = match step.kind {
            StepKind::Night(stage) => self.finish_stage(stage, target, forced)?,
            StepKind::DayVote => {
                self.resolve_day_vote(target, forced)?;
                Vec::new()
            }
            StepKind::HunterRevenge { hunter } => {
                match target {
                    Some(target) => self.execute_hunter_revenge(hunter, target)?,
                    None => self.skip_hunter_revenge()?,
                }
                Vec::new()
            }
        };
        self.step += 1;
        self.settle(&mut notifications);
        Ok(notifications)
    }

    /// Closes the day vote, eliminating `target` by vote if there is one.
    fn resolve_day_vote(&mut self, target: Option<Uuid>, forced: bool) -> Result<(), StateError> {
        if self.phase != Phase::Day || self.vote_resolved {
            return Err(StateError::NoPendingStep);
        }
        if let Some(hunter) = self.pending_hunter_revenge {
            return Err(StateError::OutOfStage {
                step: StepKind::HunterRevenge { hunter },
                action: "day vote".to_string(),
            });
        }
        match target {
            Some(target) => {
                self.require_player(target)?;
                if !self.vote_targets().iter().any(|p| p.id == target) {
                    return Err(StateError::IneligibleTarget { target });
                }
                self.eliminate(target, types::EliminationMethod::Vote)?;
            }
            None if !forced && !self.can_skip_vote() => {
                return Err(StateError::SkipNotAllowed {
                    step: StepKind::DayVote,
                })
            }
            None => log::info!("Day ended without an elimination"),
        }
        self.vote_resolved = true;
        Ok(())
    }

    /// Moves through every transition the current state already allows:
    /// announce a pending revenge, end the match, or advance night/day.
    fn settle(&mut self, notifications: &mut Vec<Notification>) {
        loop {
            if let Some(hunter) = self.pending_hunter_revenge {
                notifications.push(Notification::HunterRevengePending {
                    hunter,
                    eligible: self.hunter_targets(),
                });
                return;
            }
            if let Some(ended) = self.conclude_if_decided() {
                notifications.push(ended);
                return;
            }
            match self.phase {
                Phase::Night if self.night_stage.is_none() => self.begin_day(notifications),
                Phase::Day if self.vote_resolved => self.begin_night(notifications),
                _ => return,
            }
        }
    }

    fn begin_night(&mut self, notifications: &mut Vec<Notification>) {
        if self.phase == Phase::Day {
            self.round += 1;
        }
        self.phase = Phase::Night;
        self.vote_resolved = false;
        log::info!("Night {} begins", self.round);
        notifications.push(Notification::PhaseChanged {
            phase: Phase::Night,
            round: self.round,
        });
        self.night_stage = self.next_stage_after(None);
        match self.night_stage {
            Some(stage) => notifications.push(self.stage_ready(stage)),
            None => self.resolve_night(),
        }
    }

    fn begin_day(&mut self, notifications: &mut Vec<Notification>) {
        self.phase = Phase::Day;
        self.vote_resolved = false;
        log::info!("Day {} begins", self.round);
        notifications.push(Notification::PhaseChanged {
            phase: Phase::Day,
            round: self.round,
        });
        notifications.push(Notification::DayVoteReady {
            eligible: self.vote_targets(),
            can_skip: self.can_skip_vote(),
        });
    }
}
