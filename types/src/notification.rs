use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{NightStage, Phase, PublicPlayerState};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    JesterWins { jester: Uuid, name: String },
    VillagersWin,
    WerewolvesWin,
}

impl Outcome {
    pub fn message(&self) -> String {
        match self {
            Outcome::JesterWins { name, .. } => format!("The Jester {name} wins the game!"),
            Outcome::VillagersWin => {
                "Villagers win! All werewolves have been eliminated.".to_string()
            }
            Outcome::WerewolvesWin => {
                "Werewolves win! They outnumber the remaining players.".to_string()
            }
        }
    }
}

/// Engine to UI signals, emitted in order by each applied command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notification {
    PhaseChanged {
        phase: Phase,
        round: u32,
    },
    NightStageReady {
        stage: NightStage,
        eligible: Vec<PublicPlayerState>,
    },
    HunterRevengePending {
        hunter: Uuid,
        eligible: Vec<PublicPlayerState>,
    },
    DayVoteReady {
        eligible: Vec<PublicPlayerState>,
        can_skip: bool,
    },
    Inspection {
        stage: NightStage,
        target: Uuid,
        is_werewolf: bool,
    },
    GameEnded {
        outcome: Outcome,
        message: String,
    },
}

/// Receiver for [`Notification`]s owned by whoever composes the app.
/// Every hook defaults to doing nothing.
pub trait MatchObserver {
    fn on_phase_changed(&mut self, _phase: Phase, _round: u32) {}

    fn on_night_stage_ready(&mut self, _stage: NightStage, _eligible: &[PublicPlayerState]) {}

    fn on_hunter_revenge_pending(&mut self, _hunter: Uuid, _eligible: &[PublicPlayerState]) {}

    fn on_day_vote_ready(&mut self, _eligible: &[PublicPlayerState], _can_skip: bool) {}

    fn on_inspection(&mut self, _stage: NightStage, _target: Uuid, _is_werewolf: bool) {}

    fn on_game_ended(&mut self, _outcome: &Outcome, _message: &str) {}
}

pub fn dispatch(observer: &mut dyn MatchObserver, notifications: &[Notification]) {
    for notification in notifications {
        match notification {
            Notification::PhaseChanged { phase, round } => {
                observer.on_phase_changed(*phase, *round)
            }
            Notification::NightStageReady { stage, eligible } => {
                observer.on_night_stage_ready(*stage, eligible)
            }
            Notification::HunterRevengePending { hunter, eligible } => {
                observer.on_hunter_revenge_pending(*hunter, eligible)
            }
            Notification::DayVoteReady { eligible, can_skip } => {
                observer.on_day_vote_ready(eligible, *can_skip)
            }
            Notification::Inspection {
                stage,
                target,
                is_werewolf,
            } => observer.on_inspection(*stage, *target, *is_werewolf),
            Notification::GameEnded { outcome, message } => {
                observer.on_game_ended(outcome, message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        phases: Vec<(Phase, u32)>,
        ended: Option<String>,
    }

    impl MatchObserver for Recorder {
        fn on_phase_changed(&mut self, phase: Phase, round: u32) {
            self.phases.push((phase, round));
        }

        fn on_game_ended(&mut self, _outcome: &Outcome, message: &str) {
            self.ended = Some(message.to_string());
        }
    }

    #[test]
    fn dispatch_routes_to_hooks() {
        let mut recorder = Recorder::default();
        let outcome = Outcome::VillagersWin;
        dispatch(
            &mut recorder,
            &[
                Notification::PhaseChanged {
                    phase: Phase::Night,
                    round: 1,
                },
                Notification::Inspection {
                    stage: NightStage::Seer,
                    target: Uuid::new_v4(),
                    is_werewolf: false,
                },
                Notification::GameEnded {
                    message: outcome.message(),
                    outcome,
                },
            ],
        );
        assert_eq!(recorder.phases, vec![(Phase::Night, 1)]);
        assert_eq!(
            recorder.ended.as_deref(),
            Some("Villagers win! All werewolves have been eliminated.")
        );
    }
}
