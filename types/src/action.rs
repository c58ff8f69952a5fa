use std::fmt::Display;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{NightStage, PublicPlayerState};

/// Moderator input. Each targeted variant belongs to exactly one kind of
/// step; `Skip` may answer any step that allows it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Attack { target: Uuid },
    Inspect { target: Uuid },
    Protect { target: Uuid },
    Commune { target: Uuid },
    Vote { target: Uuid },
    Revenge { target: Uuid },
    Skip,
}

impl Action {
    pub fn for_step(kind: &StepKind, target: Uuid) -> Self {
        match kind {
            StepKind::Night(NightStage::Werewolf) => Action::Attack { target },
            StepKind::Night(NightStage::Seer) => Action::Inspect { target },
            StepKind::Night(NightStage::Doctor) => Action::Protect { target },
            StepKind::Night(NightStage::Medium) => Action::Commune { target },
            StepKind::DayVote => Action::Vote { target },
            StepKind::HunterRevenge { .. } => Action::Revenge { target },
        }
    }

    pub fn target(&self) -> Option<Uuid> {
        match self {
            Action::Attack { target }
            | Action::Inspect { target }
            | Action::Protect { target }
            | Action::Commune { target }
            | Action::Vote { target }
            | Action::Revenge { target } => Some(*target),
            Action::Skip => None,
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            Action::Attack { .. } => "Attack",
            Action::Inspect { .. } => "Inspect",
            Action::Protect { .. } => "Protect",
            Action::Commune { .. } => "Commune with",
            Action::Vote { .. } => "Vote out",
            Action::Revenge { .. } => "Take revenge on",
            Action::Skip => "Skip",
        }
    }

    pub fn belongs_to(&self, kind: &StepKind) -> bool {
        match self.target() {
            Some(target) => Action::for_step(kind, target) == *self,
            None => true,
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.target() {
            Some(target) => write!(f, "{} {target}", self.verb()),
            None => write!(f, "{}", self.verb()),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepKind {
    Night(NightStage),
    DayVote,
    HunterRevenge { hunter: Uuid },
}

impl Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepKind::Night(stage) => write!(f, "{stage} night stage"),
            StepKind::DayVote => write!(f, "day vote"),
            StepKind::HunterRevenge { .. } => write!(f, "hunter revenge"),
        }
    }
}

/// The single input a match is currently waiting for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Increments whenever a step completes; commands answering an older id
    /// are ignored.
    pub id: u64,
    pub kind: StepKind,
    pub actors: Vec<Uuid>,
    pub eligible: Vec<PublicPlayerState>,
    pub can_skip: bool,
}

impl Step {
    pub fn permitted_actions(&self) -> Vec<Action> {
        let mut actions = self
            .eligible
            .iter()
            .map(|player| Action::for_step(&self.kind, player.id))
            .collect_vec();
        if self.can_skip {
            actions.push(Action::Skip);
        }
        actions
    }

    pub fn is_eligible(&self, target: Uuid) -> bool {
        self.eligible.iter().any(|player| player.id == target)
    }

    pub fn describe_action(&self, action: &Action) -> String {
        let name = action.target().and_then(|target| {
            self.eligible
                .iter()
                .find(|player| player.id == target)
                .map(|player| player.name.as_str())
        });
        match name {
            Some(name) => format!("{} {name}", action.verb()),
            None => action.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn public(name: &str) -> PublicPlayerState {
        PublicPlayerState {
            id: Uuid::new_v4(),
            name: name.to_string(),
            alive: true,
        }
    }

    #[test]
    fn permitted_actions_follow_step_kind() {
        let anna = public("Anna");
        let step = Step {
            id: 3,
            kind: StepKind::Night(NightStage::Doctor),
            actors: vec![],
            eligible: vec![anna.clone()],
            can_skip: false,
        };
        assert_eq!(
            step.permitted_actions(),
            vec![Action::Protect { target: anna.id }]
        );
        assert_eq!(step.describe_action(&Action::Protect { target: anna.id }), "Protect Anna");
    }

    #[test]
    fn skip_is_listed_last_when_allowed() {
        let step = Step {
            id: 0,
            kind: StepKind::DayVote,
            actors: vec![],
            eligible: vec![public("Bo"), public("Cy")],
            can_skip: true,
        };
        let actions = step.permitted_actions();
        assert_eq!(actions.len(), 3);
        assert_eq!(actions.last(), Some(&Action::Skip));
    }

    #[test]
    fn actions_know_their_step() {
        let target = Uuid::new_v4();
        let attack = Action::Attack { target };
        assert!(attack.belongs_to(&StepKind::Night(NightStage::Werewolf)));
        assert!(!attack.belongs_to(&StepKind::DayVote));
        assert!(Action::Skip.belongs_to(&StepKind::Night(NightStage::Seer)));
    }
}
