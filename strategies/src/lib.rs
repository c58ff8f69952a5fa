pub mod console_observer;
pub mod input_strategy;

use std::collections::VecDeque;

use rand::{rngs::ThreadRng, seq::SliceRandom};
use types::{Action, PublicInfo, Step, Strategy};

pub use crate::console_observer::ConsoleObserver;
pub use crate::input_strategy::InputStrategy;

#[derive(Debug, Default)]
pub struct RandomStrategy {
    rng: ThreadRng,
}

impl Strategy for RandomStrategy {
    fn select_action(
        &mut self,
        _step: &Step,
        _public_info: &PublicInfo,
        available_actions: &[Action],
    ) -> Action {
        available_actions
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(Action::Skip)
    }
}

/// Always picks the first eligible target, skipping only when nobody is
/// eligible. Deterministic for a given table order.
#[derive(Debug, Default)]
pub struct FirstTargetStrategy {}

impl Strategy for FirstTargetStrategy {
    fn select_action(
        &mut self,
        _step: &Step,
        _public_info: &PublicInfo,
        available_actions: &[Action],
    ) -> Action {
        available_actions
            .iter()
            .find(|action| action.target().is_some())
            .or_else(|| available_actions.first())
            .copied()
            .unwrap_or(Action::Skip)
    }
}

/// Replays a list of choices, one per step: a player name or `skip`.
///
/// A choice that is not permitted, or running out of choices, falls back to
/// the first permitted action.
#[derive(Debug, Default)]
pub struct ScriptedStrategy {
    choices: VecDeque<String>,
}

impl ScriptedStrategy {
    pub fn new<S: AsRef<str>>(choices: &[S]) -> Self {
        Self {
            choices: choices.iter().map(|c| c.as_ref().to_string()).collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.choices.len()
    }

    fn resolve(choice: &str, step: &Step, available_actions: &[Action]) -> Option<Action> {
        let action = if choice.eq_ignore_ascii_case("skip") {
            Action::Skip
        } else {
            let player = step
                .eligible
                .iter()
                .find(|player| player.name.eq_ignore_ascii_case(choice))?;
            Action::for_step(&step.kind, player.id)
        };
        available_actions.contains(&action).then_some(action)
    }
}

impl Strategy for ScriptedStrategy {
    fn select_action(
        &mut self,
        step: &Step,
        _public_info: &PublicInfo,
        available_actions: &[Action],
    ) -> Action {
        let fallback = available_actions.first().copied().unwrap_or(Action::Skip);
        let Some(choice) = self.choices.pop_front() else {
            log::warn!("Script exhausted at {}, taking {fallback}", step.kind);
            return fallback;
        };
        match Self::resolve(choice.trim(), step, available_actions) {
            Some(action) => action,
            None => {
                log::warn!("Scripted choice {choice:?} is not permitted at {}", step.kind);
                fallback
            }
        }
    }
}
