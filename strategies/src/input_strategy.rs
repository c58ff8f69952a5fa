use std::io::{self, Write};

use itertools::Itertools;
use regex::{Captures, Regex};
use types::{Action, PublicInfo, Step, Strategy};

/// Asks the moderator on stdin.
#[derive(Debug, Default)]
pub struct InputStrategy {}

impl Strategy for InputStrategy {
    fn select_action(
        &mut self,
        step: &Step,
        public_info: &PublicInfo,
        available_actions: &[Action],
    ) -> Action {
        print_public_info(public_info);
        let actors = step
            .actors
            .iter()
            .filter_map(|id| public_info.get_player_name(*id))
            .join(", ");
        println!("Waiting on: {} ({actors})", step.kind);
        println!(
            "Available actions: {}",
            available_actions
                .iter()
                .enumerate()
                .map(|(i, action)| format!("{}) {}", i + 1, step.describe_action(action)))
                .join(" || ")
        );

        // if only one available action, do it
        if available_actions.len() == 1 {
            let action = available_actions[0];
            log::info!("Only have one action available: {}", step.describe_action(&action));
            return action;
        }

        let mut buf = String::new();
        loop {
            match select_action_from_stdin(&mut buf, step, available_actions) {
                Ok(action) => return action,
                Err(err) => {
                    buf.clear();
                    log::error!("Error parsing message from stdin: {err}")
                }
            }
        }
    }
}

fn print_public_info(info: &PublicInfo) {
    println!("== {} {} ==", info.phase, info.round);
    for player in info.public_table.iter() {
        let status = if player.alive { "alive" } else { "eliminated" };
        println!("{} ({status})", player.name);
    }
}

fn select_action_from_stdin(
    buf: &mut String,
    step: &Step,
    actions: &[Action],
) -> Result<Action, String> {
    print!("Your choice? >> ");
    let _ = io::stdout().flush();
    match io::stdin().read_line(buf) {
        Ok(0) => {
            log::warn!("stdin is closed, taking the first action");
            actions
                .first()
                .copied()
                .ok_or_else(|| "No action available".to_string())
        }
        Ok(_) => select_action_from_str(buf, step, actions),
        Err(err) => {
            buf.clear();
            Err(format!("Error reading line from stdin: {err}"))
        }
    }
}

/// Accepts `skip`, the 1-based number of a listed action, or a player name.
pub fn select_action_from_str(
    input: &str,
    step: &Step,
    actions: &[Action],
) -> Result<Action, String> {
    let input = input.trim().to_lowercase();
    let input = input.as_str();

    if let Some(skip_result) = get_action_from_regex(
        input,
        step,
        actions,
        Regex::new(r"^skip$").expect("Valid skip regex"),
        skip_action_from_captures,
    ) {
        return skip_result;
    }

    if let Some(index_result) = get_action_from_regex(
        input,
        step,
        actions,
        Regex::new(r"^(?<index>\d+)$").expect("Valid index regex"),
        index_action_from_captures,
    ) {
        return index_result;
    }

    if let Some(name_result) = get_action_from_regex(
        input,
        step,
        actions,
        Regex::new(r"^(?<name>\S.*)$").expect("Valid name regex"),
        name_action_from_captures,
    ) {
        return name_result;
    }

    Err(format!(
        "Unable to parse a skip, action number or player name from string: {input:?}"
    ))
}

fn get_action_from_regex(
    input: &str,
    step: &Step,
    actions: &[Action],
    re: Regex,
    callback: for<'a, 'b, 'c, 'd> fn(
        &'a Captures<'b>,
        &'c Step,
        &'d [Action],
    ) -> Result<Action, String>,
) -> Option<Result<Action, String>> {
    let caps = re.captures(input)?;
    Some(callback(&caps, step, actions))
}

fn skip_action_from_captures(
    _caps: &Captures,
    _step: &Step,
    actions: &[Action],
) -> Result<Action, String> {
    if actions.contains(&Action::Skip) {
        Ok(Action::Skip)
    } else {
        Err("Attempted to skip a step that may not be skipped".to_string())
    }
}

fn index_action_from_captures(
    caps: &Captures,
    _step: &Step,
    actions: &[Action],
) -> Result<Action, String> {
    let index: usize = caps
        .name("index")
        .expect("Index regex always has index")
        .as_str()
        .parse()
        .map_err(|err| format!("Not a usable number: {err}"))?;
    index
        .checked_sub(1)
        .and_then(|i| actions.get(i))
        .copied()
        .ok_or_else(|| format!("No action numbered {index}, choose 1 to {}", actions.len()))
}

fn name_action_from_captures(
    caps: &Captures,
    step: &Step,
    actions: &[Action],
) -> Result<Action, String> {
    let name = caps.name("name").expect("Name regex always has name").as_str();
    log::debug!("Looking for a player named {name:?}");
    let player = step
        .eligible
        .iter()
        .find(|player| player.name.to_lowercase() == name)
        .ok_or_else(|| format!("No eligible player named {name:?}"))?;
    let action = Action::for_step(&step.kind, player.id);
    if actions.contains(&action) {
        Ok(action)
    } else {
        Err(format!("{} is not a permitted action", step.describe_action(&action)))
    }
}

#[cfg(test)]
mod tests {
    use types::{NightStage, PublicPlayerState, StepKind};
    use uuid::Uuid;

    use super::*;

    fn step(can_skip: bool) -> Step {
        Step {
            id: 4,
            kind: StepKind::Night(NightStage::Doctor),
            actors: vec![Uuid::new_v4()],
            eligible: ["Anna", "Bo Peep"]
                .iter()
                .map(|name| PublicPlayerState {
                    id: Uuid::new_v4(),
                    name: name.to_string(),
                    alive: true,
                })
                .collect(),
            can_skip,
        }
    }

    #[test]
    fn names_match_case_insensitively() {
        let step = step(false);
        let actions = step.permitted_actions();
        assert_eq!(
            select_action_from_str("bo peep\n", &step, &actions),
            Ok(Action::Protect {
                target: step.eligible[1].id
            })
        );
        assert!(select_action_from_str("Cleo", &step, &actions).is_err());
    }

    #[test]
    fn numbers_pick_from_the_listed_actions() {
        let step = step(true);
        let actions = step.permitted_actions();
        assert_eq!(select_action_from_str(" 1 ", &step, &actions), Ok(actions[0]));
        assert_eq!(select_action_from_str("3", &step, &actions), Ok(Action::Skip));
        assert!(select_action_from_str("0", &step, &actions).is_err());
        assert!(select_action_from_str("4", &step, &actions).is_err());
    }

    #[test]
    fn skip_needs_permission() {
        let strict = step(false);
        assert!(select_action_from_str("SKIP", &strict, &strict.permitted_actions()).is_err());
        let lenient = step(true);
        assert_eq!(
            select_action_from_str("skip", &lenient, &lenient.permitted_actions()),
            Ok(Action::Skip)
        );
    }

    #[test]
    fn blank_input_is_rejected() {
        let step = step(true);
        assert!(select_action_from_str("   \n", &step, &step.permitted_actions()).is_err());
    }
}
