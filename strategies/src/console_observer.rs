use std::collections::HashMap;

use itertools::Itertools;
use types::{MatchObserver, NightStage, Outcome, Phase, PublicPlayerState};
use uuid::Uuid;

/// Prints match notifications for the moderator.
#[derive(Debug, Default)]
pub struct ConsoleObserver {
    names: HashMap<Uuid, String>,
}

impl ConsoleObserver {
    fn remember(&mut self, players: &[PublicPlayerState]) {
        for player in players {
            self.names.insert(player.id, player.name.clone());
        }
    }

    fn name(&self, id: Uuid) -> &str {
        self.names.get(&id).map(String::as_str).unwrap_or("someone")
    }
}

fn list(players: &[PublicPlayerState]) -> String {
    if players.is_empty() {
        return "nobody".to_string();
    }
    players.iter().map(|p| p.name.as_str()).join(", ")
}

impl MatchObserver for ConsoleObserver {
    fn on_phase_changed(&mut self, phase: Phase, round: u32) {
        match phase {
            Phase::Night => println!("\n*** Night {round} falls ***"),
            Phase::Day => println!("\n*** Day {round} dawns ***"),
            _ => println!("\n*** {phase} ***"),
        }
    }

    fn on_night_stage_ready(&mut self, stage: NightStage, eligible: &[PublicPlayerState]) {
        self.remember(eligible);
        println!("{stage} wakes up. Choices: {}", list(eligible));
    }

    fn on_hunter_revenge_pending(&mut self, hunter: Uuid, eligible: &[PublicPlayerState]) {
        self.remember(eligible);
        println!(
            "The hunter {} takes revenge. Choices: {}",
            self.name(hunter),
            list(eligible)
        );
    }

    fn on_day_vote_ready(&mut self, eligible: &[PublicPlayerState], can_skip: bool) {
        self.remember(eligible);
        let skip = if can_skip { " (or skip)" } else { "" };
        println!("The village votes. Choices: {}{skip}", list(eligible));
    }

    fn on_inspection(&mut self, stage: NightStage, target: Uuid, is_werewolf: bool) {
        let verdict = if is_werewolf { "IS" } else { "is not" };
        println!("{stage}: {} {verdict} a werewolf", self.name(target));
    }

    fn on_game_ended(&mut self, _outcome: &Outcome, message: &str) {
        println!("\n{message}");
    }
}
