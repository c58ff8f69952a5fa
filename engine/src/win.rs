use types::{EventKind, Notification, Outcome, Phase};

use crate::MatchSession;

impl MatchSession {
    /// First matching rule wins: a recorded jester win, then no wolves left,
    /// then wolves at least matching everyone else. Always undecided while a
    /// hunter revenge is pending.
    pub fn evaluate_win(&self) -> Option<Outcome> {
        if self.pending_hunter_revenge.is_some() {
            return None;
        }

        let jester_win = self
            .history
            .iter()
            .find(|event| event.kind == EventKind::JesterWin);
        if let Some(event) = jester_win {
            let jester = event.actor.or(event.target);
            let player = jester.and_then(|id| self.get_player(id));
            if let Some(player) = player {
                return Some(Outcome::JesterWins {
                    jester: player.id,
                    name: player.display_name.clone(),
                });
            }
        }

        let werewolves = self.living_werewolves();
        if werewolves == 0 {
            return Some(Outcome::VillagersWin);
        }
        if werewolves >= self.living_non_werewolves() {
            return Some(Outcome::WerewolvesWin);
        }
        None
    }

    /// Ends the match if the evaluator has a decision.
    pub(crate) fn conclude_if_decided(&mut self) -> Option<Notification> {
        if self.phase == Phase::Ended {
            return None;
        }
        let outcome = self.evaluate_win()?;
        let message = outcome.message();
        log::info!("{message}");
        self.phase = Phase::Ended;
        self.night_stage = None;
        self.outcome = Some(outcome.clone());
        Some(Notification::GameEnded { outcome, message })
    }
}

#[cfg(test)]
mod tests {
    use types::{EliminationMethod, HouseRules, RoleId};

    use super::*;
    use crate::match_session::tests::{id_of, session_with};

    #[test]
    fn last_wolf_voted_out_ends_with_villagers() {
        let mut session = session_with(
            &[
                ("Wolf", RoleId::Werewolf),
                ("Vera", RoleId::Villager),
                ("Vic", RoleId::Villager),
                ("Val", RoleId::Villager),
            ],
            HouseRules::default(),
        );
        assert_eq!(session.evaluate_win(), None);
        session
            .eliminate(id_of(&session, "Wolf"), EliminationMethod::Vote)
            .unwrap();

        let ended = session.conclude_if_decided();
        assert!(matches!(
            ended,
            Some(Notification::GameEnded {
                outcome: Outcome::VillagersWin,
                ..
            })
        ));
        assert_eq!(session.phase(), Phase::Ended);
        assert_eq!(session.conclude_if_decided(), None);
    }

    #[test]
    fn parity_hands_the_match_to_the_wolves() {
        let mut session = session_with(
            &[
                ("Wolf", RoleId::Werewolf),
                ("Jester", RoleId::Jester),
                ("Vera", RoleId::Villager),
            ],
            HouseRules::default(),
        );
        assert_eq!(session.evaluate_win(), None);
        session
            .eliminate(id_of(&session, "Vera"), EliminationMethod::Werewolf)
            .unwrap();
        assert_eq!(session.evaluate_win(), Some(Outcome::WerewolvesWin));
        assert_eq!(
            Outcome::WerewolvesWin.message(),
            "Werewolves win! They outnumber the remaining players."
        );
    }
}
