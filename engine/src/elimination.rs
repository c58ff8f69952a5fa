use types::{EliminationMethod, EventKind, GameEvent, PublicPlayerState, RoleId, StateError};
use uuid::Uuid;

use crate::MatchSession;

impl MatchSession {
    /// Marks a player dead and applies the role side effects.
    ///
    /// Returns `Ok(false)` without touching anything if the player was
    /// already eliminated. A hunter not killed by another hunter becomes the
    /// pending revenge; a jester voted out records the jester win.
    pub(crate) fn eliminate(
        &mut self,
        id: Uuid,
        method: EliminationMethod,
    ) -> Result<bool, StateError> {
        let (name, role) = {
            let player = self.require_player(id)?;
            (player.display_name.clone(), player.role)
        };
        if self.eliminated.contains(&id) {
            log::debug!("{name} is already eliminated");
            return Ok(false);
        }

        if let Some(player) = self.get_player_mut(id) {
            player.alive = false;
        }
        self.eliminated.push(id);
        log::info!("{name} eliminated by {method}");
        self.push_event(
            GameEvent::new(
                EventKind::PlayerEliminated,
                format!("{name} was eliminated ({method})"),
            )
            .target(id)
            .method(method),
        );

        if role == RoleId::Hunter && method != EliminationMethod::Hunter {
            log::info!("Hunter {name} may take revenge");
            self.pending_hunter_revenge = Some(id);
        }

        if role == RoleId::Jester && method == EliminationMethod::Vote {
            self.push_event(
                GameEvent::new(EventKind::JesterWin, format!("The Jester {name} was voted out"))
                    .actor(id),
            );
        }
        Ok(true)
    }

    /// Revenge can hit any living player.
    pub fn hunter_targets(&self) -> Vec<PublicPlayerState> {
        if self.pending_hunter_revenge.is_none() {
            return Vec::new();
        }
        self.living().map(|p| p.public_state()).collect()
    }

    pub fn can_skip_hunter_revenge(&self) -> bool {
        self.rules.allow_skip_hunter_revenge || self.hunter_targets().is_empty()
    }

    pub(crate) fn execute_hunter_revenge(
        &mut self,
        hunter: Uuid,
        target: Uuid,
    ) -> Result<(), StateError> {
        let pending = self
            .pending_hunter_revenge
            .ok_or(StateError::NoPendingRevenge)?;
        if pending != hunter {
            return Err(StateError::WrongHunter {
                expected: pending,
                actual: hunter,
            });
        }
        let target_name = self.require_player(target)?.display_name.clone();
        if !self.hunter_targets().iter().any(|p| p.id == target) {
            return Err(StateError::IneligibleTarget { target });
        }
        let hunter_name = self.require_player(hunter)?.display_name.clone();

        self.hunter_target = Some(target);
        self.eliminate(target, EliminationMethod::Hunter)?;
        self.pending_hunter_revenge = None;
        self.push_event(
            GameEvent::new(
                EventKind::HunterRevenge,
                format!("Hunter {hunter_name} took revenge on {target_name}"),
            )
            .actor(hunter)
            .target(target),
        );
        Ok(())
    }

    pub(crate) fn skip_hunter_revenge(&mut self) -> Result<(), StateError> {
        let pending = self
            .pending_hunter_revenge
            .ok_or(StateError::NoPendingRevenge)?;
        if !self.can_skip_hunter_revenge() {
            return Err(StateError::SkipNotAllowed {
                step: types::StepKind::HunterRevenge { hunter: pending },
            });
        }
        log::info!("Hunter revenge skipped");
        self.pending_hunter_revenge = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use types::{HouseRules, Outcome};

    use super::*;
    use crate::match_session::tests::{id_of, session_with};

    fn table() -> MatchSession {
        session_with(
            &[
                ("Wolf", RoleId::Werewolf),
                ("Hunter", RoleId::Hunter),
                ("Jester", RoleId::Jester),
                ("Vera", RoleId::Villager),
                ("Vic", RoleId::Villager),
            ],
            HouseRules::default(),
        )
    }

    #[test]
    fn eliminating_twice_changes_nothing_the_second_time() {
        let mut session = table();
        let vera = id_of(&session, "Vera");
        assert_eq!(session.eliminate(vera, EliminationMethod::Werewolf), Ok(true));
        let history = session.history().len();
        assert_eq!(session.eliminate(vera, EliminationMethod::Vote), Ok(false));
        assert_eq!(session.eliminated().len(), 1);
        assert_eq!(session.history().len(), history);
        assert!(!session.get_player(vera).unwrap().alive);
    }

    #[test]
    fn unknown_players_are_rejected() {
        let mut session = table();
        let stranger = Uuid::new_v4();
        assert_eq!(
            session.eliminate(stranger, EliminationMethod::Vote),
            Err(StateError::UnknownPlayer { player: stranger })
        );
    }

    #[test]
    fn hunter_killed_by_vote_suspends_the_win_check() {
        let mut session = table();
        let hunter = id_of(&session, "Hunter");
        session.eliminate(id_of(&session, "Vera"), EliminationMethod::Werewolf).unwrap();
        session.eliminate(id_of(&session, "Vic"), EliminationMethod::Werewolf).unwrap();
        session.eliminate(hunter, EliminationMethod::Vote).unwrap();

        assert_eq!(session.pending_hunter_revenge(), Some(hunter));
        assert_eq!(session.living_werewolves(), 1);
        assert_eq!(session.living_non_werewolves(), 1);
        assert_eq!(session.evaluate_win(), None);

        session.skip_hunter_revenge().unwrap_err();
        assert_eq!(session.pending_hunter_revenge(), Some(hunter));
    }

    #[test]
    fn revenge_eliminates_without_retriggering() {
        let mut session = table();
        let hunter = id_of(&session, "Hunter");
        let wolf = id_of(&session, "Wolf");
        session.eliminate(hunter, EliminationMethod::Werewolf).unwrap();

        let wrong = id_of(&session, "Vera");
        assert_eq!(
            session.execute_hunter_revenge(wrong, wolf),
            Err(StateError::WrongHunter {
                expected: hunter,
                actual: wrong
            })
        );
        assert_eq!(
            session.execute_hunter_revenge(hunter, hunter),
            Err(StateError::IneligibleTarget { target: hunter })
        );

        session.execute_hunter_revenge(hunter, wolf).unwrap();
        assert_eq!(session.pending_hunter_revenge(), None);
        assert_eq!(session.hunter_target(), Some(wolf));
        assert_eq!(session.history().last().unwrap().kind, EventKind::HunterRevenge);
        assert_eq!(session.evaluate_win(), Some(Outcome::VillagersWin));
    }

    #[test]
    fn jester_voted_out_wins_even_when_wolves_lead() {
        let mut session = table();
        let jester = id_of(&session, "Jester");
        session.eliminate(id_of(&session, "Vera"), EliminationMethod::Werewolf).unwrap();
        session.eliminate(id_of(&session, "Vic"), EliminationMethod::Werewolf).unwrap();
        session.eliminate(jester, EliminationMethod::Vote).unwrap();

        assert!(session
            .history()
            .iter()
            .any(|event| event.kind == EventKind::JesterWin));
        assert_eq!(
            session.evaluate_win(),
            Some(Outcome::JesterWins {
                jester,
                name: "Jester".to_string()
            })
        );
    }

    #[test]
    fn jester_killed_at_night_is_just_dead() {
        let mut session = table();
        session
            .eliminate(id_of(&session, "Jester"), EliminationMethod::Werewolf)
            .unwrap();
        assert!(session
            .history()
            .iter()
            .all(|event| event.kind != EventKind::JesterWin));
    }
}
