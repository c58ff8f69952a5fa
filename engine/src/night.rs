use types::{
    EliminationMethod, EventKind, GameEvent, NightStage, Notification, PublicPlayerState, RoleId,
    StateError, StepKind,
};
use uuid::Uuid;

use crate::MatchSession;

impl MatchSession {
    /// A stage runs only while a living player holds its role. The medium
    /// additionally needs someone to commune with.
    pub fn stage_applies(&self, stage: NightStage) -> bool {
        let has_holder = self.living_with_role(stage.role()).next().is_some();
        match stage {
            NightStage::Medium => has_holder && !self.eliminated.is_empty(),
            _ => has_holder,
        }
    }

    pub fn applicable_stages(&self) -> Vec<NightStage> {
        NightStage::ORDER
            .into_iter()
            .filter(|stage| self.stage_applies(*stage))
            .collect()
    }

    pub(crate) fn next_stage_after(&self, current: Option<NightStage>) -> Option<NightStage> {
        NightStage::ORDER
            .into_iter()
            .skip_while(|stage| current.is_some_and(|current| *stage <= current))
            .find(|stage| self.stage_applies(*stage))
    }

    pub fn stage_actors(&self, stage: NightStage) -> Vec<Uuid> {
        self.living_with_role(stage.role()).map(|p| p.id).collect()
    }

    pub fn stage_targets(&self, stage: NightStage) -> Vec<PublicPlayerState> {
        match stage {
            NightStage::Werewolf => self
                .living()
                .filter(|p| !p.role.is_werewolf())
                .map(|p| p.public_state())
                .collect(),
            NightStage::Seer => self
                .living()
                .filter(|p| p.role != RoleId::Seer)
                .map(|p| p.public_state())
                .collect(),
            NightStage::Doctor => self.doctor_targets(),
            NightStage::Medium => self
                .players
                .iter()
                .filter(|p| !p.alive)
                .map(|p| p.public_state())
                .collect(),
        }
    }

    pub fn doctor_targets(&self) -> Vec<PublicPlayerState> {
        let doctor = self.living_with_role(RoleId::Doctor).next().map(|p| p.id);
        let self_save_allowed = self.rules.doctor_can_save_himself && !self.doctor_self_save_used;
        let repeat_allowed = self.rules.doctor_can_save_same_person_twice;
        self.living()
            .filter(|p| self_save_allowed || Some(p.id) != doctor)
            .filter(|p| repeat_allowed || Some(p.id) != self.last_doctor_protection)
            .map(|p| p.public_state())
            .collect()
    }

    pub fn stage_can_skip(&self, stage: NightStage) -> bool {
        let skippable = stage == NightStage::Werewolf && self.rules.allow_skip_werewolf_kill;
        skippable || self.stage_targets(stage).is_empty()
    }

    /// Answers the open night stage. `None` skips it; the skip must be
    /// allowed for the stage unless `forced`, as a phase timer is. Moves on
    /// to the next applicable stage, or resolves the night after the last.
    pub(crate) fn finish_stage(
        &mut self,
        stage: NightStage,
        target: Option<Uuid>,
        forced: bool,
    ) -> Result<Vec<Notification>, StateError> {
        match self.night_stage {
            Some(open) if open == stage => {}
            Some(open) => {
                return Err(StateError::OutOfStage {
                    step: StepKind::Night(open),
                    action: format!("{stage} action"),
                })
            }
            None => return Err(StateError::NoPendingStep),
        }
        match target {
            Some(target) => {
                self.require_player(target)?;
                if !self.stage_targets(stage).iter().any(|p| p.id == target) {
                    return Err(StateError::IneligibleTarget { target });
                }
            }
            None if !forced && !self.stage_can_skip(stage) => {
                return Err(StateError::SkipNotAllowed {
                    step: StepKind::Night(stage),
                })
            }
            None => log::info!("{stage} stage skipped"),
        }

        let mut notifications = Vec::new();
        if let Some(target) = target {
            notifications.extend(self.perform_stage(stage, target));
        }

        self.night_stage = self.next_stage_after(Some(stage));
        match self.night_stage {
            Some(next) => notifications.push(self.stage_ready(next)),
            None => self.resolve_night(),
        }
        Ok(notifications)
    }

    pub(crate) fn stage_ready(&self, stage: NightStage) -> Notification {
        Notification::NightStageReady {
            stage,
            eligible: self.stage_targets(stage),
        }
    }

    fn perform_stage(&mut self, stage: NightStage, target: Uuid) -> Option<Notification> {
        let actor = self.stage_actors(stage).first().copied();
        let (target_name, target_role) = match self.get_player(target) {
            Some(player) => (player.display_name.clone(), player.role),
            None => return None,
        };
        match stage {
            NightStage::Werewolf => {
                log::info!("Werewolves target {target_name}");
                self.werewolf_target = Some(target);
                self.push_event(
                    GameEvent::new(
                        EventKind::WerewolfTarget,
                        format!("Werewolves chose {target_name}"),
                    )
                    .target(target),
                );
                None
            }
            NightStage::Seer => {
                log::info!("Seer inspects {target_name}");
                Some(Notification::Inspection {
                    stage,
                    target,
                    is_werewolf: target_role.is_werewolf(),
                })
            }
            NightStage::Doctor => {
                if actor == Some(target) {
                    self.doctor_self_save_used = true;
                }
                log::info!("Doctor protects {target_name}");
                self.doctor_protection = Some(target);
                self.last_doctor_protection = Some(target);
                let mut event = GameEvent::new(
                    EventKind::DoctorProtection,
                    format!("Doctor protected {target_name}"),
                )
                .target(target);
                if let Some(actor) = actor {
                    event = event.actor(actor);
                }
                self.push_event(event);
                None
            }
            NightStage::Medium => {
                let is_werewolf = target_role.is_werewolf();
                let verdict = if is_werewolf { "was" } else { "was not" };
                let mut event = GameEvent::new(
                    EventKind::MediumCheck,
                    format!("Medium learned {target_name} {verdict} a werewolf"),
                )
                .target(target);
                if let Some(actor) = actor {
                    event = event.actor(actor);
                }
                self.push_event(event);
                Some(Notification::Inspection {
                    stage,
                    target,
                    is_werewolf,
                })
            }
        }
    }

    /// Applies the werewolf attack unless the doctor covered the same
    /// player, then clears this night's choices. The last protection is kept
    /// for the next night's repeat rule.
    pub(crate) fn resolve_night(&mut self) {
        if let Some(target) = self.werewolf_target {
            if self.doctor_protection == Some(target) {
                let name = self
                    .get_player(target)
                    .map(|p| p.display_name.clone())
                    .unwrap_or_default();
                log::info!("{name} was saved by the doctor");
                self.push_event(
                    GameEvent::new(EventKind::PlayerSaved, format!("{name} was saved"))
                        .target(target),
                );
            } else if let Err(e) = self.eliminate(target, EliminationMethod::Werewolf) {
                log::error!("Night attack on {target} could not be applied: {e}");
            }
        }
        self.werewolf_target = None;
        self.doctor_protection = None;
        self.night_stage = None;
    }
}

#[cfg(test)]
mod tests {
    use types::HouseRules;

    use super::*;
    use crate::match_session::tests::{id_of, session_with};

    fn table(rules: HouseRules) -> MatchSession {
        let mut session = session_with(
            &[
                ("Wolf", RoleId::Werewolf),
                ("Wolfie", RoleId::Werewolf),
                ("Seer", RoleId::Seer),
                ("Doc", RoleId::Doctor),
                ("Medium", RoleId::Medium),
                ("Vera", RoleId::Villager),
                ("Vic", RoleId::Villager),
                ("Val", RoleId::Villager),
            ],
            rules,
        );
        session.night_stage = session.next_stage_after(None);
        session
    }

    #[test]
    fn medium_waits_for_the_first_death() {
        let mut session = table(HouseRules::default());
        assert_eq!(
            session.applicable_stages(),
            vec![NightStage::Werewolf, NightStage::Seer, NightStage::Doctor]
        );
        let val = id_of(&session, "Val");
        session.eliminate(val, EliminationMethod::Vote).unwrap();
        assert!(session.stage_applies(NightStage::Medium));
        assert_eq!(session.stage_targets(NightStage::Medium).len(), 1);
    }

    #[test]
    fn werewolves_cannot_target_their_own() {
        let mut session = table(HouseRules::default());
        let wolfie = id_of(&session, "Wolfie");
        assert_eq!(
            session.finish_stage(NightStage::Werewolf, Some(wolfie), false),
            Err(StateError::IneligibleTarget { target: wolfie })
        );
        assert_eq!(session.werewolf_target(), None);
        assert_eq!(
            session.finish_stage(NightStage::Werewolf, None, false),
            Err(StateError::SkipNotAllowed {
                step: StepKind::Night(NightStage::Werewolf)
            })
        );
    }

    #[test]
    fn stages_must_be_answered_in_order() {
        let mut session = table(HouseRules::default());
        let vera = id_of(&session, "Vera");
        assert!(matches!(
            session.finish_stage(NightStage::Doctor, Some(vera), false),
            Err(StateError::OutOfStage { .. })
        ));
        assert_eq!(session.doctor_protection(), None);
    }

    #[test]
    fn protected_target_survives_and_protection_is_remembered() {
        let mut session = table(HouseRules::default());
        let vera = id_of(&session, "Vera");
        let seer = id_of(&session, "Seer");
        session.finish_stage(NightStage::Werewolf, Some(vera), false).unwrap();
        let seen = session.finish_stage(NightStage::Seer, Some(seer), false);
        assert!(seen.is_err());
        let seen = session
            .finish_stage(NightStage::Seer, Some(id_of(&session, "Wolf")), false)
            .unwrap();
        assert!(matches!(
            seen.first(),
            Some(Notification::Inspection {
                is_werewolf: true,
                ..
            })
        ));
        session.finish_stage(NightStage::Doctor, Some(vera), false).unwrap();

        assert!(session.get_player(vera).unwrap().alive);
        assert_eq!(session.history().last().unwrap().kind, EventKind::PlayerSaved);
        assert_eq!(session.werewolf_target(), None);
        assert_eq!(session.doctor_protection(), None);
        assert_eq!(session.last_doctor_protection(), Some(vera));
        assert_eq!(session.night_stage(), None);
    }

    #[test]
    fn unprotected_target_dies_at_resolution() {
        let mut session = table(HouseRules::default());
        let vera = id_of(&session, "Vera");
        let vic = id_of(&session, "Vic");
        session.finish_stage(NightStage::Werewolf, Some(vera), false).unwrap();
        session.finish_stage(NightStage::Seer, Some(vic), false).unwrap();
        assert!(session.get_player(vera).unwrap().alive);
        session.finish_stage(NightStage::Doctor, Some(vic), false).unwrap();

        assert!(!session.get_player(vera).unwrap().alive);
        assert_eq!(session.eliminated(), &[vera]);
        let last = session.history().last().unwrap();
        assert_eq!(last.kind, EventKind::PlayerEliminated);
        assert_eq!(last.method, Some(EliminationMethod::Werewolf));
    }

    #[test]
    fn doctor_cannot_repeat_last_protection() {
        let mut session = table(HouseRules::default());
        let vera = id_of(&session, "Vera");
        session.last_doctor_protection = Some(vera);
        let doc = id_of(&session, "Doc");
        let targets = session.doctor_targets();
        assert!(targets.iter().all(|p| p.id != vera && p.id != doc));

        let relaxed = table(HouseRules {
            doctor_can_save_same_person_twice: true,
            ..HouseRules::default()
        });
        assert_eq!(relaxed.doctor_targets().len(), 7);
    }

    #[test]
    fn doctor_self_save_is_spent_once() {
        let rules = HouseRules {
            doctor_can_save_himself: true,
            doctor_can_save_same_person_twice: true,
            ..HouseRules::default()
        };
        let mut session = table(rules);
        let doc = id_of(&session, "Doc");
        let vera = id_of(&session, "Vera");
        assert!(session.doctor_targets().iter().any(|p| p.id == doc));

        session.finish_stage(NightStage::Werewolf, Some(vera), false).unwrap();
        session.finish_stage(NightStage::Seer, Some(vera), false).unwrap();
        session.finish_stage(NightStage::Doctor, Some(doc), false).unwrap();
        assert!(session.doctor_self_save_used());

        session.night_stage = Some(NightStage::Doctor);
        assert_eq!(
            session.finish_stage(NightStage::Doctor, Some(doc), false),
            Err(StateError::IneligibleTarget { target: doc })
        );
        assert!(session.doctor_self_save_used());
    }

    #[test]
    fn medium_check_records_an_event() {
        let mut session = table(HouseRules {
            allow_skip_werewolf_kill: true,
            ..HouseRules::default()
        });
        let wolfie = id_of(&session, "Wolfie");
        session.eliminate(wolfie, EliminationMethod::Vote).unwrap();
        session.night_stage = Some(NightStage::Medium);

        let notes = session
            .finish_stage(NightStage::Medium, Some(wolfie), false)
            .unwrap();
        assert_eq!(
            notes,
            vec![Notification::Inspection {
                stage: NightStage::Medium,
                target: wolfie,
                is_werewolf: true
            }]
        );
        assert_eq!(session.history().last().unwrap().kind, EventKind::MediumCheck);
    }

    #[test]
    fn skipping_the_kill_when_allowed_kills_nobody() {
        let mut session = table(HouseRules {
            allow_skip_werewolf_kill: true,
            ..HouseRules::default()
        });
        let vera = id_of(&session, "Vera");
        session.finish_stage(NightStage::Werewolf, None, false).unwrap();
        assert_eq!(
            session.finish_stage(NightStage::Seer, None, false),
            Err(StateError::SkipNotAllowed {
                step: StepKind::Night(NightStage::Seer)
            })
        );
        session.finish_stage(NightStage::Seer, Some(vera), false).unwrap();
        session.finish_stage(NightStage::Doctor, Some(vera), false).unwrap();
        assert!(session.eliminated().is_empty());
        assert!(session
            .history()
            .iter()
            .all(|e| e.kind != EventKind::PlayerSaved));
    }
}
