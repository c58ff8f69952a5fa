use database::SavedConfig;
use types::{HouseRules, RoleCounts, RoleId, RolePreset, RosterEntry, ValidationError};

use crate::session::Command;

pub const MIN_PLAYERS: usize = 4;
pub const MAX_PLAYERS: usize = 24;
pub const DEFAULT_PLAYER_COUNT: usize = 8;

/// Werewolves must stay strictly below half the table, rounded up.
pub fn max_werewolves(player_count: usize) -> usize {
    player_count.div_ceil(2).saturating_sub(1)
}

pub fn validate(player_count: usize, role_counts: &RoleCounts) -> Result<(), ValidationError> {
    let total = role_counts.total();
    if total != player_count {
        return Err(ValidationError::CountMismatch {
            total,
            player_count,
        });
    }
    if total < MIN_PLAYERS {
        return Err(ValidationError::TooFewPlayers {
            player_count,
            min: MIN_PLAYERS,
        });
    }
    let werewolves = role_counts.werewolves();
    if werewolves == 0 {
        return Err(ValidationError::NoWerewolves);
    }
    let max = max_werewolves(player_count);
    if werewolves > max {
        return Err(ValidationError::TooManyWerewolves { werewolves, max });
    }
    if let Some(entry) = role_counts
        .iter()
        .find(|entry| entry.role.is_unique() && entry.count > 1)
    {
        return Err(ValidationError::DuplicateUniqueRole {
            role: entry.role,
            count: entry.count,
        });
    }
    Ok(())
}

pub fn is_valid(player_count: usize, role_counts: &RoleCounts) -> bool {
    validate(player_count, role_counts).is_ok()
}

/// Deterministic starting point for a table of `player_count`. Special roles
/// are added in a fixed order while slots remain; the rest are villagers.
pub fn suggest_balanced_setup(player_count: usize, include_jester: bool) -> RoleCounts {
    let mut counts = RoleCounts::new();
    let werewolves = (player_count / 4).max(1);
    counts.set_count(RoleId::Werewolf, werewolves);
    let mut remaining = player_count.saturating_sub(werewolves);

    let specials = [
        (RoleId::Seer, player_count >= 6),
        (RoleId::Doctor, player_count >= 8),
        (RoleId::Mayor, player_count >= 9),
        (RoleId::Hunter, player_count >= 10),
        (RoleId::Jester, include_jester && player_count >= 7),
    ];
    for (role, wanted) in specials {
        if wanted && remaining > 0 {
            counts.set_count(role, 1);
            remaining -= 1;
        }
    }

    counts.set_count(RoleId::Villager, remaining);
    log::debug!("Suggested setup for {player_count} players: {counts}");
    counts
}

/// Pre-match configuration as edited at the setup screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetupDraft {
    player_count: usize,
    roster: Vec<RosterEntry>,
    role_counts: RoleCounts,
    selected_preset: Option<String>,
    include_jester: bool,
}

impl Default for SetupDraft {
    fn default() -> Self {
        Self {
            player_count: DEFAULT_PLAYER_COUNT,
            roster: vec![RosterEntry::default(); DEFAULT_PLAYER_COUNT],
            role_counts: RoleCounts::new(),
            selected_preset: None,
            include_jester: false,
        }
    }
}

impl SetupDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// The table size and roles a previous match started with. Names are
    /// not part of a saved configuration, so every slot starts empty.
    pub fn from_saved_config(config: &SavedConfig) -> Self {
        let mut draft = Self::new();
        draft.set_player_count(config.players_count);
        draft.role_counts = config.role_selection.clone();
        draft.selected_preset = config.preset_id.clone();
        draft.include_jester = draft.role_counts.get(RoleId::Jester) > 0;
        draft
    }

    pub fn player_count(&self) -> usize {
        self.player_count
    }

    pub fn roster(&self) -> &[RosterEntry] {
        &self.roster
    }

    pub fn role_counts(&self) -> &RoleCounts {
        &self.role_counts
    }

    pub fn selected_preset(&self) -> Option<&str> {
        self.selected_preset.as_deref()
    }

    pub fn include_jester(&self) -> bool {
        self.include_jester
    }

    pub fn set_include_jester(&mut self, include_jester: bool) {
        self.include_jester = include_jester;
    }

    /// Resizes the roster along with the count, keeping existing names.
    pub fn set_player_count(&mut self, player_count: usize) {
        self.player_count = player_count;
        self.roster.resize(player_count, RosterEntry::default());
    }

    /// Ignored for a slot past the current player count.
    pub fn set_player_name(&mut self, slot: usize, name: impl Into<String>) {
        if let Some(entry) = self.roster.get_mut(slot) {
            entry.name = name.into();
        }
    }

    pub fn set_contact(&mut self, slot: usize, phone: Option<String>) {
        if let Some(entry) = self.roster.get_mut(slot) {
            entry.phone = phone;
        }
    }

    /// Fills slots from the front with `names`, growing the count if needed.
    pub fn fill_names<S: AsRef<str>>(&mut self, names: &[S]) {
        if names.len() > self.player_count {
            self.set_player_count(names.len());
        }
        for (slot, name) in names.iter().enumerate() {
            self.set_player_name(slot, name.as_ref());
        }
    }

    pub fn select_preset(&mut self, preset: &RolePreset) {
        self.selected_preset = Some(preset.id.clone());
        self.set_player_count(preset.min_players);
        self.role_counts = preset.role_counts.clone();
        self.include_jester = preset.has_jester();
    }

    pub fn update_role_count(&mut self, role: RoleId, count: usize) {
        self.role_counts.set_count(role, count);
        self.include_jester = self.role_counts.get(RoleId::Jester) > 0;
    }

    /// Unique roles flip between 0 and 1; others gain one.
    pub fn toggle_role(&mut self, role: RoleId) {
        if role.is_unique() {
            self.role_counts.toggle(role);
        } else {
            self.role_counts.adjust(role, 1);
        }
        self.include_jester = self.role_counts.get(RoleId::Jester) > 0;
    }

    pub fn suggest_balanced(&mut self) {
        self.role_counts = suggest_balanced_setup(self.player_count, self.include_jester);
    }

    pub fn total_selected(&self) -> usize {
        self.role_counts.total()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate(self.player_count, &self.role_counts)
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn start_command(&self, rules: HouseRules) -> Command {
        Command::Start {
            player_count: self.player_count,
            role_counts: self.role_counts.clone(),
            roster: self.roster.clone(),
            rules,
        }
    }
}

#[cfg(test)]
mod tests {
    use types::builtin_presets;

    use super::*;

    fn counts(entries: &[(RoleId, usize)]) -> RoleCounts {
        entries.iter().copied().collect()
    }

    #[test]
    fn eight_player_classic_is_valid_until_a_villager_is_removed() {
        let mut setup = counts(&[
            (RoleId::Werewolf, 2),
            (RoleId::Villager, 4),
            (RoleId::Seer, 1),
            (RoleId::Doctor, 1),
        ]);
        assert!(is_valid(8, &setup));

        setup.set_count(RoleId::Villager, 3);
        assert!(!is_valid(8, &setup));
        assert_eq!(
            validate(8, &setup),
            Err(ValidationError::CountMismatch {
                total: 7,
                player_count: 8
            })
        );
    }

    #[test]
    fn werewolves_must_stay_below_half() {
        assert_eq!(max_werewolves(4), 1);
        assert_eq!(max_werewolves(5), 2);
        assert_eq!(max_werewolves(8), 3);

        let too_many = counts(&[(RoleId::Werewolf, 2), (RoleId::Villager, 2)]);
        assert_eq!(
            validate(4, &too_many),
            Err(ValidationError::TooManyWerewolves {
                werewolves: 2,
                max: 1
            })
        );
        let none = counts(&[(RoleId::Villager, 4)]);
        assert_eq!(validate(4, &none), Err(ValidationError::NoWerewolves));
    }

    #[test]
    fn small_tables_and_duplicate_unique_roles_are_rejected() {
        let small = counts(&[(RoleId::Werewolf, 1), (RoleId::Villager, 2)]);
        assert!(matches!(
            validate(3, &small),
            Err(ValidationError::TooFewPlayers { .. })
        ));

        let two_seers = counts(&[
            (RoleId::Werewolf, 1),
            (RoleId::Villager, 3),
            (RoleId::Seer, 2),
        ]);
        assert_eq!(
            validate(6, &two_seers),
            Err(ValidationError::DuplicateUniqueRole {
                role: RoleId::Seer,
                count: 2
            })
        );
    }

    #[test]
    fn balanced_setups_are_valid_for_every_table_size() {
        for player_count in MIN_PLAYERS..=MAX_PLAYERS {
            for include_jester in [false, true] {
                let setup = suggest_balanced_setup(player_count, include_jester);
                assert_eq!(setup.total(), player_count);
                assert!(
                    is_valid(player_count, &setup),
                    "{player_count} players, jester {include_jester}: {setup}"
                );
            }
        }
    }

    #[test]
    fn balanced_ten_has_every_special_in_order() {
        let setup = suggest_balanced_setup(10, true);
        assert_eq!(setup.werewolves(), 2);
        for role in [
            RoleId::Seer,
            RoleId::Doctor,
            RoleId::Mayor,
            RoleId::Hunter,
            RoleId::Jester,
        ] {
            assert_eq!(setup.get(role), 1, "{role}");
        }
        assert_eq!(setup.get(RoleId::Villager), 3);
    }

    #[test]
    fn villagers_never_go_negative() {
        let setup = suggest_balanced_setup(1, true);
        assert_eq!(setup.get(RoleId::Villager), 0);
        assert_eq!(setup.total(), 1);
        assert!(suggest_balanced_setup(0, false).get(RoleId::Villager) == 0);
    }

    #[test]
    fn selecting_a_preset_resizes_roster_and_syncs_jester() {
        let mut draft = SetupDraft::new();
        draft.set_player_name(0, "Alice");
        let advanced = builtin_presets()
            .into_iter()
            .find(|p| p.id == "advanced_10")
            .unwrap();
        draft.select_preset(&advanced);

        assert_eq!(draft.player_count(), 10);
        assert_eq!(draft.roster().len(), 10);
        assert_eq!(draft.roster()[0].name, "Alice");
        assert!(draft.include_jester());
        assert!(draft.is_valid());

        draft.update_role_count(RoleId::Jester, 0);
        assert!(!draft.include_jester());
        assert_eq!(draft.role_counts().get(RoleId::Jester), 0);
    }

    #[test]
    fn saved_config_restores_table_and_roles() {
        let roles = counts(&[
            (RoleId::Werewolf, 2),
            (RoleId::Seer, 1),
            (RoleId::Jester, 1),
            (RoleId::Villager, 5),
        ]);
        let config = SavedConfig {
            id: uuid::Uuid::new_v4(),
            date: chrono::Utc::now(),
            players_count: 9,
            role_selection: roles.clone(),
            preset_id: None,
        };

        let draft = SetupDraft::from_saved_config(&config);
        assert_eq!(draft.player_count(), 9);
        assert_eq!(draft.roster().len(), 9);
        assert!(draft.roster().iter().all(|entry| entry.name.is_empty()));
        assert_eq!(draft.role_counts(), &roles);
        assert_eq!(draft.total_selected(), 9);
        assert!(draft.include_jester());
        assert_eq!(draft.selected_preset(), None);
        assert!(draft.is_valid());
    }

    #[test]
    fn toggling_unique_roles_caps_them_at_one() {
        let mut draft = SetupDraft::new();
        draft.toggle_role(RoleId::Medium);
        assert_eq!(draft.role_counts().get(RoleId::Medium), 1);
        draft.toggle_role(RoleId::Medium);
        assert_eq!(draft.role_counts().get(RoleId::Medium), 0);

        draft.toggle_role(RoleId::Villager);
        draft.toggle_role(RoleId::Villager);
        assert_eq!(draft.role_counts().get(RoleId::Villager), 2);
    }

    #[test]
    fn shrinking_the_table_truncates_the_roster() {
        let mut draft = SetupDraft::new();
        draft.fill_names(&["A", "B", "C", "D", "E", "F", "G", "H", "I"]);
        assert_eq!(draft.player_count(), 9);
        draft.set_player_count(5);
        assert_eq!(draft.roster().len(), 5);
        assert_eq!(draft.roster()[4].name, "E");
    }
}
