use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Villager,
    Werewolf,
    Neutral,
}

impl Display for Alignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Alignment::Villager => write!(f, "Villager"),
            Alignment::Werewolf => write!(f, "Werewolf"),
            Alignment::Neutral => write!(f, "Neutral"),
        }
    }
}

/// Stable identity of a role. Everything descriptive lives in
/// [`RoleDefinition`]; this enum is only a lookup key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleId {
    Werewolf,
    Villager,
    Seer,
    Doctor,
    Hunter,
    Jester,
    Medium,
    Mayor,
}

impl RoleId {
    pub const ALL: [RoleId; 8] = [
        RoleId::Werewolf,
        RoleId::Villager,
        RoleId::Seer,
        RoleId::Doctor,
        RoleId::Hunter,
        RoleId::Jester,
        RoleId::Medium,
        RoleId::Mayor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleId::Werewolf => "werewolf",
            RoleId::Villager => "villager",
            RoleId::Seer => "seer",
            RoleId::Doctor => "doctor",
            RoleId::Hunter => "hunter",
            RoleId::Jester => "jester",
            RoleId::Medium => "medium",
            RoleId::Mayor => "mayor",
        }
    }

    pub fn is_unique(&self) -> bool {
        !matches!(self, RoleId::Werewolf | RoleId::Villager)
    }

    pub fn is_werewolf(&self) -> bool {
        *self == RoleId::Werewolf
    }
}

impl Display for RoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RoleId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        RoleId::ALL
            .iter()
            .find(|role| role.as_str() == needle)
            .copied()
            .ok_or_else(|| format!("Unknown role: {s}"))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition {
    pub id: RoleId,
    pub name: String,
    pub alignment: Alignment,
    pub abilities: Vec<String>,
    pub is_unique: bool,
    pub min_players: usize,
    pub notes: String,
    pub emoji: String,
}

struct DefaultRole {
    name: &'static str,
    alignment: Alignment,
    abilities: &'static [&'static str],
    min_players: usize,
    notes: &'static str,
    emoji: &'static str,
}

fn default_role(id: RoleId) -> DefaultRole {
    match id {
        RoleId::Werewolf => DefaultRole {
            name: "Werewolf",
            alignment: Alignment::Werewolf,
            abilities: &["Kill at night"],
            min_players: 4,
            notes: "Choose a villager to kill each night",
            emoji: "\u{1F43A}",
        },
        RoleId::Villager => DefaultRole {
            name: "Villager",
            alignment: Alignment::Villager,
            abilities: &["Vote during day"],
            min_players: 1,
            notes: "Vote to eliminate suspected werewolves",
            emoji: "\u{1F468}\u{1F3FB}",
        },
        RoleId::Seer => DefaultRole {
            name: "Seer",
            alignment: Alignment::Villager,
            abilities: &["Check alignment at night"],
            min_players: 6,
            notes: "Learn if a player is a werewolf",
            emoji: "\u{1F52E}",
        },
        RoleId::Doctor => DefaultRole {
            name: "Doctor",
            alignment: Alignment::Villager,
            abilities: &["Protect at night"],
            min_players: 8,
            notes: "Save a player from werewolf attack",
            emoji: "\u{1F48A}",
        },
        RoleId::Hunter => DefaultRole {
            name: "Hunter",
            alignment: Alignment::Villager,
            abilities: &["Kill when eliminated"],
            min_players: 10,
            notes: "Take revenge when eliminated",
            emoji: "\u{1F3F9}",
        },
        RoleId::Jester => DefaultRole {
            name: "Jester",
            alignment: Alignment::Neutral,
            abilities: &["Win by being voted out"],
            min_players: 7,
            notes: "Wins the game by being voted out during the day phase",
            emoji: "\u{1F0CF}",
        },
        RoleId::Medium => DefaultRole {
            name: "Medium",
            alignment: Alignment::Villager,
            abilities: &["Check eliminated players at night"],
            min_players: 8,
            notes: "During night, check if an eliminated player was a werewolf or not",
            emoji: "\u{1F47B}",
        },
        RoleId::Mayor => DefaultRole {
            name: "Mayor",
            alignment: Alignment::Villager,
            abilities: &["Vote during day", "Village leadership"],
            min_players: 9,
            notes: "A respected village leader who votes during the day phase",
            emoji: "\u{1F3DB}\u{FE0F}",
        },
    }
}

impl RoleDefinition {
    pub fn default_for(id: RoleId) -> Self {
        let seed = default_role(id);
        Self {
            id,
            name: seed.name.to_string(),
            alignment: seed.alignment,
            abilities: seed.abilities.iter().map(|a| a.to_string()).collect(),
            is_unique: id.is_unique(),
            min_players: seed.min_players,
            notes: seed.notes.to_string(),
            emoji: seed.emoji.to_string(),
        }
    }
}

impl Display for RoleDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} ({})", self.emoji, self.name, self.alignment)
    }
}

/// The one canonical table of role definitions for a running app.
///
/// Always holds exactly one definition per [`RoleId`], stored in
/// [`RoleId::ALL`] order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoleCatalog {
    roles: Vec<RoleDefinition>,
}

impl Default for RoleCatalog {
    fn default() -> Self {
        Self {
            roles: RoleId::ALL
                .iter()
                .map(|&id| RoleDefinition::default_for(id))
                .collect(),
        }
    }
}

impl RoleCatalog {
    /// Builds a catalog from stored definitions. Roles absent from the input
    /// are filled in from the defaults; duplicates keep the first entry.
    pub fn from_definitions(definitions: Vec<RoleDefinition>) -> Self {
        let mut roles: Vec<RoleDefinition> = Vec::with_capacity(RoleId::ALL.len());
        for id in RoleId::ALL {
            let definition = definitions
                .iter()
                .find(|def| def.id == id)
                .cloned()
                .unwrap_or_else(|| {
                    log::warn!("Role {id} missing from stored catalog, using default");
                    RoleDefinition::default_for(id)
                });
            roles.push(definition);
        }
        Self { roles }
    }

    pub fn missing_from(definitions: &[RoleDefinition]) -> Vec<RoleId> {
        RoleId::ALL
            .iter()
            .filter(|id| !definitions.iter().any(|def| def.id == **id))
            .copied()
            .collect()
    }

    pub fn get(&self, id: RoleId) -> &RoleDefinition {
        &self.roles[id as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoleDefinition> {
        self.roles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_roles_match_defaults() {
        let unique: Vec<_> = RoleId::ALL.iter().filter(|r| r.is_unique()).collect();
        assert_eq!(unique.len(), 6);
        assert!(!RoleId::Villager.is_unique());
        assert!(!RoleId::Werewolf.is_unique());
    }

    #[test]
    fn jester_is_neutral_and_others_follow_their_side() {
        let catalog = RoleCatalog::default();
        assert_eq!(catalog.get(RoleId::Jester).alignment, Alignment::Neutral);
        assert_eq!(catalog.get(RoleId::Werewolf).alignment, Alignment::Werewolf);
        assert_eq!(catalog.get(RoleId::Mayor).alignment, Alignment::Villager);
        assert_eq!(catalog.get(RoleId::Hunter).min_players, 10);
    }

    #[test]
    fn from_definitions_fills_missing_roles() {
        let mut seer = RoleDefinition::default_for(RoleId::Seer);
        seer.notes = "Custom".to_string();
        let catalog = RoleCatalog::from_definitions(vec![seer]);
        assert_eq!(catalog.get(RoleId::Seer).notes, "Custom");
        assert_eq!(catalog.iter().count(), RoleId::ALL.len());
        assert_eq!(
            RoleCatalog::missing_from(&[RoleDefinition::default_for(RoleId::Seer)]).len(),
            7
        );
    }

    #[test]
    fn parses_role_names() {
        assert_eq!(" Doctor ".parse::<RoleId>(), Ok(RoleId::Doctor));
        assert!("wizard".parse::<RoleId>().is_err());
    }
}
