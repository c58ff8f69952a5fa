use std::fmt::Display;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::RoleId;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCount {
    pub role: RoleId,
    pub count: usize,
}

/// Selected role counts for a setup, in insertion order.
///
/// Zero counts are never stored: any mutation that drops a count to zero
/// removes the entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleCounts(Vec<RoleCount>);

impl RoleCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, role: RoleId) -> usize {
        self.0
            .iter()
            .find(|entry| entry.role == role)
            .map_or(0, |entry| entry.count)
    }

    pub fn set_count(&mut self, role: RoleId, count: usize) {
        match self.0.iter_mut().find(|entry| entry.role == role) {
            Some(entry) => entry.count = count,
            None => self.0.push(RoleCount { role, count }),
        }
        self.0.retain(|entry| entry.count > 0);
    }

    /// Adds `delta` to the count for `role`, never going below zero.
    pub fn adjust(&mut self, role: RoleId, delta: isize) {
        let current = self.get(role);
        let next = current.saturating_add_signed(delta);
        self.set_count(role, next);
    }

    /// Flips a unique role between zero and one.
    pub fn toggle(&mut self, role: RoleId) {
        let next = if self.get(role) > 0 { 0 } else { 1 };
        self.set_count(role, next);
    }

    pub fn with(mut self, role: RoleId, count: usize) -> Self {
        self.set_count(role, count);
        self
    }

    pub fn total(&self) -> usize {
        self.0.iter().map(|entry| entry.count).sum()
    }

    pub fn werewolves(&self) -> usize {
        self.get(RoleId::Werewolf)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoleCount> {
        self.0.iter()
    }

    /// Flat pool with each role repeated `count` times.
    pub fn pool(&self) -> Vec<RoleId> {
        self.0
            .iter()
            .flat_map(|entry| std::iter::repeat(entry.role).take(entry.count))
            .collect()
    }
}

impl FromIterator<(RoleId, usize)> for RoleCounts {
    fn from_iter<T: IntoIterator<Item = (RoleId, usize)>>(iter: T) -> Self {
        let mut counts = RoleCounts::new();
        for (role, count) in iter {
            counts.set_count(role, counts.get(role) + count);
        }
        counts
    }
}

impl Display for RoleCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = self
            .0
            .iter()
            .map(|entry| format!("{}x{}", entry.count, entry.role))
            .join(", ");
        write!(f, "{text}")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePreset {
    pub id: String,
    pub name: String,
    pub role_counts: RoleCounts,
    pub min_players: usize,
    pub max_players: usize,
    pub description: String,
}

impl RolePreset {
    fn builtin(
        id: &str,
        name: &str,
        players: usize,
        counts: &[(RoleId, usize)],
        description: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            role_counts: counts.iter().copied().collect(),
            min_players: players,
            max_players: players,
            description: description.to_string(),
        }
    }

    pub fn has_jester(&self) -> bool {
        self.role_counts.get(RoleId::Jester) > 0
    }
}

pub fn builtin_presets() -> Vec<RolePreset> {
    use RoleId::*;
    vec![
        RolePreset::builtin(
            "beginner_4",
            "Beginner (4 players)",
            4,
            &[(Werewolf, 1), (Villager, 3)],
            "Minimal setup for learning",
        ),
        RolePreset::builtin(
            "classic_6",
            "Classic (6 players)",
            6,
            &[(Werewolf, 2), (Villager, 3), (Seer, 1)],
            "Perfect for beginners",
        ),
        RolePreset::builtin(
            "classic_8",
            "Classic (8 players)",
            8,
            &[(Werewolf, 2), (Villager, 4), (Seer, 1), (Doctor, 1)],
            "Balanced gameplay",
        ),
        RolePreset::builtin(
            "advanced_10",
            "Advanced (10 players)",
            10,
            &[(Werewolf, 2), (Villager, 5), (Seer, 1), (Doctor, 1), (Jester, 1)],
            "With the Jester who can win",
        ),
        RolePreset::builtin(
            "expert_12",
            "Expert (12 players)",
            12,
            &[
                (Werewolf, 3),
                (Villager, 5),
                (Seer, 1),
                (Doctor, 1),
                (Hunter, 1),
                (Medium, 1),
            ],
            "All special roles",
        ),
        RolePreset::builtin(
            "mayor_10",
            "Mayor's Village (10 players)",
            10,
            &[(Werewolf, 2), (Villager, 5), (Seer, 1), (Doctor, 1), (Mayor, 1)],
            "Features the Mayor role for village leadership",
        ),
        RolePreset::builtin(
            "chaos_14",
            "Chaos (14 players)",
            14,
            &[
                (Werewolf, 3),
                (Villager, 5),
                (Seer, 1),
                (Doctor, 1),
                (Hunter, 1),
                (Medium, 1),
                (Mayor, 1),
                (Jester, 1),
            ],
            "Total chaos with all roles including Mayor",
        ),
    ]
}
