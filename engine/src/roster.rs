use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use database::FrequentPlayer;
use itertools::Itertools;
use regex::Regex;

pub const MAX_SUGGESTIONS: usize = 6;

/// Names that were generated for blank roster slots.
pub fn is_default_player_name(name: &str) -> bool {
    static DEFAULT_NAME: OnceLock<Regex> = OnceLock::new();
    DEFAULT_NAME
        .get_or_init(|| Regex::new(r"^Player\s*\d+$").expect("Valid default name regex"))
        .is_match(name.trim())
}

/// Play history used to suggest names at setup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrequentPlayers {
    players: Vec<FrequentPlayer>,
}

impl FrequentPlayers {
    pub fn new(players: Vec<FrequentPlayer>) -> Self {
        Self { players }
    }

    pub fn players(&self) -> &[FrequentPlayer] {
        &self.players
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        let name = name.to_lowercase();
        self.players
            .iter()
            .position(|p| p.display_name.to_lowercase() == name)
    }

    /// Counts one more game for every real name in `names`. Matching is
    /// case-insensitive and a name appearing twice counts once. Returns the
    /// entries that changed.
    pub fn record_names<S: AsRef<str>>(
        &mut self,
        names: &[S],
        played_at: DateTime<Utc>,
    ) -> Vec<FrequentPlayer> {
        let cleaned = names
            .iter()
            .map(|name| name.as_ref().trim())
            .filter(|name| !name.is_empty() && !is_default_player_name(name))
            .unique_by(|name| name.to_lowercase())
            .collect_vec();

        let mut changed = Vec::with_capacity(cleaned.len());
        for name in cleaned {
            match self.position(name) {
                Some(index) => {
                    let player = &mut self.players[index];
                    player.play_count += 1;
                    player.last_played_at = played_at;
                    changed.push(player.clone());
                }
                None => {
                    let player = FrequentPlayer::new(name, played_at);
                    changed.push(player.clone());
                    self.players.push(player);
                }
            }
        }
        changed
    }

    /// Most played first, then most recent. `prefix` matches
    /// case-insensitively; names in `exclude` (already at the table) are left
    /// out.
    pub fn suggestions<S: AsRef<str>>(
        &self,
        prefix: &str,
        exclude: &[S],
        limit: usize,
    ) -> Vec<&str> {
        let prefix = prefix.trim().to_lowercase();
        let exclude = exclude
            .iter()
            .map(|name| name.as_ref().trim().to_lowercase())
            .collect_vec();
        self.players
            .iter()
            .sorted_by(|a, b| {
                b.play_count
                    .cmp(&a.play_count)
                    .then(b.last_played_at.cmp(&a.last_played_at))
            })
            .map(|p| p.display_name.as_str())
            .filter(|name| {
                let lower = name.to_lowercase();
                lower.starts_with(&prefix) && !exclude.contains(&lower)
            })
            .unique()
            .take(limit)
            .collect()
    }

    pub fn remove(&mut self, name: &str) -> Option<FrequentPlayer> {
        let index = self.position(name.trim())?;
        Some(self.players.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn default_names_are_recognised() {
        assert!(is_default_player_name("Player 3"));
        assert!(is_default_player_name(" Player12 "));
        assert!(!is_default_player_name("Player Three"));
        assert!(!is_default_player_name("Anna"));
    }

    #[test]
    fn recording_merges_case_insensitively() {
        let now = Utc::now();
        let mut roster = FrequentPlayers::default();
        roster.record_names(&["Anna", " bo ", "Player 4", ""], now);
        let changed = roster.record_names(&["anna", "ANNA"], now + Duration::minutes(5));

        assert_eq!(roster.players().len(), 2);
        assert_eq!(changed.len(), 1);
        assert_eq!(changed[0].display_name, "Anna");
        assert_eq!(changed[0].play_count, 2);
        assert_eq!(roster.players()[1].display_name, "bo");
    }

    #[test]
    fn suggestions_rank_by_count_then_recency() {
        let now = Utc::now();
        let mut roster = FrequentPlayers::default();
        roster.record_names(&["Anna", "Andrea", "Bo"], now);
        roster.record_names(&["Bo"], now + Duration::minutes(1));
        roster.record_names(&["Andrea"], now + Duration::minutes(2));

        assert_eq!(
            roster.suggestions("", &[] as &[&str], MAX_SUGGESTIONS),
            vec!["Andrea", "Bo", "Anna"]
        );
        assert_eq!(roster.suggestions("an", &["andrea"], MAX_SUGGESTIONS), vec!["Anna"]);
        assert_eq!(roster.suggestions("", &[] as &[&str], 1), vec!["Andrea"]);
    }

    #[test]
    fn remove_ignores_case() {
        let mut roster = FrequentPlayers::default();
        roster.record_names(&["Anna"], Utc::now());
        assert!(roster.remove("ANNA").is_some());
        assert!(roster.remove("Anna").is_none());
        assert!(roster.is_empty());
    }
}
