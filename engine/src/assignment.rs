use itertools::Itertools;
use rand::{seq::SliceRandom, Rng};
use types::{GameError, HouseRules, Player, RoleCounts, RosterEntry, ValidationError};

use crate::{setup, MatchSession};

pub fn default_player_name(slot: usize) -> String {
    format!("Player {}", slot + 1)
}

/// Validates the setup, shuffles the role pool and pairs it with the roster
/// slots in order. Returns a fresh session in the reveal phase.
pub fn start_game<R: Rng + ?Sized>(
    player_count: usize,
    role_counts: &RoleCounts,
    roster: &[RosterEntry],
    rules: HouseRules,
    rng: &mut R,
) -> Result<MatchSession, GameError> {
    setup::validate(player_count, role_counts)?;
    if roster.len() > player_count {
        return Err(ValidationError::RosterTooLong {
            names: roster.len(),
            player_count,
        }
        .into());
    }

    let mut pool = role_counts.pool();
    pool.shuffle(rng);

    let players = pool
        .into_iter()
        .enumerate()
        .map(|(slot, role)| {
            let entry = roster.get(slot);
            let name = entry
                .map(|e| e.name.trim())
                .filter(|name| !name.is_empty())
                .map_or_else(|| default_player_name(slot), str::to_string);
            let mut player = Player::new(name, role);
            player.contact = entry.and_then(|e| e.phone.clone());
            player
        })
        .collect_vec();

    log::info!(
        "Assigned roles for {} players: {}",
        players.len(),
        players
            .iter()
            .map(|p| format!("{}={}", p.display_name, p.role))
            .join(", ")
    );
    Ok(MatchSession::with_players(players, rules))
}
