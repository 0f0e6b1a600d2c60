// src/services/stats.rs
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::db::store::{MatchStore, PlayerOrder, StoreError};
use crate::models::matches::MatchWithParticipants;
use crate::models::player::Player;

/// Shown instead of a civilization when a player has no matches yet
pub const NO_FAVORITE_CIVILIZATION: &str = "-";

/// Players on the podium of the ranking screen
pub const PODIUM_SIZE: usize = 3;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PlayerProfile {
    pub player: Player,
    pub total_matches: i32,
    pub total_wins: i32,
    pub win_rate: i32,
    pub favorite_civilization: String,
    pub matches: Vec<MatchWithParticipants>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RankedPlayer {
    pub rank: usize,
    pub player: Player,
    pub win_rate: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Ranking {
    /// First three places, empty until at least three players exist
    pub podium: Vec<RankedPlayer>,
    pub players: Vec<RankedPlayer>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DashboardSummary {
    pub total_matches: i64,
    pub player_count: i64,
    pub recent_matches: Vec<MatchWithParticipants>,
}

/// Rounded percentage of matches won, 0 without matches
pub fn win_rate(wins: i32, matches: i32) -> i32 {
    if matches <= 0 {
        return 0;
    }
    ((wins as f64 / matches as f64) * 100.0).round() as i32
}

/// Civilization the player picked most often across `matches`.
///
/// Ties go to the civilization seen first, which for newest-first input is the
/// one played most recently.
pub fn favorite_civilization(player_id: Uuid, matches: &[MatchWithParticipants]) -> Option<String> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    let picks = matches.iter().filter_map(|m| {
        m.participants
            .iter()
            .find(|p| p.player.id == player_id)
            .map(|p| p.civilization.as_str())
    });
    for (seen_at, civilization) in picks.enumerate() {
        counts.entry(civilization).or_insert((0, seen_at)).0 += 1;
    }
    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then_with(|| first_b.cmp(first_a))
        })
        .map(|(civilization, _)| civilization.to_string())
}

pub struct StatsService<'a> {
    store: &'a dyn MatchStore,
}

impl<'a> StatsService<'a> {
    pub fn new(store: &'a dyn MatchStore) -> Self {
        Self { store }
    }

    /// `None` when the player does not exist
    pub async fn player_profile(&self, player_id: Uuid) -> Result<Option<PlayerProfile>, StoreError> {
        let Some(player) = self.store.get_player(player_id).await? else {
            return Ok(None);
        };
        let matches = self.store.matches_for_player(player_id).await?;

        // The stored counter lags behind on freshly imported players
        let total_matches = if player.total_matches > 0 {
            player.total_matches
        } else {
            matches.len() as i32
        };
        let total_wins = player.total_wins;
        let favorite = favorite_civilization(player_id, &matches)
            .unwrap_or_else(|| NO_FAVORITE_CIVILIZATION.to_string());

        Ok(Some(PlayerProfile {
            total_matches,
            total_wins,
            win_rate: win_rate(total_wins, total_matches),
            favorite_civilization: favorite,
            matches,
            player,
        }))
    }

    pub async fn ranking(&self) -> Result<Ranking, StoreError> {
        let players: Vec<RankedPlayer> = self
            .store
            .list_players(PlayerOrder::Ranking)
            .await?
            .into_iter()
            .enumerate()
            .map(|(index, player)| RankedPlayer {
                rank: index + 1,
                win_rate: win_rate(player.total_wins, player.total_matches),
                player,
            })
            .collect();
        let podium = if players.len() >= PODIUM_SIZE {
            players[..PODIUM_SIZE].to_vec()
        } else {
            Vec::new()
        };
        Ok(Ranking { podium, players })
    }

    pub async fn summary(&self, recent: i64) -> Result<DashboardSummary, StoreError> {
        Ok(DashboardSummary {
            total_matches: self.store.count_matches().await?,
            player_count: self.store.count_players().await?,
            recent_matches: self.store.list_matches(Some(recent)).await?,
        })
    }
}
