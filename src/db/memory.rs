//! Process-local [`MatchStore`] mirroring the Postgres schema: cascading
//! deletes, the unique (match, player) pair and the player counters the
//! database trigger maintains. Every call is recorded, and any operation can be
//! told to fail, so save flows can be checked step by step.

use async_trait::async_trait;
use chrono::Utc;
use secrecy::SecretString;
use std::cmp::Reverse;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::db::store::{MatchStore, PlayerOrder, StoreError};
use crate::models::auth::Admin;
use crate::models::matches::{Match, MatchFields, MatchWithParticipants};
use crate::models::participant::{ParticipantRecord, ParticipantView};
use crate::models::player::{Player, PlayerRequest, DEFAULT_ELO_RATING};

/// Names of the store operations, as recorded in the call log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    ListPlayers,
    GetPlayer,
    CountPlayers,
    InsertPlayer,
    UpdatePlayer,
    DeletePlayer,
    ListMatches,
    MatchesForPlayer,
    CountMatches,
    GetMatch,
    GetParticipants,
    InsertMatch,
    UpdateMatch,
    DeleteMatch,
    DeleteParticipants,
    InsertParticipants,
    FindAdmin,
    UpsertAdmin,
}

#[derive(Default)]
struct Tables {
    players: Vec<Player>,
    matches: Vec<(Match, i64)>,
    participants: Vec<ParticipantRecord>,
    admins: Vec<Admin>,
    next_sequence: i64,
}

impl Tables {
    fn refresh_counters(&mut self) {
        for player in self.players.iter_mut() {
            let mine = self.participants.iter().filter(|p| p.player_id == player.id);
            let (played, won) = mine.fold((0, 0), |(played, won), p| {
                (played + 1, won + i32::from(p.is_winner))
            });
            player.total_matches = played;
            player.total_wins = won;
        }
    }

    fn views(&self, match_id: Uuid) -> Vec<ParticipantView> {
        let mut views: Vec<ParticipantView> = self
            .participants
            .iter()
            .filter(|p| p.match_id == match_id)
            .filter_map(|p| {
                let player = self.players.iter().find(|pl| pl.id == p.player_id)?;
                Some(ParticipantView {
                    team: p.team,
                    civilization: p.civilization.clone(),
                    player_color: p.player_color,
                    is_winner: p.is_winner,
                    player: player.summary(),
                })
            })
            .collect();
        views.sort_by_key(|v| v.team.number());
        views
    }

    /// Newest first; matches saved later win ties on `played_at`
    fn sorted_matches(&self) -> Vec<&Match> {
        let mut games: Vec<&(Match, i64)> = self.matches.iter().collect();
        games.sort_by_key(|(game, sequence)| Reverse((game.played_at, *sequence)));
        games.into_iter().map(|(game, _)| game).collect()
    }

    fn with_participants(&self, game: &Match) -> MatchWithParticipants {
        MatchWithParticipants {
            game: game.clone(),
            participants: self.views(game.id),
        }
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    failures: Mutex<HashSet<StoreOperation>>,
    calls: Mutex<Vec<StoreOperation>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later call of `operation` fail with [`StoreError::Unavailable`]
    pub fn fail_on(&self, operation: StoreOperation) {
        lock(&self.failures).insert(operation);
    }

    /// Operations called so far, in order
    pub fn calls(&self) -> Vec<StoreOperation> {
        lock(&self.calls).clone()
    }

    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }

    fn begin(&self, operation: StoreOperation) -> Result<MutexGuard<'_, Tables>, StoreError> {
        lock(&self.calls).push(operation);
        if lock(&self.failures).contains(&operation) {
            return Err(StoreError::Unavailable(format!("{:?} failed", operation)));
        }
        Ok(lock(&self.tables))
    }
}

/// A poisoned lock only means another test thread panicked mid-call; the data is still usable
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl MatchStore for InMemoryStore {
    async fn list_players(&self, order: PlayerOrder) -> Result<Vec<Player>, StoreError> {
        let tables = self.begin(StoreOperation::ListPlayers)?;
        let mut players = tables.players.clone();
        match order {
            PlayerOrder::Name => players.sort_by(|a, b| a.name.cmp(&b.name)),
            PlayerOrder::Wins => players.sort_by(|a, b| {
                b.total_wins.cmp(&a.total_wins).then_with(|| a.name.cmp(&b.name))
            }),
            PlayerOrder::Ranking => players.sort_by(|a, b| {
                b.total_wins
                    .cmp(&a.total_wins)
                    .then_with(|| b.elo_rating.cmp(&a.elo_rating))
                    .then_with(|| a.name.cmp(&b.name))
            }),
        }
        Ok(players)
    }

    async fn get_player(&self, id: Uuid) -> Result<Option<Player>, StoreError> {
        let tables = self.begin(StoreOperation::GetPlayer)?;
        Ok(tables.players.iter().find(|p| p.id == id).cloned())
    }

    async fn count_players(&self) -> Result<i64, StoreError> {
        let tables = self.begin(StoreOperation::CountPlayers)?;
        Ok(tables.players.len() as i64)
    }

    async fn insert_player(&self, player: &PlayerRequest) -> Result<Player, StoreError> {
        let mut tables = self.begin(StoreOperation::InsertPlayer)?;
        let created = Player {
            id: Uuid::new_v4(),
            name: player.name.clone(),
            nickname: player.nickname.clone(),
            steam_id: player.steam_id.clone(),
            preferred_color: player.preferred_color,
            avatar_url: player.avatar_url.clone(),
            total_matches: 0,
            total_wins: 0,
            elo_rating: DEFAULT_ELO_RATING,
            created_at: Utc::now(),
        };
        tables.players.push(created.clone());
        Ok(created)
    }

    async fn update_player(&self, id: Uuid, player: &PlayerRequest) -> Result<Option<Player>, StoreError> {
        let mut tables = self.begin(StoreOperation::UpdatePlayer)?;
        let Some(existing) = tables.players.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        existing.name = player.name.clone();
        existing.nickname = player.nickname.clone();
        existing.steam_id = player.steam_id.clone();
        existing.preferred_color = player.preferred_color;
        existing.avatar_url = player.avatar_url.clone();
        Ok(Some(existing.clone()))
    }

    async fn delete_player(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.begin(StoreOperation::DeletePlayer)?;
        let before = tables.players.len();
        tables.players.retain(|p| p.id != id);
        tables.participants.retain(|p| p.player_id != id);
        Ok(tables.players.len() < before)
    }

    async fn list_matches(&self, limit: Option<i64>) -> Result<Vec<MatchWithParticipants>, StoreError> {
        let tables = self.begin(StoreOperation::ListMatches)?;
        let limit = limit.map(|l| l.max(0) as usize).unwrap_or(usize::MAX);
        Ok(tables
            .sorted_matches()
            .into_iter()
            .take(limit)
            .map(|game| tables.with_participants(game))
            .collect())
    }

    async fn matches_for_player(&self, player_id: Uuid) -> Result<Vec<MatchWithParticipants>, StoreError> {
        let tables = self.begin(StoreOperation::MatchesForPlayer)?;
        Ok(tables
            .sorted_matches()
            .into_iter()
            .filter(|game| {
                tables
                    .participants
                    .iter()
                    .any(|p| p.match_id == game.id && p.player_id == player_id)
            })
            .map(|game| tables.with_participants(game))
            .collect())
    }

    async fn count_matches(&self) -> Result<i64, StoreError> {
        let tables = self.begin(StoreOperation::CountMatches)?;
        Ok(tables.matches.len() as i64)
    }

    async fn get_match(&self, id: Uuid) -> Result<Option<Match>, StoreError> {
        let tables = self.begin(StoreOperation::GetMatch)?;
        Ok(tables
            .matches
            .iter()
            .find(|(game, _)| game.id == id)
            .map(|(game, _)| game.clone()))
    }

    async fn get_participants(&self, match_id: Uuid) -> Result<Vec<ParticipantRecord>, StoreError> {
        let tables = self.begin(StoreOperation::GetParticipants)?;
        Ok(tables
            .participants
            .iter()
            .filter(|p| p.match_id == match_id)
            .cloned()
            .collect())
    }

    async fn insert_match(&self, fields: &MatchFields) -> Result<Match, StoreError> {
        let mut tables = self.begin(StoreOperation::InsertMatch)?;
        let game = fields.clone().into_match(Uuid::new_v4());
        tables.next_sequence += 1;
        let sequence = tables.next_sequence;
        tables.matches.push((game.clone(), sequence));
        Ok(game)
    }

    async fn update_match(&self, id: Uuid, fields: &MatchFields) -> Result<bool, StoreError> {
        let mut tables = self.begin(StoreOperation::UpdateMatch)?;
        match tables.matches.iter_mut().find(|(game, _)| game.id == id) {
            Some((game, _)) => {
                *game = fields.clone().into_match(id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_match(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.begin(StoreOperation::DeleteMatch)?;
        let before = tables.matches.len();
        tables.matches.retain(|(game, _)| game.id != id);
        tables.participants.retain(|p| p.match_id != id);
        tables.refresh_counters();
        Ok(tables.matches.len() < before)
    }

    async fn delete_participants(&self, match_id: Uuid) -> Result<u64, StoreError> {
        let mut tables = self.begin(StoreOperation::DeleteParticipants)?;
        let before = tables.participants.len();
        tables.participants.retain(|p| p.match_id != match_id);
        let removed = (before - tables.participants.len()) as u64;
        tables.refresh_counters();
        Ok(removed)
    }

    async fn insert_participants(&self, records: &[ParticipantRecord]) -> Result<(), StoreError> {
        let mut tables = self.begin(StoreOperation::InsertParticipants)?;
        let mut pairs: HashSet<(Uuid, Uuid)> = tables
            .participants
            .iter()
            .map(|p| (p.match_id, p.player_id))
            .collect();
        // The whole batch is checked first so a rejected insert writes nothing.
        for record in records {
            if !tables.matches.iter().any(|(game, _)| game.id == record.match_id) {
                return Err(StoreError::Constraint(format!("match {} does not exist", record.match_id)));
            }
            if !tables.players.iter().any(|p| p.id == record.player_id) {
                return Err(StoreError::Constraint(format!("player {} does not exist", record.player_id)));
            }
            if record.civilization.trim().is_empty() {
                return Err(StoreError::Constraint("civilization must not be empty".into()));
            }
            if !pairs.insert((record.match_id, record.player_id)) {
                return Err(StoreError::Constraint(format!(
                    "player {} already takes part in match {}",
                    record.player_id, record.match_id
                )));
            }
        }
        tables.participants.extend_from_slice(records);
        tables.refresh_counters();
        Ok(())
    }

    async fn find_admin_by_email(&self, email: &str) -> Result<Option<Admin>, StoreError> {
        let tables = self.begin(StoreOperation::FindAdmin)?;
        let email = email.trim();
        Ok(tables
            .admins
            .iter()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn upsert_admin(&self, email: &str, password_hash: &str) -> Result<Admin, StoreError> {
        let mut tables = self.begin(StoreOperation::UpsertAdmin)?;
        let email = email.trim().to_lowercase();
        let hash = SecretString::new(password_hash.to_string().into_boxed_str());
        if let Some(admin) = tables.admins.iter_mut().find(|a| a.email == email) {
            admin.password_hash = hash;
            return Ok(admin.clone());
        }
        let admin = Admin {
            id: Uuid::new_v4(),
            email,
            password_hash: hash,
        };
        tables.admins.push(admin.clone());
        Ok(admin)
    }
}
