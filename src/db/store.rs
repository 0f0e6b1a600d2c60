//! The storage collaborator behind every screen.
//!
//! Handlers and services only see [`MatchStore`]; production wires in
//! [`PgMatchStore`](crate::db::postgres::PgMatchStore), tests use
//! [`InMemoryStore`](crate::db::memory::InMemoryStore).

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::auth::Admin;
use crate::models::matches::{Match, MatchFields, MatchWithParticipants};
use crate::models::participant::ParticipantRecord;
use crate::models::player::{Player, PlayerRequest};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Constraint violated: {0}")]
    Constraint(String),

    #[error("Invalid stored value: {0}")]
    Corrupt(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Row ordering for player listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerOrder {
    /// Alphabetical, used by the admin roster and the draft editor
    Name,
    /// Most wins first, then alphabetical
    Wins,
    /// Most wins first, then highest ELO
    Ranking,
}

#[async_trait]
pub trait MatchStore: Send + Sync {
    async fn list_players(&self, order: PlayerOrder) -> Result<Vec<Player>, StoreError>;

    async fn get_player(&self, id: Uuid) -> Result<Option<Player>, StoreError>;

    async fn count_players(&self) -> Result<i64, StoreError>;

    async fn insert_player(&self, player: &PlayerRequest) -> Result<Player, StoreError>;

    /// `None` when no player has this id
    async fn update_player(&self, id: Uuid, player: &PlayerRequest) -> Result<Option<Player>, StoreError>;

    /// Removes the player and, by cascade, their participations
    async fn delete_player(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Newest first, with participants. `limit = None` returns everything.
    async fn list_matches(&self, limit: Option<i64>) -> Result<Vec<MatchWithParticipants>, StoreError>;

    /// Newest first, every match the player took part in
    async fn matches_for_player(&self, player_id: Uuid) -> Result<Vec<MatchWithParticipants>, StoreError>;

    async fn count_matches(&self) -> Result<i64, StoreError>;

    async fn get_match(&self, id: Uuid) -> Result<Option<Match>, StoreError>;

    async fn get_participants(&self, match_id: Uuid) -> Result<Vec<ParticipantRecord>, StoreError>;

    async fn insert_match(&self, fields: &MatchFields) -> Result<Match, StoreError>;

    /// `false` when no match has this id
    async fn update_match(&self, id: Uuid, fields: &MatchFields) -> Result<bool, StoreError>;

    async fn delete_match(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Returns the number of removed rows
    async fn delete_participants(&self, match_id: Uuid) -> Result<u64, StoreError>;

    async fn insert_participants(&self, records: &[ParticipantRecord]) -> Result<(), StoreError>;

    async fn find_admin_by_email(&self, email: &str) -> Result<Option<Admin>, StoreError>;

    /// Creates the admin or replaces its password hash
    async fn upsert_admin(&self, email: &str, password_hash: &str) -> Result<Admin, StoreError>;
}
