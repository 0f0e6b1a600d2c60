use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use std::collections::HashMap;
use uuid::Uuid;

use crate::db::store::{MatchStore, PlayerOrder, StoreError};
use crate::models::auth::Admin;
use crate::models::common::Team;
use crate::models::matches::{GameMode, Match, MatchFields, MatchWithParticipants};
use crate::models::participant::{ParticipantRecord, ParticipantView};
use crate::models::player::{Player, PlayerColor, PlayerRequest, PlayerSummary, DEFAULT_ELO_RATING};

const PLAYER_COLUMNS: &str = "id, name, nickname, steam_id, preferred_color, avatar_url, \
    total_matches, total_wins, elo_rating, created_at";

const MATCH_COLUMNS: &str = "id, played_at, map_name, game_mode, duration_minutes, winner_team";

#[derive(Debug, FromRow)]
struct PlayerRow {
    id: Uuid,
    name: String,
    nickname: Option<String>,
    steam_id: Option<String>,
    preferred_color: Option<String>,
    avatar_url: Option<String>,
    total_matches: i32,
    total_wins: i32,
    elo_rating: i32,
    created_at: DateTime<Utc>,
}

impl TryFrom<PlayerRow> for Player {
    type Error = StoreError;

    fn try_from(row: PlayerRow) -> Result<Self, Self::Error> {
        let preferred_color = row
            .preferred_color
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .map(str::parse::<PlayerColor>)
            .transpose()
            .map_err(StoreError::Corrupt)?;
        Ok(Player {
            id: row.id,
            name: row.name,
            nickname: row.nickname,
            steam_id: row.steam_id,
            preferred_color,
            avatar_url: row.avatar_url,
            total_matches: row.total_matches,
            total_wins: row.total_wins,
            elo_rating: row.elo_rating,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct MatchRow {
    id: Uuid,
    played_at: DateTime<Utc>,
    map_name: String,
    game_mode: String,
    duration_minutes: Option<i32>,
    winner_team: i16,
}

impl TryFrom<MatchRow> for Match {
    type Error = StoreError;

    fn try_from(row: MatchRow) -> Result<Self, Self::Error> {
        Ok(Match {
            id: row.id,
            played_at: row.played_at,
            map_name: row.map_name,
            game_mode: row.game_mode.parse::<GameMode>().map_err(StoreError::Corrupt)?,
            duration_minutes: row.duration_minutes,
            winner_team: Team::try_from(row.winner_team).map_err(StoreError::Corrupt)?,
        })
    }
}

#[derive(Debug, FromRow)]
struct ParticipantRow {
    match_id: Uuid,
    player_id: Uuid,
    team: i16,
    civilization: String,
    player_color: String,
    is_winner: bool,
}

impl TryFrom<ParticipantRow> for ParticipantRecord {
    type Error = StoreError;

    fn try_from(row: ParticipantRow) -> Result<Self, Self::Error> {
        Ok(ParticipantRecord {
            match_id: row.match_id,
            player_id: row.player_id,
            team: Team::try_from(row.team).map_err(StoreError::Corrupt)?,
            civilization: row.civilization,
            player_color: row.player_color.parse().map_err(StoreError::Corrupt)?,
            is_winner: row.is_winner,
        })
    }
}

/// A participant joined with the columns of its player
#[derive(Debug, FromRow)]
struct ParticipantViewRow {
    match_id: Uuid,
    team: i16,
    civilization: String,
    player_color: String,
    is_winner: bool,
    player_id: Uuid,
    player_name: String,
    player_nickname: Option<String>,
    player_avatar_url: Option<String>,
}

impl ParticipantViewRow {
    /// Splits the row into the owning match id and the rendered participant
    fn into_view(self) -> Result<(Uuid, ParticipantView), StoreError> {
        let view = ParticipantView {
            team: Team::try_from(self.team).map_err(StoreError::Corrupt)?,
            civilization: self.civilization,
            player_color: self.player_color.parse().map_err(StoreError::Corrupt)?,
            is_winner: self.is_winner,
            player: PlayerSummary {
                id: self.player_id,
                name: self.player_name,
                nickname: self.player_nickname,
                avatar_url: self.player_avatar_url,
            },
        };
        Ok((self.match_id, view))
    }
}

#[derive(Debug, FromRow)]
struct AdminRow {
    id: Uuid,
    email: String,
    password_hash: String,
}

impl From<AdminRow> for Admin {
    fn from(row: AdminRow) -> Self {
        Admin {
            id: row.id,
            email: row.email,
            password_hash: SecretString::new(row.password_hash.into_boxed_str()),
        }
    }
}

/// [`MatchStore`] backed by the Postgres schema in `migrations/`
#[derive(Clone)]
pub struct PgMatchStore {
    pool: PgPool,
}

impl PgMatchStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Loads the participants of `games` in one query and attaches them in team order
    async fn attach_participants(
        &self,
        games: Vec<Match>,
    ) -> Result<Vec<MatchWithParticipants>, StoreError> {
        if games.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = games.iter().map(|g| g.id).collect();
        let rows = sqlx::query_as::<_, ParticipantViewRow>(
            r#"
            SELECT mp.match_id, mp.team, mp.civilization, mp.player_color, mp.is_winner,
                   p.id AS player_id, p.name AS player_name,
                   p.nickname AS player_nickname, p.avatar_url AS player_avatar_url
            FROM match_participants mp
            JOIN players p ON p.id = mp.player_id
            WHERE mp.match_id = ANY($1)
            ORDER BY mp.team, mp.position
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_match: HashMap<Uuid, Vec<ParticipantView>> = HashMap::new();
        for row in rows {
            let (match_id, view) = row.into_view()?;
            by_match.entry(match_id).or_default().push(view);
        }

        Ok(games
            .into_iter()
            .map(|game| {
                let participants = by_match.remove(&game.id).unwrap_or_default();
                MatchWithParticipants { game, participants }
            })
            .collect())
    }
}

#[async_trait]
impl MatchStore for PgMatchStore {
    #[tracing::instrument(name = "Query players", skip(self))]
    async fn list_players(&self, order: PlayerOrder) -> Result<Vec<Player>, StoreError> {
        let order_by = match order {
            PlayerOrder::Name => "name ASC",
            PlayerOrder::Wins => "total_wins DESC, name ASC",
            PlayerOrder::Ranking => "total_wins DESC, elo_rating DESC, name ASC",
        };
        let sql = format!("SELECT {} FROM players ORDER BY {}", PLAYER_COLUMNS, order_by);
        sqlx::query_as::<_, PlayerRow>(&sql)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Player::try_from)
            .collect()
    }

    async fn get_player(&self, id: Uuid) -> Result<Option<Player>, StoreError> {
        let sql = format!("SELECT {} FROM players WHERE id = $1", PLAYER_COLUMNS);
        sqlx::query_as::<_, PlayerRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Player::try_from)
            .transpose()
    }

    async fn count_players(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM players")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    #[tracing::instrument(name = "Insert player", skip(self, player), fields(name = %player.name))]
    async fn insert_player(&self, player: &PlayerRequest) -> Result<Player, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO players (id, name, nickname, steam_id, preferred_color, avatar_url, elo_rating)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            PLAYER_COLUMNS
        );
        let row = sqlx::query_as::<_, PlayerRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&player.name)
            .bind(&player.nickname)
            .bind(&player.steam_id)
            .bind(player.preferred_color.map(|c| c.as_str()))
            .bind(&player.avatar_url)
            .bind(DEFAULT_ELO_RATING)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to execute player insert query: {:?}", e);
                e
            })?;
        Player::try_from(row)
    }

    #[tracing::instrument(name = "Update player", skip(self, player), fields(player_id = %id))]
    async fn update_player(&self, id: Uuid, player: &PlayerRequest) -> Result<Option<Player>, StoreError> {
        let sql = format!(
            r#"
            UPDATE players
            SET name = $2, nickname = $3, steam_id = $4, preferred_color = $5, avatar_url = $6
            WHERE id = $1
            RETURNING {}
            "#,
            PLAYER_COLUMNS
        );
        sqlx::query_as::<_, PlayerRow>(&sql)
            .bind(id)
            .bind(&player.name)
            .bind(&player.nickname)
            .bind(&player.steam_id)
            .bind(player.preferred_color.map(|c| c.as_str()))
            .bind(&player.avatar_url)
            .fetch_optional(&self.pool)
            .await?
            .map(Player::try_from)
            .transpose()
    }

    #[tracing::instrument(name = "Delete player", skip(self))]
    async fn delete_player(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM players WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(name = "Query matches", skip(self))]
    async fn list_matches(&self, limit: Option<i64>) -> Result<Vec<MatchWithParticipants>, StoreError> {
        let sql = format!(
            "SELECT {} FROM matches ORDER BY played_at DESC, created_at DESC LIMIT $1",
            MATCH_COLUMNS
        );
        let games = sqlx::query_as::<_, MatchRow>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Match::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        self.attach_participants(games).await
    }

    #[tracing::instrument(name = "Query player matches", skip(self))]
    async fn matches_for_player(&self, player_id: Uuid) -> Result<Vec<MatchWithParticipants>, StoreError> {
        let sql = format!(
            r#"
            SELECT {} FROM matches m
            WHERE EXISTS (
                SELECT 1 FROM match_participants mp
                WHERE mp.match_id = m.id AND mp.player_id = $1
            )
            ORDER BY played_at DESC, created_at DESC
            "#,
            MATCH_COLUMNS
        );
        let games = sqlx::query_as::<_, MatchRow>(&sql)
            .bind(player_id)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Match::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        self.attach_participants(games).await
    }

    async fn count_matches(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM matches")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn get_match(&self, id: Uuid) -> Result<Option<Match>, StoreError> {
        let sql = format!("SELECT {} FROM matches WHERE id = $1", MATCH_COLUMNS);
        sqlx::query_as::<_, MatchRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Match::try_from)
            .transpose()
    }

    async fn get_participants(&self, match_id: Uuid) -> Result<Vec<ParticipantRecord>, StoreError> {
        sqlx::query_as::<_, ParticipantRow>(
            r#"
            SELECT match_id, player_id, team, civilization, player_color, is_winner
            FROM match_participants
            WHERE match_id = $1
            ORDER BY position
            "#,
        )
        .bind(match_id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(ParticipantRecord::try_from)
        .collect()
    }

    #[tracing::instrument(name = "Insert match", skip(self, fields), fields(map = %fields.map_name))]
    async fn insert_match(&self, fields: &MatchFields) -> Result<Match, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO matches (id, played_at, map_name, game_mode, duration_minutes, winner_team)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            MATCH_COLUMNS
        );
        let row = sqlx::query_as::<_, MatchRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(fields.played_at)
            .bind(&fields.map_name)
            .bind(fields.game_mode.as_str())
            .bind(fields.duration_minutes)
            .bind(fields.winner_team.number())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to execute match insert query: {:?}", e);
                e
            })?;
        Match::try_from(row)
    }

    #[tracing::instrument(name = "Update match", skip(self, fields))]
    async fn update_match(&self, id: Uuid, fields: &MatchFields) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE matches
            SET played_at = $2, map_name = $3, game_mode = $4, duration_minutes = $5, winner_team = $6
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(fields.played_at)
        .bind(&fields.map_name)
        .bind(fields.game_mode.as_str())
        .bind(fields.duration_minutes)
        .bind(fields.winner_team.number())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(name = "Delete match", skip(self))]
    async fn delete_match(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM matches WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(name = "Delete match participants", skip(self))]
    async fn delete_participants(&self, match_id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM match_participants WHERE match_id = $1")
            .bind(match_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    #[tracing::instrument(name = "Insert match participants", skip(self, records), fields(count = records.len()))]
    async fn insert_participants(&self, records: &[ParticipantRecord]) -> Result<(), StoreError> {
        if records.is_empty() {
            return Ok(());
        }
        let mut query_builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO match_participants (id, match_id, player_id, position, team, civilization, player_color, is_winner) ",
        );
        query_builder.push_values(records.iter().enumerate(), |mut row, (position, record)| {
            row.push_bind(Uuid::new_v4())
                .push_bind(record.match_id)
                .push_bind(record.player_id)
                .push_bind(position as i16)
                .push_bind(record.team.number())
                .push_bind(record.civilization.clone())
                .push_bind(record.player_color.as_str())
                .push_bind(record.is_winner);
        });
        query_builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to execute participants insert query: {:?}", e);
                e
            })?;
        Ok(())
    }

    async fn find_admin_by_email(&self, email: &str) -> Result<Option<Admin>, StoreError> {
        let row = sqlx::query_as::<_, AdminRow>(
            "SELECT id, email, password_hash FROM admins WHERE lower(email) = lower($1)",
        )
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Admin::from))
    }

    async fn upsert_admin(&self, email: &str, password_hash: &str) -> Result<Admin, StoreError> {
        let row = sqlx::query_as::<_, AdminRow>(
            r#"
            INSERT INTO admins (id, email, password_hash)
            VALUES ($1, lower($2), $3)
            ON CONFLICT (email) DO UPDATE SET password_hash = EXCLUDED.password_hash
            RETURNING id, email, password_hash
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email.trim())
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(Admin::from(row))
    }
}
