use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::db::store::{MatchStore, PlayerOrder, StoreError};
use crate::draft::{DraftError, DraftValidator, ParticipantDraft};
use crate::models::catalog::canonical_map;
use crate::models::common::Team;
use crate::models::matches::{Match, MatchFields, MatchRequest};
use crate::models::participant::ParticipantRecord;

/// The store call a save flow was at when it failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStep {
    LoadPlayers,
    LoadMatch,
    CreateMatch,
    UpdateMatch,
    ClearParticipants,
    InsertParticipants,
    DeleteMatch,
}

impl fmt::Display for SaveStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let step = match self {
            SaveStep::LoadPlayers => "load players",
            SaveStep::LoadMatch => "load match",
            SaveStep::CreateMatch => "create match",
            SaveStep::UpdateMatch => "update match",
            SaveStep::ClearParticipants => "clear participants",
            SaveStep::InsertParticipants => "insert participants",
            SaveStep::DeleteMatch => "delete match",
        };
        f.write_str(step)
    }
}

#[derive(Debug, Error)]
pub enum MatchServiceError {
    #[error("{0}")]
    Validation(#[from] DraftError),

    #[error("{0}")]
    InvalidMatch(String),

    #[error("Match {0} not found")]
    NotFound(Uuid),

    #[error("Failed to {step}: {source}")]
    Storage {
        step: SaveStep,
        #[source]
        source: StoreError,
    },
}

impl MatchServiceError {
    fn storage(step: SaveStep) -> impl FnOnce(StoreError) -> Self {
        move |source| MatchServiceError::Storage { step, source }
    }
}

/// Result of a successful save
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SavedMatch {
    #[serde(rename = "match")]
    pub game: Match,
    pub participants: Vec<ParticipantRecord>,
}

/// What the edit screen is hydrated with
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MatchEditor {
    #[serde(rename = "match")]
    pub game: Match,
    pub draft: ParticipantDraft,
}

/// The create and edit save flows.
///
/// Validation runs before the first write. The writes themselves are separate
/// store calls made in order with nothing wrapping them: a failure part way
/// leaves the earlier steps in place and is reported with the step it hit.
pub struct MatchService<'a> {
    store: &'a dyn MatchStore,
}

impl<'a> MatchService<'a> {
    pub fn new(store: &'a dyn MatchStore) -> Self {
        Self { store }
    }

    /// Create flow: insert the match, then its participants
    #[tracing::instrument(name = "Create match", skip(self, request), fields(request = %request))]
    pub async fn create_match(&self, request: &MatchRequest) -> Result<SavedMatch, MatchServiceError> {
        let validator = DraftValidator::new();
        let (draft, fields) = self.prepare(&validator, request).await?;

        let game = self
            .store
            .insert_match(&fields)
            .await
            .map_err(MatchServiceError::storage(SaveStep::CreateMatch))?;

        let participants = draft.commit_with(&validator, Some(fields.winner_team), game.id)?;
        self.store
            .insert_participants(&participants)
            .await
            .map_err(|e| {
                tracing::error!("Match {} was created but its participants were not: {}", game.id, e);
                MatchServiceError::Storage { step: SaveStep::InsertParticipants, source: e }
            })?;

        tracing::info!("Created match {} with {} participants", game.id, participants.len());
        Ok(SavedMatch { game, participants })
    }

    /// Edit flow: update the match, drop every stored participant, insert the draft
    #[tracing::instrument(name = "Update match", skip(self, request), fields(match_id = %match_id, request = %request))]
    pub async fn update_match(
        &self,
        match_id: Uuid,
        request: &MatchRequest,
    ) -> Result<SavedMatch, MatchServiceError> {
        let validator = DraftValidator::for_stored_match();
        let (draft, fields) = self.prepare(&validator, request).await?;

        self.store
            .get_match(match_id)
            .await
            .map_err(MatchServiceError::storage(SaveStep::LoadMatch))?
            .ok_or(MatchServiceError::NotFound(match_id))?;
        let participants = draft.commit_with(&validator, Some(fields.winner_team), match_id)?;

        let updated = self
            .store
            .update_match(match_id, &fields)
            .await
            .map_err(MatchServiceError::storage(SaveStep::UpdateMatch))?;
        if !updated {
            return Err(MatchServiceError::NotFound(match_id));
        }

        let removed = self
            .store
            .delete_participants(match_id)
            .await
            .map_err(MatchServiceError::storage(SaveStep::ClearParticipants))?;

        self.store
            .insert_participants(&participants)
            .await
            .map_err(|e| {
                tracing::error!("Match {} lost its {} participants and the new ones were not saved: {}", match_id, removed, e);
                MatchServiceError::Storage { step: SaveStep::InsertParticipants, source: e }
            })?;

        tracing::info!("Replaced {} participants of match {} with {}", removed, match_id, participants.len());
        Ok(SavedMatch {
            game: fields.into_match(match_id),
            participants,
        })
    }

    /// Loads a match and its participants as an editable draft
    pub async fn load_editor(&self, match_id: Uuid) -> Result<MatchEditor, MatchServiceError> {
        let game = self
            .store
            .get_match(match_id)
            .await
            .map_err(MatchServiceError::storage(SaveStep::LoadMatch))?
            .ok_or(MatchServiceError::NotFound(match_id))?;
        let records = self
            .store
            .get_participants(match_id)
            .await
            .map_err(MatchServiceError::storage(SaveStep::LoadMatch))?;
        Ok(MatchEditor {
            game,
            draft: ParticipantDraft::hydrate(&records),
        })
    }

    #[tracing::instrument(name = "Delete match", skip(self))]
    pub async fn delete_match(&self, match_id: Uuid) -> Result<(), MatchServiceError> {
        let deleted = self
            .store
            .delete_match(match_id)
            .await
            .map_err(MatchServiceError::storage(SaveStep::DeleteMatch))?;
        if deleted {
            Ok(())
        } else {
            Err(MatchServiceError::NotFound(match_id))
        }
    }

    /// Every check that must pass before the first write
    async fn prepare(
        &self,
        validator: &DraftValidator,
        request: &MatchRequest,
    ) -> Result<(ParticipantDraft, MatchFields), MatchServiceError> {
        let draft = ParticipantDraft::from_entries(request.participants.clone())?;
        let winner_team = draft.validate_with(validator, request.winner_team)?;
        let fields = match_fields(request, winner_team)?;

        let known: HashSet<Uuid> = self
            .store
            .list_players(PlayerOrder::Name)
            .await
            .map_err(MatchServiceError::storage(SaveStep::LoadPlayers))?
            .into_iter()
            .map(|p| p.id)
            .collect();
        if let Some(unknown) = draft.entries().iter().find(|e| !known.contains(&e.player_id)) {
            return Err(DraftError::UnknownPlayer(unknown.player_id).into());
        }

        Ok((draft, fields))
    }
}

/// Checks the scalar part of the form and fills in defaults
pub fn match_fields(
    request: &MatchRequest,
    winner_team: Team,
) -> Result<MatchFields, MatchServiceError> {
    let map_name = canonical_map(&request.map_name).ok_or_else(|| {
        MatchServiceError::InvalidMatch(format!("{} is not a known map", request.map_name.trim()))
    })?;
    if let Some(minutes) = request.duration_minutes {
        if minutes <= 0 {
            return Err(MatchServiceError::InvalidMatch(
                "Duration must be a positive number of minutes".to_string(),
            ));
        }
    }
    Ok(MatchFields {
        played_at: request.played_at.unwrap_or_else(Utc::now),
        map_name: map_name.to_string(),
        game_mode: request.game_mode,
        duration_minutes: request.duration_minutes,
        winner_team,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::{InMemoryStore, StoreOperation};
    use crate::models::matches::GameMode;
    use crate::models::participant::DraftParticipant;
    use crate::models::player::{Player, PlayerColor, PlayerRequest};

    async fn seed_players(store: &InMemoryStore, names: &[&str]) -> Vec<Player> {
        let mut players = Vec::new();
        for name in names {
            let request = PlayerRequest {
                name: name.to_string(),
                nickname: None,
                steam_id: None,
                preferred_color: Some(PlayerColor::Blue),
                avatar_url: None,
            };
            players.push(store.insert_player(&request).await.unwrap());
        }
        players
    }

    fn entry(player: &Player, team: Team, civilization: &str) -> DraftParticipant {
        DraftParticipant {
            player_id: player.id,
            team,
            civilization: civilization.into(),
            player_color: PlayerColor::Blue,
        }
    }

    fn request(participants: Vec<DraftParticipant>, winner: Option<Team>) -> MatchRequest {
        MatchRequest {
            map_name: "arabia".into(),
            game_mode: GameMode::OneVsOne,
            played_at: None,
            duration_minutes: Some(42),
            winner_team: winner,
            participants,
        }
    }

    #[tokio::test]
    async fn create_inserts_match_then_participants() {
        let store = InMemoryStore::new();
        let players = seed_players(&store, &["Martu", "Chaca"]).await;
        store.clear_calls();

        let saved = MatchService::new(&store)
            .create_match(&request(
                vec![entry(&players[0], Team::One, "Franks"), entry(&players[1], Team::Two, "Huns")],
                Some(Team::One),
            ))
            .await
            .unwrap();

        assert_eq!(saved.game.map_name, "Arabia");
        assert_eq!(
            store.calls(),
            vec![StoreOperation::ListPlayers, StoreOperation::InsertMatch, StoreOperation::InsertParticipants]
        );
        assert!(saved.participants.iter().all(|p| p.is_winner == (p.team == Team::One)));
        assert_eq!(store.get_participants(saved.game.id).await.unwrap(), saved.participants);
    }

    #[tokio::test]
    async fn validation_failure_makes_no_store_call() {
        let store = InMemoryStore::new();
        let players = seed_players(&store, &["Tata", "Facu"]).await;
        store.clear_calls();
        let service = MatchService::new(&store);

        let missing_winner = service
            .create_match(&request(
                vec![entry(&players[0], Team::One, "Celts"), entry(&players[1], Team::Two, "Goths")],
                None,
            ))
            .await;
        let missing_civ = service
            .create_match(&request(
                vec![entry(&players[0], Team::One, "Celts"), entry(&players[1], Team::Two, "")],
                Some(Team::Two),
            ))
            .await;

        assert!(matches!(missing_winner, Err(MatchServiceError::Validation(DraftError::MissingWinner))));
        assert!(matches!(missing_civ, Err(MatchServiceError::Validation(DraftError::MissingCivilization(_)))));
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn edit_replaces_every_participant() {
        let store = InMemoryStore::new();
        let players = seed_players(&store, &["Bicho", "Mosca", "Zevj"]).await;
        let service = MatchService::new(&store);
        let created = service
            .create_match(&request(
                vec![entry(&players[0], Team::One, "Britons"), entry(&players[1], Team::Two, "Mongols")],
                Some(Team::Two),
            ))
            .await
            .unwrap();
        store.clear_calls();

        let edited = service
            .update_match(
                created.game.id,
                &request(
                    vec![entry(&players[2], Team::One, "Romans"), entry(&players[1], Team::Two, "Mongols")],
                    Some(Team::One),
                ),
            )
            .await
            .unwrap();

        assert_eq!(
            store.calls(),
            vec![
                StoreOperation::ListPlayers,
                StoreOperation::GetMatch,
                StoreOperation::UpdateMatch,
                StoreOperation::DeleteParticipants,
                StoreOperation::InsertParticipants,
            ]
        );
        let stored = store.get_participants(created.game.id).await.unwrap();
        assert_eq!(stored, edited.participants);
        assert!(stored.iter().all(|p| p.player_id != players[0].id));
        assert_eq!(store.get_match(created.game.id).await.unwrap().unwrap().winner_team, Team::One);
    }

    #[tokio::test]
    async fn single_player_match_is_rejected_on_create_but_editable() {
        let store = InMemoryStore::new();
        let players = seed_players(&store, &["Sitaux", "Dogao"]).await;
        let service = MatchService::new(&store);
        let solo = request(vec![entry(&players[0], Team::One, "Aztecs")], Some(Team::One));

        let created = service.create_match(&solo).await;
        assert!(matches!(created, Err(MatchServiceError::Validation(DraftError::TooFewParticipants(1)))));

        let stored = service
            .create_match(&request(
                vec![entry(&players[0], Team::One, "Aztecs"), entry(&players[1], Team::Two, "Incas")],
                Some(Team::One),
            ))
            .await
            .unwrap();
        let edited = service.update_match(stored.game.id, &solo).await.unwrap();
        assert_eq!(edited.participants.len(), 1);
        assert!(edited.participants[0].is_winner);

        let empty = service.update_match(stored.game.id, &request(vec![], Some(Team::One))).await;
        assert!(matches!(empty, Err(MatchServiceError::Validation(DraftError::WinnerTeamEmpty(Team::One)))));
    }

    #[tokio::test]
    async fn failed_participant_insert_leaves_empty_match() {
        let store = InMemoryStore::new();
        let players = seed_players(&store, &["Chino", "Ruso"]).await;
        store.fail_on(StoreOperation::InsertParticipants);

        let result = MatchService::new(&store)
            .create_match(&request(
                vec![entry(&players[0], Team::One, "Vikings"), entry(&players[1], Team::Two, "Japanese")],
                Some(Team::One),
            ))
            .await;

        match result {
            Err(MatchServiceError::Storage { step, .. }) => assert_eq!(step, SaveStep::InsertParticipants),
            other => panic!("expected storage error, got {:?}", other),
        }
        let matches = store.list_matches(None).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert!(matches[0].participants.is_empty());
    }

    #[tokio::test]
    async fn unknown_player_and_map_are_rejected_before_writing() {
        let store = InMemoryStore::new();
        let players = seed_players(&store, &["Fran"]).await;
        let ghost = Player { id: Uuid::new_v4(), ..players[0].clone() };
        let service = MatchService::new(&store);

        let unknown_player = service
            .create_match(&request(
                vec![entry(&players[0], Team::One, "Franks"), entry(&ghost, Team::Two, "Huns")],
                Some(Team::One),
            ))
            .await;
        let mut bad_map = request(
            vec![entry(&players[0], Team::One, "Franks"), entry(&ghost, Team::Two, "Huns")],
            Some(Team::One),
        );
        bad_map.map_name = "Atlantis".into();
        let unknown_map = service.create_match(&bad_map).await;

        assert!(matches!(unknown_player, Err(MatchServiceError::Validation(DraftError::UnknownPlayer(id))) if id == ghost.id));
        assert!(matches!(unknown_map, Err(MatchServiceError::InvalidMatch(_))));
        assert_eq!(store.count_matches().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn editing_missing_match_is_not_found() {
        let store = InMemoryStore::new();
        let service = MatchService::new(&store);

        let missing = Uuid::new_v4();
        assert!(matches!(service.load_editor(missing).await, Err(MatchServiceError::NotFound(id)) if id == missing));
        assert!(matches!(service.delete_match(missing).await, Err(MatchServiceError::NotFound(_))));
    }
}
