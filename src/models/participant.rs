// src/models/participant.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::common::Team;
use crate::models::player::{PlayerColor, PlayerSummary};

/// One entry of the in-memory participant draft
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DraftParticipant {
    pub player_id: Uuid,
    pub team: Team,
    #[serde(default)]
    pub civilization: String,
    #[serde(default)]
    pub player_color: PlayerColor,
}

/// A participant row as written to `match_participants`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ParticipantRecord {
    pub match_id: Uuid,
    pub player_id: Uuid,
    pub team: Team,
    pub civilization: String,
    pub player_color: PlayerColor,
    pub is_winner: bool,
}

impl From<&ParticipantRecord> for DraftParticipant {
    fn from(record: &ParticipantRecord) -> Self {
        DraftParticipant {
            player_id: record.player_id,
            team: record.team,
            civilization: record.civilization.clone(),
            player_color: record.player_color,
        }
    }
}

/// A participant joined with the player it refers to
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ParticipantView {
    pub team: Team,
    pub civilization: String,
    pub player_color: PlayerColor,
    pub is_winner: bool,
    pub player: PlayerSummary,
}
