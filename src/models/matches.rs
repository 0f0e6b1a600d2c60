// src/models/matches.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::models::common::Team;
use crate::models::participant::{DraftParticipant, ParticipantView};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    #[default]
    #[serde(rename = "1v1")]
    OneVsOne,
    #[serde(rename = "2v2")]
    TwoVsTwo,
    #[serde(rename = "3v3")]
    ThreeVsThree,
    #[serde(rename = "4v4")]
    FourVsFour,
    #[serde(rename = "FFA")]
    FreeForAll,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::OneVsOne => "1v1",
            GameMode::TwoVsTwo => "2v2",
            GameMode::ThreeVsThree => "3v3",
            GameMode::FourVsFour => "4v4",
            GameMode::FreeForAll => "FFA",
        }
    }
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1v1" => Ok(GameMode::OneVsOne),
            "2v2" => Ok(GameMode::TwoVsTwo),
            "3v3" => Ok(GameMode::ThreeVsThree),
            "4v4" => Ok(GameMode::FourVsFour),
            "ffa" => Ok(GameMode::FreeForAll),
            other => Err(format!("{} is not a supported game mode", other)),
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Match {
    pub id: Uuid,
    pub played_at: DateTime<Utc>,
    pub map_name: String,
    pub game_mode: GameMode,
    pub duration_minutes: Option<i32>,
    pub winner_team: Team,
}

/// Scalar columns written by both the create and the edit flow
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MatchFields {
    pub played_at: DateTime<Utc>,
    pub map_name: String,
    pub game_mode: GameMode,
    pub duration_minutes: Option<i32>,
    pub winner_team: Team,
}

impl MatchFields {
    pub fn into_match(self, id: Uuid) -> Match {
        Match {
            id,
            played_at: self.played_at,
            map_name: self.map_name,
            game_mode: self.game_mode,
            duration_minutes: self.duration_minutes,
            winner_team: self.winner_team,
        }
    }
}

/// Body of the create and edit match endpoints: the match form plus the submitted draft
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MatchRequest {
    pub map_name: String,
    #[serde(default)]
    pub game_mode: GameMode,
    #[serde(default)]
    pub played_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
    #[serde(default)]
    pub winner_team: Option<Team>,
    #[serde(default)]
    pub participants: Vec<DraftParticipant>,
}

impl fmt::Display for MatchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "map: {}, mode: {}, winner: {:?}, participants: {}",
            self.map_name,
            self.game_mode,
            self.winner_team.map(|t| t.number()),
            self.participants.len()
        )
    }
}

/// A match as rendered by the listing screens
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MatchWithParticipants {
    #[serde(flatten)]
    pub game: Match,
    pub participants: Vec<ParticipantView>,
}
