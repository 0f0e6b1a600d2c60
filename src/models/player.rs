// src/models/player.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Rating every new player starts with
pub const DEFAULT_ELO_RATING: i32 = 1000;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlayerColor {
    #[default]
    Blue,
    Red,
    Green,
    Yellow,
    Cyan,
    Purple,
    Gray,
    Orange,
}

impl PlayerColor {
    pub const ALL: [PlayerColor; 8] = [
        PlayerColor::Blue,
        PlayerColor::Red,
        PlayerColor::Green,
        PlayerColor::Yellow,
        PlayerColor::Cyan,
        PlayerColor::Purple,
        PlayerColor::Gray,
        PlayerColor::Orange,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerColor::Blue => "Blue",
            PlayerColor::Red => "Red",
            PlayerColor::Green => "Green",
            PlayerColor::Yellow => "Yellow",
            PlayerColor::Cyan => "Cyan",
            PlayerColor::Purple => "Purple",
            PlayerColor::Gray => "Gray",
            PlayerColor::Orange => "Orange",
        }
    }
}

impl FromStr for PlayerColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlayerColor::ALL
            .iter()
            .copied()
            .find(|color| color.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("{} is not a known player color", s))
    }
}

impl fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    pub nickname: Option<String>,
    pub steam_id: Option<String>,
    pub preferred_color: Option<PlayerColor>,
    pub avatar_url: Option<String>,
    pub total_matches: i32,
    pub total_wins: i32,
    pub elo_rating: i32,
    pub created_at: DateTime<Utc>,
}

impl Player {
    pub fn summary(&self) -> PlayerSummary {
        PlayerSummary {
            id: self.id,
            name: self.name.clone(),
            nickname: self.nickname.clone(),
            avatar_url: self.avatar_url.clone(),
        }
    }
}

/// The slice of a player embedded in match listings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PlayerSummary {
    pub id: Uuid,
    pub name: String,
    pub nickname: Option<String>,
    pub avatar_url: Option<String>,
}

/// Body of both the create and the update player endpoints
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlayerRequest {
    pub name: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub steam_id: Option<String>,
    #[serde(default)]
    pub preferred_color: Option<PlayerColor>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl PlayerRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Player name is required".to_string());
        }
        if self.name.trim().len() > 100 {
            return Err("Player name too long (maximum 100 characters)".to_string());
        }
        Ok(())
    }

    /// Trims text fields, turns blank optionals into `None` and applies the default color
    pub fn normalized(&self) -> Self {
        let clean = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        Self {
            name: self.name.trim().to_string(),
            nickname: clean(&self.nickname),
            steam_id: clean(&self.steam_id),
            preferred_color: Some(self.preferred_color.unwrap_or_default()),
            avatar_url: clean(&self.avatar_url),
        }
    }
}
