use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Generic API response wrapper used across all handlers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response with data
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }

    /// Create a successful response without data
    pub fn success_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            error: None,
        }
    }

    /// Create an error response
    pub fn error(message: impl Into<String>) -> Self {
        let msg = message.into();
        Self {
            success: false,
            message: msg.clone(),
            data: None,
            error: Some(msg),
        }
    }

    /// Create an error response with custom error message
    pub fn error_with_message(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error: Some(error.into()),
        }
    }
}

/// One of the two sides of a match. Serialized as the plain integer `1` or `2`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(try_from = "i16", into = "i16")]
pub enum Team {
    #[default]
    One,
    Two,
}

impl Team {
    pub fn number(self) -> i16 {
        match self {
            Team::One => 1,
            Team::Two => 2,
        }
    }
}

impl TryFrom<i16> for Team {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Team::One),
            2 => Ok(Team::Two),
            other => Err(format!("{} is not a valid team, expected 1 or 2", other)),
        }
    }
}

impl From<Team> for i16 {
    fn from(team: Team) -> Self {
        team.number()
    }
}

impl Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Team::Two).unwrap(), "2");
        let team: Team = serde_json::from_str("1").unwrap();
        assert_eq!(team, Team::One);
    }

    #[test]
    fn team_rejects_out_of_range_values() {
        assert!(serde_json::from_str::<Team>("3").is_err());
        assert!(serde_json::from_str::<Team>("0").is_err());
    }
}
