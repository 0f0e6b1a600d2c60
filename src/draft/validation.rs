use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

use crate::models::common::Team;
use crate::models::participant::DraftParticipant;

/// Fewest players a match can be saved with
pub const MIN_PARTICIPANTS: usize = 2;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("Select the winning team")]
    MissingWinner,

    #[error("Select at least {min} players, got {0}", min = MIN_PARTICIPANTS)]
    TooFewParticipants(usize),

    #[error("Every player needs a civilization assigned (missing for player {0})")]
    MissingCivilization(Uuid),

    #[error("Team {0} is marked as winner but has no players")]
    WinnerTeamEmpty(Team),

    #[error("Player {0} appears more than once")]
    DuplicatePlayer(Uuid),

    #[error("Player {0} does not exist")]
    UnknownPlayer(Uuid),
}

/// Save-time checks for a participant draft
pub struct DraftValidator {
    min_participants: usize,
}

impl DraftValidator {
    /// Checks for a new match
    pub fn new() -> Self {
        Self { min_participants: MIN_PARTICIPANTS }
    }

    /// Checks for re-saving a stored match. Matches recorded with a single
    /// player stay editable, the winner team must still have someone on it.
    pub fn for_stored_match() -> Self {
        Self { min_participants: 0 }
    }

    /// Runs every check in the order the editor reports them and returns the winner on success
    pub fn validate(
        &self,
        entries: &[DraftParticipant],
        winner_team: Option<Team>,
    ) -> Result<Team, DraftError> {
        let winner = winner_team.ok_or(DraftError::MissingWinner)?;
        self.validate_participant_count(entries)?;
        self.validate_unique_players(entries)?;
        self.validate_civilizations(entries)?;
        self.validate_winner_present(entries, winner)?;
        Ok(winner)
    }

    pub fn validate_participant_count(&self, entries: &[DraftParticipant]) -> Result<(), DraftError> {
        if entries.len() < self.min_participants {
            return Err(DraftError::TooFewParticipants(entries.len()));
        }
        Ok(())
    }

    pub fn validate_unique_players(&self, entries: &[DraftParticipant]) -> Result<(), DraftError> {
        let mut seen = HashSet::new();
        for entry in entries {
            if !seen.insert(entry.player_id) {
                return Err(DraftError::DuplicatePlayer(entry.player_id));
            }
        }
        Ok(())
    }

    pub fn validate_civilizations(&self, entries: &[DraftParticipant]) -> Result<(), DraftError> {
        match entries.iter().find(|e| e.civilization.trim().is_empty()) {
            Some(entry) => Err(DraftError::MissingCivilization(entry.player_id)),
            None => Ok(()),
        }
    }

    pub fn validate_winner_present(
        &self,
        entries: &[DraftParticipant],
        winner: Team,
    ) -> Result<(), DraftError> {
        if entries.iter().any(|e| e.team == winner) {
            Ok(())
        } else {
            Err(DraftError::WinnerTeamEmpty(winner))
        }
    }
}

impl Default for DraftValidator {
    fn default() -> Self {
        Self::new()
    }
}
