use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::draft::validation::{DraftError, DraftValidator};
use crate::models::common::Team;
use crate::models::participant::{DraftParticipant, ParticipantRecord};
use crate::models::player::{Player, PlayerColor};

/// What a call to [`ParticipantDraft::toggle_player`] did
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ToggleOutcome {
    Added,
    Removed,
    Moved,
}

/// Editable per-match field of a draft entry
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum ParticipantField {
    Civilization(String),
    #[serde(rename = "player_color")]
    Color(PlayerColor),
}

/// Wire form of a draft
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct DraftState {
    #[serde(default)]
    pub participants: Vec<DraftParticipant>,
    #[serde(default)]
    pub active_team: Team,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(try_from = "DraftState", into = "DraftState")]
pub struct ParticipantDraft {
    entries: Vec<DraftParticipant>,
    active_team: Team,
}

impl ParticipantDraft {
    /// An empty draft targeting team 1
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a draft from a submitted list, refusing repeated players
    pub fn from_entries(entries: Vec<DraftParticipant>) -> Result<Self, DraftError> {
        DraftValidator::new().validate_unique_players(&entries)?;
        Ok(Self {
            entries,
            active_team: Team::One,
        })
    }

    /// Builds the editor draft for an existing match from its stored participants
    pub fn hydrate(records: &[ParticipantRecord]) -> Self {
        let mut draft = Self::new();
        for record in records {
            if draft.position(record.player_id).is_none() {
                draft.entries.push(DraftParticipant::from(record));
            }
        }
        draft
    }

    pub fn entries(&self) -> &[DraftParticipant] {
        &self.entries
    }

    pub fn active_team(&self) -> Team {
        self.active_team
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, player_id: Uuid) -> Option<&DraftParticipant> {
        self.entries.iter().find(|e| e.player_id == player_id)
    }

    pub fn team(&self, team: Team) -> impl Iterator<Item = &DraftParticipant> {
        self.entries.iter().filter(move |e| e.team == team)
    }

    fn position(&self, player_id: Uuid) -> Option<usize> {
        self.entries.iter().position(|e| e.player_id == player_id)
    }

    /// Click on a player in the roster.
    ///
    /// Adds the player to the active team, removes them if they already sit on
    /// the active team, or moves them over from the other team keeping their
    /// civilization and color. `roster` supplies the preferred color for new
    /// entries; players missing from it get blue.
    pub fn toggle_player(&mut self, player_id: Uuid, roster: &[Player]) -> ToggleOutcome {
        match self.position(player_id) {
            Some(index) if self.entries[index].team == self.active_team => {
                self.entries.remove(index);
                ToggleOutcome::Removed
            }
            Some(index) => {
                self.entries[index].team = self.active_team;
                ToggleOutcome::Moved
            }
            None => {
                let player_color = roster
                    .iter()
                    .find(|p| p.id == player_id)
                    .and_then(|p| p.preferred_color)
                    .unwrap_or_default();
                self.entries.push(DraftParticipant {
                    player_id,
                    team: self.active_team,
                    civilization: String::new(),
                    player_color,
                });
                ToggleOutcome::Added
            }
        }
    }

    /// Replaces one field of a player's entry. Returns `false` when the player has no entry.
    pub fn update_participant(&mut self, player_id: Uuid, field: ParticipantField) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.player_id == player_id) else {
            return false;
        };
        match field {
            ParticipantField::Civilization(civilization) => entry.civilization = civilization,
            ParticipantField::Color(color) => entry.player_color = color,
        }
        true
    }

    /// Chooses the team future toggles add players to. Existing entries stay where they are.
    pub fn set_active_team(&mut self, team: Team) {
        self.active_team = team;
    }

    pub fn validate(&self, winner_team: Option<Team>) -> Result<Team, DraftError> {
        self.validate_with(&DraftValidator::new(), winner_team)
    }

    pub fn validate_with(
        &self,
        validator: &DraftValidator,
        winner_team: Option<Team>,
    ) -> Result<Team, DraftError> {
        validator.validate(&self.entries, winner_team)
    }

    /// Validates the draft and produces the rows to store for `match_id`
    pub fn commit(
        &self,
        winner_team: Option<Team>,
        match_id: Uuid,
    ) -> Result<Vec<ParticipantRecord>, DraftError> {
        self.commit_with(&DraftValidator::new(), winner_team, match_id)
    }

    pub fn commit_with(
        &self,
        validator: &DraftValidator,
        winner_team: Option<Team>,
        match_id: Uuid,
    ) -> Result<Vec<ParticipantRecord>, DraftError> {
        let winner = self.validate_with(validator, winner_team)?;
        Ok(self
            .entries
            .iter()
            .map(|entry| ParticipantRecord {
                match_id,
                player_id: entry.player_id,
                team: entry.team,
                civilization: entry.civilization.trim().to_string(),
                player_color: entry.player_color,
                is_winner: entry.team == winner,
            })
            .collect())
    }
}

impl TryFrom<DraftState> for ParticipantDraft {
    type Error = DraftError;

    fn try_from(state: DraftState) -> Result<Self, Self::Error> {
        let mut draft = Self::from_entries(state.participants)?;
        draft.active_team = state.active_team;
        Ok(draft)
    }
}

impl From<ParticipantDraft> for DraftState {
    fn from(draft: ParticipantDraft) -> Self {
        DraftState {
            participants: draft.entries,
            active_team: draft.active_team,
        }
    }
}
