//! Participant draft: the editable list of (player, team, civilization, color)
//! assignments behind the match create and edit screens.
//!
//! The draft is a plain value owned by the caller. Every operation is a
//! synchronous state transition on that value; nothing here touches storage.
//! [`ParticipantDraft::commit`] turns a valid draft into the rows the save flow
//! writes.

mod reconciler;
mod validation;

pub use reconciler::{DraftState, ParticipantDraft, ParticipantField, ToggleOutcome};
pub use validation::{DraftError, DraftValidator, MIN_PARTICIPANTS};
