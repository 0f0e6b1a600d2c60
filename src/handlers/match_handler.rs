use actix_web::{web, HttpResponse, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::jwt::Claims;
use crate::db::store::{MatchStore, PlayerOrder};
use crate::draft::{DraftError, ParticipantDraft, ToggleOutcome};
use crate::models::common::{ApiResponse, Team};
use crate::models::matches::MatchRequest;
use crate::services::match_service::{MatchService, MatchServiceError};

#[derive(Debug, Deserialize)]
pub struct MatchQueryParams {
    pub limit: Option<i64>,
}

/// One click on a roster entry of the match editor
#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    #[serde(default)]
    pub draft: ParticipantDraft,
    pub player_id: Uuid,
    /// Switches the target team before toggling
    #[serde(default)]
    pub active_team: Option<Team>,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub outcome: ToggleOutcome,
    pub draft: ParticipantDraft,
}

fn service_error_response(error: &MatchServiceError) -> HttpResponse {
    match error {
        MatchServiceError::Validation(_) | MatchServiceError::InvalidMatch(_) => {
            tracing::warn!("Rejected match: {}", error);
            HttpResponse::BadRequest().json(ApiResponse::<()>::error(error.to_string()))
        }
        MatchServiceError::NotFound(_) => {
            HttpResponse::NotFound().json(ApiResponse::<()>::error(error.to_string()))
        }
        MatchServiceError::Storage { .. } => {
            tracing::error!("Match save failed: {}", error);
            HttpResponse::InternalServerError().json(ApiResponse::<()>::error_with_message(
                "Failed to save match",
                error.to_string(),
            ))
        }
    }
}

// GET /matches - Newest first, with participants
#[tracing::instrument(name = "List matches", skip(store, query))]
pub async fn list_matches(
    store: web::Data<dyn MatchStore>,
    query: web::Query<MatchQueryParams>,
) -> Result<HttpResponse> {
    let limit = query.limit.map(|l| l.clamp(1, 500));
    match store.list_matches(limit).await {
        Ok(matches) => Ok(HttpResponse::Ok().json(ApiResponse::success("Matches retrieved", matches))),
        Err(e) => {
            tracing::error!("Failed to fetch matches: {}", e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error("Failed to fetch matches")))
        }
    }
}

// POST /admin/matches
#[tracing::instrument(
    name = "Admin create match",
    skip(store, body, claims),
    fields(admin = %claims.email)
)]
pub async fn create_match(
    store: web::Data<dyn MatchStore>,
    body: web::Json<MatchRequest>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    match MatchService::new(store.get_ref()).create_match(&body).await {
        Ok(saved) => Ok(HttpResponse::Created().json(ApiResponse::success("Match created successfully", saved))),
        Err(e) => Ok(service_error_response(&e)),
    }
}

// GET /admin/matches/{id}/draft - Hydrates the edit screen
#[tracing::instrument(name = "Load match editor", skip(store), fields(match_id = %match_id))]
pub async fn get_match_draft(
    store: web::Data<dyn MatchStore>,
    match_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match MatchService::new(store.get_ref()).load_editor(*match_id).await {
        Ok(editor) => Ok(HttpResponse::Ok().json(ApiResponse::success("Match retrieved", editor))),
        Err(e) => Ok(service_error_response(&e)),
    }
}

// PUT /admin/matches/{id}
#[tracing::instrument(
    name = "Admin update match",
    skip(store, body, claims),
    fields(match_id = %match_id, admin = %claims.email)
)]
pub async fn update_match(
    store: web::Data<dyn MatchStore>,
    match_id: web::Path<Uuid>,
    body: web::Json<MatchRequest>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    match MatchService::new(store.get_ref()).update_match(*match_id, &body).await {
        Ok(saved) => Ok(HttpResponse::Ok().json(ApiResponse::success("Match updated successfully", saved))),
        Err(e) => Ok(service_error_response(&e)),
    }
}

// DELETE /admin/matches/{id}
#[tracing::instrument(name = "Admin delete match", skip(store), fields(match_id = %match_id))]
pub async fn delete_match(
    store: web::Data<dyn MatchStore>,
    match_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match MatchService::new(store.get_ref()).delete_match(*match_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_message("Match deleted successfully"))),
        Err(e) => Ok(service_error_response(&e)),
    }
}

// POST /admin/drafts/toggle - Applies one toggle to the submitted draft
#[tracing::instrument(name = "Toggle draft player", skip(store, body), fields(player_id = %body.player_id))]
pub async fn toggle_draft_player(
    store: web::Data<dyn MatchStore>,
    body: web::Json<ToggleRequest>,
) -> Result<HttpResponse> {
    let ToggleRequest { mut draft, player_id, active_team } = body.into_inner();

    let roster = match store.list_players(PlayerOrder::Name).await {
        Ok(players) => players,
        Err(e) => {
            tracing::error!("Failed to fetch players: {}", e);
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error("Failed to fetch players")));
        }
    };

    // Entries of deleted players can still be removed or moved
    if draft.get(player_id).is_none() && !roster.iter().any(|p| p.id == player_id) {
        let error = DraftError::UnknownPlayer(player_id);
        return Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::error(error.to_string())));
    }

    if let Some(team) = active_team {
        draft.set_active_team(team);
    }
    let outcome = draft.toggle_player(player_id, &roster);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Draft updated",
        ToggleResponse { outcome, draft },
    )))
}
