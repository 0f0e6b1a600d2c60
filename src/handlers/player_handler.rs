use actix_web::{web, HttpResponse, Result};
use uuid::Uuid;

use crate::db::store::{MatchStore, PlayerOrder};
use crate::models::common::ApiResponse;
use crate::models::player::PlayerRequest;
use crate::services::stats::StatsService;

// GET /players - Most wins first, then by name
#[tracing::instrument(name = "List players", skip(store))]
pub async fn list_players(store: web::Data<dyn MatchStore>) -> Result<HttpResponse> {
    match store.list_players(PlayerOrder::Wins).await {
        Ok(players) => Ok(HttpResponse::Ok().json(ApiResponse::success("Players retrieved", players))),
        Err(e) => {
            tracing::error!("Failed to fetch players: {}", e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error("Failed to fetch players")))
        }
    }
}

// GET /players/{id} - Player with aggregated stats and match history
#[tracing::instrument(name = "Get player profile", skip(store), fields(player_id = %player_id))]
pub async fn get_player_profile(
    store: web::Data<dyn MatchStore>,
    player_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let player_id = player_id.into_inner();
    match StatsService::new(store.get_ref()).player_profile(player_id).await {
        Ok(Some(profile)) => Ok(HttpResponse::Ok().json(ApiResponse::success("Player retrieved", profile))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("Player not found"))),
        Err(e) => {
            tracing::error!("Failed to load profile of player {}: {}", player_id, e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error("Failed to fetch player")))
        }
    }
}

// POST /admin/players
#[tracing::instrument(name = "Create player", skip(store, body), fields(name = %body.name))]
pub async fn create_player(
    store: web::Data<dyn MatchStore>,
    body: web::Json<PlayerRequest>,
) -> Result<HttpResponse> {
    if let Err(message) = body.validate() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::error(message)));
    }

    match store.insert_player(&body.normalized()).await {
        Ok(player) => {
            tracing::info!("Created player {} ({})", player.name, player.id);
            Ok(HttpResponse::Created().json(ApiResponse::success("Player created successfully", player)))
        }
        Err(e) => {
            tracing::error!("Failed to create player: {}", e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error_with_message(
                "Failed to create player",
                e.to_string(),
            )))
        }
    }
}

// PUT /admin/players/{id}
#[tracing::instrument(name = "Update player", skip(store, body), fields(player_id = %player_id))]
pub async fn update_player(
    store: web::Data<dyn MatchStore>,
    player_id: web::Path<Uuid>,
    body: web::Json<PlayerRequest>,
) -> Result<HttpResponse> {
    if let Err(message) = body.validate() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::error(message)));
    }

    match store.update_player(*player_id, &body.normalized()).await {
        Ok(Some(player)) => Ok(HttpResponse::Ok().json(ApiResponse::success("Player updated successfully", player))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("Player not found"))),
        Err(e) => {
            tracing::error!("Failed to update player: {}", e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error_with_message(
                "Failed to update player",
                e.to_string(),
            )))
        }
    }
}

// DELETE /admin/players/{id} - Also removes the player's participations
#[tracing::instrument(name = "Delete player", skip(store), fields(player_id = %player_id))]
pub async fn delete_player(
    store: web::Data<dyn MatchStore>,
    player_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match store.delete_player(*player_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_message("Player deleted successfully"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("Player not found"))),
        Err(e) => {
            tracing::error!("Failed to delete player: {}", e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error("Failed to delete player")))
        }
    }
}
