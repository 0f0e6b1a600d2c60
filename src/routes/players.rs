// src/routes/players.rs
use actix_web::{get, web, HttpResponse, Result};
use uuid::Uuid;

use crate::db::store::MatchStore;
use crate::handlers::player_handler;

#[get("/players")]
async fn get_players(
    store: web::Data<dyn MatchStore>,
) -> Result<HttpResponse> {
    player_handler::list_players(store).await
}

/// Profile with win rate, favorite civilization and match history
#[get("/players/{player_id}")]
async fn get_player(
    path: web::Path<Uuid>,
    store: web::Data<dyn MatchStore>,
) -> Result<HttpResponse> {
    player_handler::get_player_profile(store, path).await
}
