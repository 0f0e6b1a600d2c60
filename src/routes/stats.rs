// src/routes/stats.rs
use actix_web::{get, web, HttpResponse, Result};

use crate::db::store::MatchStore;
use crate::handlers::stats_handler;

/// Ranking table with the podium
#[get("/ranking")]
async fn get_ranking(
    store: web::Data<dyn MatchStore>,
) -> Result<HttpResponse> {
    stats_handler::get_ranking(store).await
}

/// Dashboard counters and latest matches
#[get("/summary")]
async fn get_summary(
    store: web::Data<dyn MatchStore>,
) -> Result<HttpResponse> {
    stats_handler::get_summary(store).await
}
