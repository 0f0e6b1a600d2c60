use actix_web::{web, HttpResponse, Result};

use crate::db::store::MatchStore;
use crate::models::common::ApiResponse;
use crate::services::stats::StatsService;

/// Matches shown on the dashboard
pub const RECENT_MATCHES: i64 = 5;

// GET /ranking - Wins first, ELO breaks ties
#[tracing::instrument(name = "Get ranking", skip(store))]
pub async fn get_ranking(store: web::Data<dyn MatchStore>) -> Result<HttpResponse> {
    match StatsService::new(store.get_ref()).ranking().await {
        Ok(ranking) => Ok(HttpResponse::Ok().json(ApiResponse::success("Ranking retrieved", ranking))),
        Err(e) => {
            tracing::error!("Failed to build ranking: {}", e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error("Failed to fetch ranking")))
        }
    }
}

// GET /summary
#[tracing::instrument(name = "Get dashboard summary", skip(store))]
pub async fn get_summary(store: web::Data<dyn MatchStore>) -> Result<HttpResponse> {
    match StatsService::new(store.get_ref()).summary(RECENT_MATCHES).await {
        Ok(summary) => Ok(HttpResponse::Ok().json(ApiResponse::success("Summary retrieved", summary))),
        Err(e) => {
            tracing::error!("Failed to build summary: {}", e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error("Failed to fetch summary")))
        }
    }
}
