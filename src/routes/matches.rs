// src/routes/matches.rs
use actix_web::{get, web, HttpResponse, Result};

use crate::db::store::MatchStore;
use crate::handlers::match_handler::{self, MatchQueryParams};

#[get("/matches")]
async fn get_matches(
    query: web::Query<MatchQueryParams>,
    store: web::Data<dyn MatchStore>,
) -> Result<HttpResponse> {
    match_handler::list_matches(store, query).await
}
