use actix_web::{get, HttpResponse};

use crate::handlers::catalog_handler;

/// Civilization wiki
#[get("/civilizations")]
async fn get_civilizations() -> HttpResponse {
    catalog_handler::list_civilizations().await
}

#[get("/maps")]
async fn get_maps() -> HttpResponse {
    catalog_handler::list_maps().await
}
