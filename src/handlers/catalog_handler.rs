use actix_web::HttpResponse;

use crate::models::catalog::{CIVILIZATIONS, MAPS};
use crate::models::common::ApiResponse;

pub async fn list_civilizations() -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success("Civilizations retrieved", CIVILIZATIONS))
}

pub async fn list_maps() -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success("Maps retrieved", MAPS))
}
