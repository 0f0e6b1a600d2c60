// src/routes/auth.rs
use actix_web::{post, web, HttpResponse};

use crate::config::jwt::JwtSettings;
use crate::db::store::MatchStore;
use crate::handlers::auth_handler::login_admin;
use crate::models::auth::LoginRequest;

#[post("/login")]
async fn login(
    login_form: web::Json<LoginRequest>,
    store: web::Data<dyn MatchStore>,
    jwt_settings: web::Data<JwtSettings>
) -> HttpResponse {
    login_admin(login_form, store, jwt_settings).await
}
