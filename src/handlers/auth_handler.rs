// src/handlers/auth_handler.rs
use actix_web::{web, HttpResponse};
use secrecy::ExposeSecret;

use crate::auth::jwt::generate_token;
use crate::config::jwt::JwtSettings;
use crate::db::store::MatchStore;
use crate::models::auth::{LoginRequest, LoginResponse};
use crate::utils::password::verify_password;

#[tracing::instrument(
    name = "Login admin attempt",
    skip(login_form, store, jwt_settings),
    fields(
        email = %login_form.email
    )
)]
pub async fn login_admin(
    login_form: web::Json<LoginRequest>,
    store: web::Data<dyn MatchStore>,
    jwt_settings: web::Data<JwtSettings>
) -> HttpResponse {
    let admin = match store.find_admin_by_email(login_form.email.trim()).await {
        Ok(Some(admin)) => admin,
        Ok(None) => {
            tracing::info!("Admin not found or invalid credentials");
            return HttpResponse::Unauthorized().finish();
        }
        Err(e) => {
            tracing::error!("Database error occurred: {:?}", e);
            return HttpResponse::InternalServerError().finish();
        }
    };

    if !verify_password(
        login_form.password.expose_secret(),
        admin.password_hash.expose_secret()
    ) {
        tracing::info!("Invalid password");
        return HttpResponse::Unauthorized().finish();
    }

    let token = match generate_token(&admin, jwt_settings.get_ref()) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!("Error generating JWT token: {:?}", e);
            return HttpResponse::InternalServerError().finish();
        }
    };

    HttpResponse::Ok().json(LoginResponse { token })
}
