use actix_web::web;

use crate::handlers::{match_handler, player_handler};
use crate::middleware::auth::AuthMiddleware;

pub fn init_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .wrap(AuthMiddleware)
            // Roster management
            .service(
                web::resource("/players")
                    .route(web::post().to(player_handler::create_player))
            )
            .service(
                web::resource("/players/{id}")
                    .route(web::put().to(player_handler::update_player))
                    .route(web::delete().to(player_handler::delete_player))
            )

            // Match save flows
            .service(
                web::resource("/matches")
                    .route(web::post().to(match_handler::create_match))
            )
            .service(
                web::resource("/matches/{id}")
                    .route(web::put().to(match_handler::update_match))
                    .route(web::delete().to(match_handler::delete_match))
            )
            .service(
                web::resource("/matches/{id}/draft")
                    .route(web::get().to(match_handler::get_match_draft))
            )
            .service(
                web::resource("/drafts/toggle")
                    .route(web::post().to(match_handler::toggle_draft_player))
            )
    );
}
