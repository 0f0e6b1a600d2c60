use actix_web::web;

pub mod admin;
pub mod auth;
pub mod backend_health;
pub mod catalog;
pub mod matches;
pub mod players;
pub mod stats;

use crate::routes::admin::init_admin_routes;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(backend_health::backend_health)
        .service(auth::login);

    // Public read-only screens
    cfg.service(players::get_players)
        .service(players::get_player)
        .service(matches::get_matches)
        .service(stats::get_ranking)
        .service(stats::get_summary)
        .service(catalog::get_civilizations)
        .service(catalog::get_maps);

    init_admin_routes(cfg);
}
