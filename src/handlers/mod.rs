pub mod auth_handler;
pub mod backend_health_handler;
pub mod catalog_handler;
pub mod match_handler;
pub mod player_handler;
pub mod stats_handler;
