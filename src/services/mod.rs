pub mod match_service;
pub mod stats;

pub use match_service::{MatchService, MatchServiceError};
pub use stats::StatsService;
