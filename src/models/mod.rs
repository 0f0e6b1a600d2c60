pub mod auth;
pub mod catalog;
pub mod common;
pub mod matches;
pub mod participant;
pub mod player;
