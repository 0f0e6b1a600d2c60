pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::{InMemoryStore, StoreOperation};
pub use postgres::PgMatchStore;
pub use store::{MatchStore, PlayerOrder, StoreError};
