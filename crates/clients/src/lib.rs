#[cfg(feature = "postgres")]
mod postgres;
mod memory;

#[cfg(feature = "postgres")]
pub use postgres::{PostgresClient, PostgresPartyStore};
pub use memory::MemoryPartyStore;
