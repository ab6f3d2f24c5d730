pub mod memory;
pub mod postgres;

pub use memory::MemoryCatalog;
pub use postgres::{PostgresImageRepository, PostgresTargetRepository};
