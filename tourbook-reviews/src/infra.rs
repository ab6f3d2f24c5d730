pub mod memory;
pub mod postgres;

pub use memory::MemoryReviewRepository;
pub use postgres::PostgresReviewRepository;
