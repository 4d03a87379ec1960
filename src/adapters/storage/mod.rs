pub mod memory;
pub mod postgres;

pub use memory::MemoryRegistrantStore;
pub use postgres::PostgresRegistrantStore;
