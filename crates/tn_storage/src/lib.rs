pub mod backends;

pub use backends::memory::MemoryStore;
pub use backends::postgres::PostgresStore;
