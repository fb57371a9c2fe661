pub mod file_store;
pub mod memory_store;
pub mod pg_store;
pub mod pool;
pub mod store;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use pg_store::PgStore;
pub use store::{load_json, save_json, KeyValueStore};
