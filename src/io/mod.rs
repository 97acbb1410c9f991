pub mod csv_export;
pub mod storage;

pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
