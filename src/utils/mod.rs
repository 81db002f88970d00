// Utils compartidos

pub mod constants;
pub mod storage;

pub use constants::*;
pub use storage::{load_json, save_json, BrowserStorage, MemoryStorage, StorageBackend};
