//! Persistence substrates implementing [`KeyValueStorage`].
//!
//! [`KeyValueStorage`]: sundenbock_core::storage::KeyValueStorage

mod atomic_json;
mod browser;
mod file_storage;

pub use atomic_json::AtomicJsonFile;
pub use browser::{BrowserOrigin, BrowserTab};
pub use file_storage::FileBackedStorage;
