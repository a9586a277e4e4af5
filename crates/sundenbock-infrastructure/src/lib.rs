pub mod client;
pub mod dto;
pub mod jwt;
pub mod storage;
pub mod token_store;

pub use crate::storage::{BrowserOrigin, BrowserTab, FileBackedStorage};
pub use crate::token_store::TokenStore;
