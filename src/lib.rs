pub mod app;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod export;
pub mod handlers;
pub mod log_store;
pub mod models;
pub mod proof;
pub mod stats;
pub mod storage;
pub mod ui;
pub mod state;

pub use app::router;
pub use catalog::{Catalog, TaskDefinition};
pub use config::AppConfig;
pub use errors::LogError;
pub use log_store::LogStore;
pub use state::AppState;
pub use storage::{FileBackend, MemoryBackend, StorageBackend, STORAGE_KEY};
