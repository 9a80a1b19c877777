//! Animove Core Library
//!
//! This crate provides the domain models, error types and configuration shared
//! by the storage, synthesis and API crates.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, OssConfig, RelayConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
// Note: Storage, StorageError, StorageResult live in the animove-storage crate
