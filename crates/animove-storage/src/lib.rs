//! Animove Storage Library
//!
//! Storage for uploaded media and downloaded results.
//!
//! - [`S3Storage`] publishes files to an S3-compatible object store (Aliyun OSS)
//!   so the synthesis API can fetch them by URL.
//! - [`LocalStorage`] owns one local directory (uploads or downloads) and serves
//!   its files back under a relay-relative URL prefix.
//!
//! Keys are flat file names below an optional prefix. They must not contain `..`
//! or start with `/`.

pub mod factory;
pub mod local;
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use animove_core::StorageBackend;
pub use factory::create_public_storage;
pub use local::LocalStorage;
pub use s3::{S3Settings, S3Storage};
pub use traits::{ByteStream, Storage, StorageError, StorageResult};
