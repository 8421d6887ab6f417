// src/services/mod.rs
//
// Shared services used by the domain modules

pub mod file_storage;
pub mod storage_path;
pub mod upload_validation;

// Re-export commonly used types for convenience
pub use file_storage::{Category, FileStorageService, StorageError};
