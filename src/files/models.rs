// src/files/models.rs

use serde::Serialize;

/// Successful upload. `file_path` is the reference to persist on a profile.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub file_path: String,
    pub original_name: String,
    pub message: String,
}
