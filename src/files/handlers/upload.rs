// src/files/handlers/upload.rs
//! Multipart uploads for resumes and photos

use axum::extract::{Extension, Json, Multipart};
use futures_util::TryStreamExt;
use std::io;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::io::StreamReader;
use tracing::{info, warn};

use super::super::models::UploadResponse;
use crate::common::{ApiError, AppState};
use crate::services::{Category, StorageError};

/// POST /api/files/upload/resume - Upload a resume (pdf, doc, docx)
pub async fn upload_resume(
    state_lock: Extension<Arc<RwLock<AppState>>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    upload(state_lock, multipart, Category::Resumes).await
}

/// POST /api/files/upload/photo - Upload a photo (jpg, jpeg, png, gif)
pub async fn upload_photo(
    state_lock: Extension<Arc<RwLock<AppState>>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    upload(state_lock, multipart, Category::Photos).await
}

async fn upload(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    mut multipart: Multipart,
    category: Category,
) -> Result<Json<UploadResponse>, ApiError> {
    let storage = state_lock.read().await.storage.clone();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!(error = %e, "Malformed multipart request");
        ApiError::BadRequest("Invalid multipart request".to_string())
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field.file_name().map(str::to_string);

        // The part is streamed straight to disk; body failures are bad input
        let reader = StreamReader::new(
            field.map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string())),
        );
        tokio::pin!(reader);

        let reference = storage
            .store(&mut reader, category, original_name.as_deref())
            .await
            .map_err(|e| {
                warn!(
                    error = %e,
                    category = category.dir_name(),
                    original_name = ?original_name,
                    "Upload rejected"
                );
                ApiError::from(e)
            })?;

        info!(
            reference = %reference,
            original_name = ?original_name,
            "File uploaded"
        );

        return Ok(Json(UploadResponse {
            file_path: reference.into_string(),
            original_name: original_name.unwrap_or_default(),
            message: "File uploaded successfully".to_string(),
        }));
    }

    Err(ApiError::from(StorageError::EmptyUpload))
}
