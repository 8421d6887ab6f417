// src/files/handlers/serve.rs
//! Streaming stored files back to clients

use axum::{
    body::Body,
    extract::{Extension, Path},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::io::ReaderStream;
use tracing::debug;

use crate::common::{ApiError, AppState};
use crate::services::Category;

/// GET /uploads/resumes/:filename
pub async fn serve_resume_file(
    state_lock: Extension<Arc<RwLock<AppState>>>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    serve(state_lock, Category::Resumes, filename).await
}

/// GET /uploads/photos/:filename
pub async fn serve_photo_file(
    state_lock: Extension<Arc<RwLock<AppState>>>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    serve(state_lock, Category::Photos, filename).await
}

async fn serve(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    category: Category,
    filename: String,
) -> Result<Response, ApiError> {
    let storage = state_lock.read().await.storage.clone();

    let reference = format!("{}/{}", category.dir_name(), filename);
    let stored = storage.load(&reference).await?;

    debug!(reference = %reference, size = stored.size, "Serving stored file");

    let body = Body::from_stream(ReaderStream::new(stored.file));

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type_for(&filename).to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", filename),
            ),
            (header::CACHE_CONTROL, "max-age=3600".to_string()),
            (header::CONTENT_LENGTH, stored.size.to_string()),
        ],
        body,
    )
        .into_response())
}

/// Content type by extension, case-insensitive.
pub fn content_type_for(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}
