// src/files/handlers/debug.rs

use axum::extract::{Extension, Json};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::common::AppState;
use crate::services::file_storage::StorageListing;

/// GET /uploads/debug/files - Upload directory listing. Only routed when
/// ENABLE_DEBUG_ENDPOINTS is set.
pub async fn list_upload_files(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Json<StorageListing> {
    let storage = state_lock.read().await.storage.clone();
    Json(storage.list_contents().await)
}
