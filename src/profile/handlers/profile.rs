// src/profile/handlers/profile.rs

use axum::extract::{Extension, Json};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::super::mapping;
use super::super::models::{FileReferenceClearedResponse, JobSeekerProfileDto};
use super::super::services::ProfileService;
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState};
use crate::services::Category;

/// GET /api/jobseeker/profile - Get the caller's profile
///
/// A user without a profile gets a placeholder profile created on the spot.
pub async fn get_profile(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<JobSeekerProfileDto>, ApiError> {
    let db = state_lock.read().await.db.clone();
    let profile_service = ProfileService::new(db);

    let aggregate = profile_service.get_or_create_profile(&authed.username).await?;

    Ok(Json(mapping::to_dto(&aggregate)))
}

/// PUT /api/jobseeker/profile - Replace the caller's profile
pub async fn update_profile(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(payload): Json<JobSeekerProfileDto>,
) -> Result<Json<JobSeekerProfileDto>, ApiError> {
    let db = state_lock.read().await.db.clone();
    let profile_service = ProfileService::new(db);

    let aggregate = profile_service
        .update_profile(&authed.username, &payload)
        .await?;

    Ok(Json(mapping::to_dto(&aggregate)))
}

/// DELETE /api/jobseeker/profile/resume
pub async fn clear_resume(
    state_lock: Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<FileReferenceClearedResponse>, ApiError> {
    clear_reference(state_lock, authed, Category::Resumes).await
}

/// DELETE /api/jobseeker/profile/photo
pub async fn clear_photo(
    state_lock: Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<FileReferenceClearedResponse>, ApiError> {
    clear_reference(state_lock, authed, Category::Photos).await
}

async fn clear_reference(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    category: Category,
) -> Result<Json<FileReferenceClearedResponse>, ApiError> {
    let state = state_lock.read().await.clone();
    let profile_service = ProfileService::new(state.db.clone());

    let previous = profile_service
        .clear_file_reference(&authed.username, category)
        .await?;

    // The reference is already gone; a file that cannot be deleted is orphaned
    let file_deleted = match previous {
        Some(reference) => {
            let outcome = state.storage.delete(&reference).await;
            if !outcome.ok {
                warn!(
                    username = %authed.username,
                    reference = %reference,
                    error = ?outcome.error,
                    "Stored file could not be deleted"
                );
            }
            outcome.ok
        }
        None => false,
    };

    info!(
        username = %authed.username,
        category = category.dir_name(),
        file_deleted,
        "Cleared profile file reference"
    );

    let what = match category {
        Category::Resumes => "Resume",
        Category::Photos => "Photo",
    };

    Ok(Json(FileReferenceClearedResponse {
        message: format!("{} removed from profile", what),
        file_deleted,
    }))
}
