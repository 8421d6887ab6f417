// src/profile/handlers/jobseekers.rs

use axum::{extract::Extension, Json};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::super::mapping;
use super::super::models::JobSeekerProfileDto;
use super::super::services::ProfileService;
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState};

/// GET /api/jobseekers/all - List every job seeker profile
pub async fn list_jobseekers(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
) -> Result<Json<Vec<JobSeekerProfileDto>>, ApiError> {
    let db = state.read().await.db.clone();
    let profile_service = ProfileService::new(db);

    let profiles = profile_service.list_profiles().await?;
    debug!(requested_by = %user.username, count = profiles.len(), "Listing job seekers");

    Ok(Json(profiles.iter().map(mapping::to_dto).collect()))
}
