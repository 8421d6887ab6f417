// src/profile/handlers/register.rs

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::super::mapping;
use super::super::models::JobSeekerRegisterRequest;
use super::super::services::ProfileService;
use crate::common::{ApiError, AppState};

/// POST /api/auth/register/jobseeker - Register a job seeker with a profile
pub async fn register_jobseeker(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    Json(request): Json<JobSeekerRegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.read().await.db.clone();
    let profile_service = ProfileService::new(db);

    let aggregate = profile_service.register(request).await?;

    Ok((StatusCode::CREATED, Json(mapping::to_dto(&aggregate))))
}
