// src/profile/routes.rs

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::{jobseekers, profile, register};

pub fn profile_routes() -> Router {
    Router::new()
        // Registration
        .route(
            "/api/auth/register/jobseeker",
            post(register::register_jobseeker),
        )
        // Own profile
        .route(
            "/api/jobseeker/profile",
            get(profile::get_profile).put(profile::update_profile),
        )
        .route("/api/jobseeker/profile/resume", delete(profile::clear_resume))
        .route("/api/jobseeker/profile/photo", delete(profile::clear_photo))
        // Directory
        .route("/api/jobseekers/all", get(jobseekers::list_jobseekers))
}
