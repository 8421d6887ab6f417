// src/files/routes.rs

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use super::handlers::{debug, serve, upload};
use crate::common::AppConfig;

pub fn files_routes(config: &AppConfig) -> Router {
    let uploads = Router::new()
        .route("/api/files/upload/resume", post(upload::upload_resume))
        .route("/api/files/upload/photo", post(upload::upload_photo))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes));

    let mut router = Router::new()
        .merge(uploads)
        .route("/uploads/resumes/:filename", get(serve::serve_resume_file))
        .route("/uploads/photos/:filename", get(serve::serve_photo_file));

    if config.enable_debug_endpoints {
        router = router.route("/uploads/debug/files", get(debug::list_upload_files));
    }

    router
}
