//! Tests for files module
//!
//! Uploads and downloads are driven through the full router so the body
//! limit, multipart parsing and response headers are all exercised.

#[cfg(test)]
mod tests {
    use super::super::handlers::serve::content_type_for;
    use crate::common::AppState;
    use crate::test_support::{self, body_bytes, body_json, multipart_body};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use tower::ServiceExt;

    fn router(state: &AppState) -> Router {
        crate::build_router(test_support::shared(state.clone()), &state.config)
    }

    fn upload_request(uri: &str, filename: &str, content: &[u8]) -> Request<Body> {
        let (content_type, body) = multipart_body(filename, content);
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, content_type)
            .body(body)
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[test]
    fn test_content_type_table() {
        assert_eq!(content_type_for("a.pdf"), "application/pdf");
        assert_eq!(content_type_for("A.PDF"), "application/pdf");
        assert_eq!(content_type_for("a.doc"), "application/msword");
        assert_eq!(
            content_type_for("a.docx"),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
        assert_eq!(content_type_for("a.JPEG"), "image/jpeg");
        assert_eq!(content_type_for("a.jpg"), "image/jpeg");
        assert_eq!(content_type_for("a.png"), "image/png");
        assert_eq!(content_type_for("a.gif"), "image/gif");
        assert_eq!(content_type_for("a.txt"), "application/octet-stream");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_upload_resume_then_serve() {
        let state = test_support::test_state().await;
        let app = router(&state);
        let content = b"%PDF-1.4 resume body";

        let response = app
            .clone()
            .oneshot(upload_request("/api/files/upload/resume", "resume.pdf", content))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["originalName"], "resume.pdf");
        assert_eq!(body["message"], "File uploaded successfully");
        let file_path = body["filePath"].as_str().unwrap().to_string();
        assert!(file_path.starts_with("resumes/"));
        assert!(file_path.ends_with(".pdf"));

        let filename = file_path.trim_start_matches("resumes/");
        let response = app
            .oneshot(get(&format!("/uploads/resumes/{}", filename)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers().clone();
        assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(headers[header::CACHE_CONTROL], "max-age=3600");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            format!("inline; filename=\"{}\"", filename).as_str()
        );
        assert_eq!(
            headers[header::CONTENT_LENGTH],
            content.len().to_string().as_str()
        );
        assert_eq!(body_bytes(response).await, content.to_vec());
    }

    #[tokio::test]
    async fn test_upload_photo_rejects_executable() {
        let state = test_support::test_state().await;

        let response = router(&state)
            .oneshot(upload_request("/api/files/upload/photo", "image.exe", b"MZ"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("jpg, jpeg, png, gif"));

        // Nothing was written
        let listing = state.storage.list_contents().await;
        assert!(listing.entries.iter().all(|e| e.children.is_empty()));
    }

    #[tokio::test]
    async fn test_upload_empty_file_is_rejected() {
        let state = test_support::test_state().await;

        let response = router(&state)
            .oneshot(upload_request("/api/files/upload/resume", "empty.pdf", b""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Please select a file to upload");
    }

    #[tokio::test]
    async fn test_upload_uppercase_extension_is_lowercased() {
        let state = test_support::test_state().await;

        let response = router(&state)
            .oneshot(upload_request("/api/files/upload/photo", "Me.PNG", b"\x89PNG"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let file_path = body["filePath"].as_str().unwrap();
        assert!(file_path.starts_with("photos/"));
        assert!(file_path.ends_with(".png"));
    }

    #[tokio::test]
    async fn test_upload_over_limit_is_rejected() {
        let mut state = test_support::test_state().await;
        state.config.max_upload_bytes = 1024;

        let response = router(&state)
            .oneshot(upload_request(
                "/api/files/upload/resume",
                "big.pdf",
                &vec![b'x'; 8 * 1024],
            ))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
        let listing = state.storage.list_contents().await;
        assert!(listing.entries.iter().all(|e| e.children.is_empty()));
    }

    #[tokio::test]
    async fn test_serve_missing_file_is_404() {
        let state = test_support::test_state().await;

        let response = router(&state)
            .oneshot(get("/uploads/photos/does-not-exist.png"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_serve_rejects_traversal() {
        let state = test_support::test_state().await;

        let response = router(&state)
            .oneshot(get("/uploads/resumes/..%2F..%2Fetc%2Fpasswd"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_debug_listing_toggle() {
        let state = test_support::test_state().await;
        state
            .storage
            .store(
                &mut &b"GIF89a"[..],
                crate::services::Category::Photos,
                Some("a.gif"),
            )
            .await
            .unwrap();

        let response = router(&state)
            .oneshot(get("/uploads/debug/files"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["exists"], true);
        let photos = body["entries"]
            .as_array()
            .unwrap()
            .iter()
            .find(|e| e["name"] == "photos")
            .unwrap();
        assert_eq!(photos["children"].as_array().unwrap().len(), 1);

        let mut hidden = state.clone();
        hidden.config.enable_debug_endpoints = false;
        let response = router(&hidden)
            .oneshot(get("/uploads/debug/files"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
