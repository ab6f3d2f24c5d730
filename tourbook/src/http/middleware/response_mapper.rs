use axum::http::{HeaderValue, StatusCode, header};

use crate::http::Payload;

/// Axum's extractor rejections answer 400/415/422 with a plain-text body.
/// This rewrites them into the JSON payload every other response uses.
pub async fn response_mapper_layer(
    request: axum::extract::Request,
    next: axum::middleware::Next,
) -> axum::response::Response {
    let response = next.run(request).await;
    let status = response.status();
    let is_rejection = matches!(
        status,
        StatusCode::BAD_REQUEST
            | StatusCode::UNPROCESSABLE_ENTITY
            | StatusCode::UNSUPPORTED_MEDIA_TYPE
    );
    let is_plain_text = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("text/plain"));
    if !is_rejection || !is_plain_text {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let message = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read rejection body");
            status.canonical_reason().unwrap_or_default().to_string()
        }
    };
    let new_body = match serde_json::to_string(&Payload::message(status, message)) {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(error = %e, "failed to encode rejection payload");
            return axum::response::Response::from_parts(
                parts,
                axum::body::Body::empty(),
            );
        }
    };
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    parts
        .headers
        .insert(header::CONTENT_LENGTH, HeaderValue::from(new_body.len()));

    axum::response::Response::from_parts(parts, axum::body::Body::from(new_body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        body::{self as ax_body, Body},
        http::Request,
        routing::{get, post},
    };
    use tower::ServiceExt;

    #[derive(serde::Deserialize)]
    struct NewReview {
        #[allow(dead_code)]
        rating: i32,
    }

    fn app() -> Router {
        Router::new()
            .route("/reviews", post(|Json(_): Json<NewReview>| async { "created" }))
            .route(
                "/passthrough",
                get(|| async { (StatusCode::BAD_REQUEST, Json(serde_json::json!({"status": 400}))) }),
            )
            .layer(axum::middleware::from_fn(response_mapper_layer))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body =
            ax_body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_json_rejection_is_rewritten() {
        let response = app()
            .oneshot(
                Request::post("/reviews")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"rating":"five"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
        let json = body_json(response).await;
        assert_eq!(json["status"], 422);
        assert!(json["message"].as_str().unwrap().contains("rating"));
    }

    #[tokio::test]
    async fn test_missing_content_type_is_rewritten() {
        let response = app()
            .oneshot(
                Request::post("/reviews")
                    .body(Body::from(r#"{"rating":5}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body_json(response).await["status"], 415);
    }

    #[tokio::test]
    async fn test_json_errors_pass_through() {
        let response = app()
            .oneshot(Request::get("/passthrough").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, serde_json::json!({"status": 400}));
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let response = app()
            .oneshot(
                Request::post("/reviews")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"rating":5}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body =
            ax_body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body, "created");
    }
}
