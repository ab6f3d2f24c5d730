use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::page::Pagination;

/// Body shape shared by every endpoint, failures included:
/// `{ status, message, data?, meta?, pagination? }`.
#[derive(Debug, Clone, Serialize)]
pub struct Payload<T = (), M = ()> {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<M>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl Payload {
    pub fn message(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
            data: None,
            meta: None,
            pagination: None,
        }
    }
}

impl<T> Payload<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::with_status(StatusCode::OK, message, data)
    }

    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self::with_status(StatusCode::CREATED, message, data)
    }

    pub fn with_status(
        status: StatusCode,
        message: impl Into<String>,
        data: T,
    ) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
            data: Some(data),
            meta: None,
            pagination: None,
        }
    }
}

impl<T, M> Payload<T, M> {
    pub fn with_meta<N>(self, meta: N) -> Payload<T, N> {
        Payload {
            status: self.status,
            message: self.message,
            data: self.data,
            meta: Some(meta),
            pagination: self.pagination,
        }
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

impl<T: Serialize, M: Serialize> IntoResponse for Payload<T, M> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

impl IntoResponse for crate::Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            crate::Error::NotFound(message) => {
                tracing::debug!(%message, "not found");
                (StatusCode::NOT_FOUND, message.clone())
            }
            crate::Error::Validation(message) => {
                tracing::debug!(%message, "validation failed");
                (StatusCode::BAD_REQUEST, message.clone())
            }
            crate::Error::Database(_)
            | crate::Error::Internal(_)
            | crate::Error::Config(_) => {
                tracing::error!(error = ?self, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };
        Payload::message(status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::PageRequest;
    use axum::body;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_is_in_band() {
        let response =
            crate::Error::not_found("Tour not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = body_json(response).await;
        assert_eq!(json["status"], 404);
        assert_eq!(json["message"], "Tour not found");
        assert!(json.get("data").is_none());
    }

    #[tokio::test]
    async fn test_internal_error_hides_cause() {
        let response = crate::Error::Database(anyhow::anyhow!(
            "relation \"reviews\" does not exist"
        ))
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["status"], 500);
        assert_eq!(json["message"], "internal server error");
    }

    #[tokio::test]
    async fn test_payload_with_meta_and_pagination() {
        let request = PageRequest::new(1, 10).unwrap();
        let response = Payload::ok("Reviews found successfully", vec![1, 2])
            .with_meta(serde_json::json!({ "total": 2 }))
            .with_pagination(Pagination::new(request, 2))
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["data"], serde_json::json!([1, 2]));
        assert_eq!(json["meta"]["total"], 2);
        assert_eq!(json["pagination"]["totalPages"], 1);
    }

    #[tokio::test]
    async fn test_created_status() {
        let response = Payload::created("Image added successfully", 5).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["status"], 201);
    }
}
