use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::notify::{Notice, NoticeKind};
use thiserror::Error;

/// JSON error body: `{ "error": <title>, "message": <detail> }`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: &'static str,
    pub message: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &'static str, message: Option<String>) -> Self {
        Self { status, error, message }
    }
}

impl From<Notice> for JsonApiError {
    fn from(notice: Notice) -> Self {
        let (status, error) = match notice.kind {
            NoticeKind::OutOfStock => (StatusCode::CONFLICT, "Out Of Stock"),
            NoticeKind::NotInCart => (StatusCode::NOT_FOUND, "Not Found"),
            NoticeKind::Failure => (StatusCode::BAD_GATEWAY, "Bad Gateway"),
        };
        Self::new(status, error, Some(notice.message.to_string()))
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({"error": self.error, "message": self.message}))).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Service(#[from] service::errors::ServiceError),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
