use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::users::repo::StoreError;

/// Every way a handler can fail. The `Display` text is the `message` the client sees.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad Request")]
    BadRequest,
    #[error("Invalid ID")]
    InvalidId,
    #[error("Not Found")]
    NotFound,
    #[error("User Not Found")]
    UserNotFound,
    #[error("User already exists")]
    UserExists,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Server Error")]
    Server(anyhow::Error),
    #[error("خطأ أثناء الاتصال")]
    CallFailed(anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest | ApiError::InvalidId | ApiError::UserExists => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound | ApiError::UserNotFound => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Server(_) | ApiError::CallFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Server(e)
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail => ApiError::UserExists,
            other => ApiError::Server(other.into()),
        }
    }
}

#[derive(Debug, Serialize)]
struct Failure {
    success: bool,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Server(cause) | ApiError::CallFailed(cause) => {
                error!(error = ?cause, "request failed");
            }
            other => warn!(status = %other.status(), reason = %other, "request rejected"),
        }
        let body = Failure {
            success: false,
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// `{ "success": true, "data": ... }`
#[derive(Debug, Serialize)]
pub struct Data<T> {
    pub success: bool,
    pub data: T,
}

impl<T> Data<T> {
    pub fn new(data: T) -> Self {
        Self { success: true, data }
    }
}

/// `{ "success": true, "message": ... }`
#[derive(Debug, Serialize)]
pub struct Ack {
    pub success: bool,
    pub message: &'static str,
}

impl Ack {
    pub fn new(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn render(err: ApiError) -> (StatusCode, Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn client_errors_keep_their_message() {
        let (status, body) = render(ApiError::InvalidId).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Invalid ID");

        let (status, body) = render(ApiError::Unauthorized).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Unauthorized");
    }

    #[tokio::test]
    async fn server_errors_hide_the_cause() {
        let (status, body) = render(ApiError::Server(anyhow::anyhow!("connection reset"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Server Error");
        assert!(!body.to_string().contains("connection reset"));
    }

    #[test]
    fn duplicate_email_maps_to_user_exists() {
        let err = ApiError::from(StoreError::DuplicateEmail);
        assert!(matches!(err, ApiError::UserExists));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn success_envelopes_serialize() {
        let json = serde_json::to_value(Data::new(vec![1, 2])).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "data": [1, 2] }));

        let json = serde_json::to_value(Ack::new("Email sent successfully")).unwrap();
        assert_eq!(json["message"], "Email sent successfully");
    }
}
