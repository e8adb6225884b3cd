//! Mapping of `DomainError` onto HTTP responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, warn};

use super::{MessageResponse, StorageErrorResponse};
use crate::domain::DomainError;

/// Handler error. Every `DomainError` variant has exactly one HTTP shape:
///
/// | variant | status | body |
/// |---|---|---|
/// | `NotFound`, `Conflict`, `Relationship` | 409 | `{"message"}` |
/// | `Validation` | 422 | `{"message"}` |
/// | `Unauthorized` | 401 | `{"message"}` |
/// | `Forbidden` | 403 | `{"message"}` |
/// | `Storage`, `Internal` | 500 | `{"status", "code", "message"}` |
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DomainError::NotFound { .. }
            | DomainError::Conflict(_)
            | DomainError::Relationship(_) => StatusCode::CONFLICT,
            DomainError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
            DomainError::Storage { code, message } => {
                if self.0.is_transient() {
                    warn!(code = *code, error = %message, "Transient storage failure");
                } else {
                    error!(code = *code, error = %message, "Storage failure");
                }
                let body = StorageErrorResponse::new(*code, message.clone());
                return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
            }
            DomainError::Internal { code, message } => {
                error!(code = *code, error = %message, "Internal failure");
                let body = StorageErrorResponse::new(*code, message.clone());
                return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
            }
        };

        let message = match self.0 {
            DomainError::Validation(msg)
            | DomainError::Unauthorized(msg)
            | DomainError::Forbidden(msg) => msg,
            other => other.to_string(),
        };

        (status, Json(MessageResponse::new(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn render(e: DomainError) -> (StatusCode, Value) {
        let resp = ApiError(e).into_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn business_failures_are_conflicts() {
        let (status, body) = render(DomainError::group_exists()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], "Group already exists!");

        let (status, body) = render(DomainError::user_not_found(3)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], "User does not exist!");

        let (status, body) = render(DomainError::group_has_users()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], "Group has related users!");
    }

    #[tokio::test]
    async fn access_failures_carry_their_own_status() {
        let (status, body) = render(DomainError::Unauthorized("Invalid credentials".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid credentials");

        let (status, _) = render(DomainError::Forbidden("Access denied".into())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = render(DomainError::Validation("bad".into())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn storage_failures_use_the_structured_body() {
        let (status, body) = render(DomainError::Storage {
            code: "DB_CONNECTION",
            message: "pool timed out".into(),
        })
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
        assert_eq!(body["code"], "DB_CONNECTION");
        assert_eq!(body["message"], "pool timed out");
    }

    #[tokio::test]
    async fn internal_failures_are_500_not_validation() {
        let err = DomainError::internal("TOKEN", "token lifetime of 0h is out of range");
        let (status, body) = render(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
        assert_eq!(body["code"], "TOKEN");
        assert_eq!(body["message"], "token lifetime of 0h is out of range");
    }
}
