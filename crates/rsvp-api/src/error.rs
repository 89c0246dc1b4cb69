use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Nickname is required")]
    MissingNickname,

    #[error("Invalid action")]
    InvalidAction,

    /// Guest lookup miss. Reported as 401, not 404.
    #[error("Guest not found")]
    GuestNotFound,

    #[error("Flag already submitted")]
    DuplicateSubmission,

    #[error("Not found")]
    NotFound,

    #[error("{0}")]
    Storage(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Validation(_)
            | ApiError::MissingNickname
            | ApiError::InvalidAction
            | ApiError::DuplicateSubmission => StatusCode::BAD_REQUEST,
            ApiError::GuestNotFound => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Storage failures echo the underlying message to the client.
        let body = match &self {
            ApiError::Storage(e) => {
                error!("Storage error: {:#}", e);
                json!({ "success": false, "error": format!("{:#}", e) })
            }
            other => json!({ "success": false, "message": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Unreadable request bodies (bad JSON, wrong field types, missing
/// content type) are validation failures like any other.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!("Rejected request body ({}): {}", rejection.status(), rejection.body_text());
        ApiError::Validation(rejection.body_text())
    }
}

/// Run a blocking store call off the async runtime.
pub async fn run_blocking<F, T>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Storage(anyhow::anyhow!("worker failed: {}", e))
        })?
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::Value;

    async fn body_of(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn status_codes_follow_taxonomy() {
        let cases = [
            (ApiError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::MissingNickname, StatusCode::BAD_REQUEST),
            (ApiError::InvalidAction, StatusCode::BAD_REQUEST),
            (ApiError::DuplicateSubmission, StatusCode::BAD_REQUEST),
            (ApiError::GuestNotFound, StatusCode::UNAUTHORIZED),
            (ApiError::NotFound, StatusCode::NOT_FOUND),
            (ApiError::Storage(anyhow::anyhow!("disk on fire")), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn storage_errors_echo_the_cause_under_error() {
        let (status, body) = body_of(ApiError::Storage(anyhow::anyhow!("disk on fire"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "disk on fire");
        assert!(body.get("message").is_none());
    }

    #[tokio::test]
    async fn client_errors_carry_a_message() {
        let cases = [
            (ApiError::Validation("Name is required".into()), "Name is required"),
            (ApiError::MissingNickname, "Nickname is required"),
            (ApiError::InvalidAction, "Invalid action"),
            (ApiError::DuplicateSubmission, "Flag already submitted"),
            (ApiError::GuestNotFound, "Guest not found"),
            (ApiError::NotFound, "Not found"),
        ];

        for (err, message) in cases {
            let (_, body) = body_of(err).await;
            assert_eq!(body["success"], false);
            assert_eq!(body["message"], message);
            assert!(body.get("error").is_none());
        }
    }
}
