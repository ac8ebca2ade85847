//! Custom error types for the API service

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::{AuthFailure, ServiceError};
use common::jwt::TokenError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// A business operation or gate check failed
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Request body could not be parsed
    #[error("Bad request: {0}")]
    Body(#[from] JsonRejection),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Service(err) => StatusCode::from_u16(err.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            ApiError::Body(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<AuthFailure> for ApiError {
    fn from(failure: AuthFailure) -> Self {
        ApiError::Service(failure.into())
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        ApiError::Service(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match &self {
            ApiError::Service(err) => {
                if let ServiceError::Internal(source) = err {
                    error!("Request failed: {:?}", source);
                }
                err.public_message()
            }
            ApiError::Body(rejection) => rejection.body_text(),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use common::error::Resource;

    #[test]
    fn service_errors_keep_their_status_class() {
        assert_eq!(
            ApiError::from(ServiceError::Forbidden).into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::from(AuthFailure::TokenExpired)
                .into_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(ServiceError::NotFound(Resource::Product)).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(ServiceError::Internal(anyhow::anyhow!("deadlock detected")))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
