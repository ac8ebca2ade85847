//! Authentication service routes

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::WithRejection;
use common::error::ServiceError;
use thiserror::Error;
use tracing::{error, info};

use crate::{
    AppState,
    models::{LoginRequest, RegisterRequest},
};

type JsonBody<T> = WithRejection<Json<T>, AuthError>;

/// Create the router for the authentication service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/v1/auth/register", post(register))
        .route("/v1/auth/login", post(login))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = match common::database::health_check(&state.db_pool).await {
        Ok(true) => "ok",
        Ok(false) | Err(_) => "unavailable",
    };
    let status = if database == "ok" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(serde_json::json!({
            "status": database,
            "service": "auth-service"
        })),
    )
}

/// Account registration endpoint
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): JsonBody<RegisterRequest>,
) -> Result<impl IntoResponse, AuthError> {
    info!("Registration attempt for {}", payload.email);

    let registered = state.credentials.register(payload).await?;

    Ok((StatusCode::CREATED, Json(registered)))
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): JsonBody<LoginRequest>,
) -> Result<impl IntoResponse, AuthError> {
    info!("Login attempt for {}", payload.email);

    let response = state.credentials.login(payload).await?;

    Ok((StatusCode::OK, Json(response)))
}

/// Error returned by authentication handlers
#[derive(Debug, Error)]
#[error(transparent)]
pub struct AuthError(#[from] ServiceError);

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        AuthError(ServiceError::invalid(rejection.body_text()))
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let AuthError(err) = self;
        if let ServiceError::Internal(source) = &err {
            error!("Authentication request failed: {:?}", source);
        }

        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(serde_json::json!({
            "error": err.public_message(),
        }));

        (status, body).into_response()
    }
}
