//! Error types shared by the marketplace services
//!
//! `DatabaseError` covers connection setup and migrations. `ServiceError`
//! is the taxonomy every business operation returns; transport layers turn
//! it into a response through [`ServiceError::status_code`].

use sqlx::Error as SqlxError;
use std::fmt;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Entity kinds that can be reported as missing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    User,
    Profile,
    Role,
    Location,
    Stall,
    Product,
    Order,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::User => "user",
            Resource::Profile => "user profile",
            Resource::Role => "role",
            Resource::Location => "location",
            Resource::Stall => "lapak",
            Resource::Product => "product",
            Resource::Order => "pemesanan",
        };
        f.write_str(name)
    }
}

/// Reasons a caller failed to authenticate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error("token not found")]
    TokenNotFound,

    #[error("invalid jwt token")]
    InvalidToken,

    #[error("token already expired, please login again")]
    TokenExpired,

    #[error("invalid password")]
    InvalidPassword,
}

/// Outcome of a failed business operation
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Malformed or out-of-policy input
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The referenced entity does not exist
    #[error("{0} is not found")]
    NotFound(Resource),

    /// The session's role or ownership does not permit the operation
    #[error("forbidden access")]
    Forbidden,

    /// Missing, invalid or expired credentials
    #[error("unauthorized: {0}")]
    Unauthorized(#[from] AuthFailure),

    /// The request collides with existing state
    #[error("conflict: {0}")]
    Conflict(String),

    /// Anything unexpected; the source is logged, never shown to callers
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        ServiceError::InvalidRequest(reason.into())
    }

    /// HTTP status class for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::InvalidRequest(_) => 400,
            ServiceError::Unauthorized(_) => 401,
            ServiceError::Forbidden => 403,
            ServiceError::NotFound(_) => 404,
            ServiceError::Conflict(_) => 409,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Message safe to hand back to the caller
    pub fn public_message(&self) -> String {
        match self {
            ServiceError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<SqlxError> for ServiceError {
    fn from(err: SqlxError) -> Self {
        ServiceError::Internal(err.into())
    }
}

/// Type alias for Result with ServiceError
pub type ServiceResult<T> = Result<T, ServiceError>;
