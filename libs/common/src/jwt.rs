//! Session token codec
//!
//! Issues and validates HS256-signed JWTs that carry the user id and role of
//! a logged-in account. Expiry is checked against an explicit instant so the
//! decision is a pure function of the clock value passed in.

use anyhow::Result;
use chrono::{DateTime, Duration, SubsecRound, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::error::{AuthFailure, ServiceError};
use crate::role::Role;

/// Default session lifetime: 72 hours
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 72 * 60 * 60;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared secret used to sign and verify tokens
    pub secret: String,
    /// Session lifetime in seconds
    pub ttl_seconds: i64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: HMAC secret for signing tokens (required, non-empty)
    /// - `JWT_TTL_SECONDS`: Session lifetime in seconds (default: 259200)
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable not set"))?;

        if secret.trim().is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }

        let ttl_seconds = std::env::var("JWT_TTL_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|ttl: &i64| *ttl > 0)
            .unwrap_or(DEFAULT_TOKEN_TTL_SECONDS);

        Ok(JwtConfig {
            secret,
            ttl_seconds,
        })
    }
}

/// Claims embedded in a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    #[serde(rename = "sub")]
    pub user_id: Uuid,
    /// Role held by the user at login time
    pub role: Role,
    /// Issued at, seconds since the epoch
    #[serde(rename = "iat")]
    pub issued_at: i64,
    /// Expiry, seconds since the epoch
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

/// A freshly signed token and the instant it stops being valid
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token not found")]
    NotFound,

    #[error("invalid jwt token")]
    Invalid,

    #[error("token already expired")]
    Expired,

    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

impl From<TokenError> for ServiceError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::NotFound => AuthFailure::TokenNotFound.into(),
            TokenError::Invalid => AuthFailure::InvalidToken.into(),
            TokenError::Expired => AuthFailure::TokenExpired.into(),
            TokenError::Signing(e) => ServiceError::Internal(e.into()),
        }
    }
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: &JwtConfig) -> Self {
        let secret = config.secret.as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        // expiry is compared in `validate_at` against the caller's clock
        validation.validate_exp = false;
        validation.leeway = 0;

        JwtService {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl: Duration::seconds(config.ttl_seconds),
        }
    }

    /// Session lifetime
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `user_id` valid from now
    pub fn issue(&self, user_id: Uuid, role: Role) -> Result<IssuedToken, TokenError> {
        self.issue_at(user_id, role, Utc::now())
    }

    /// Issue a token as if the current time were `now`
    pub fn issue_at(
        &self,
        user_id: Uuid,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        // claims carry whole seconds, so the returned expiry must too
        let now = now.trunc_subsecs(0);
        let expires_at = now + self.ttl;
        let claims = Claims {
            user_id,
            role,
            issued_at: now.timestamp(),
            expires_at: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Validate a token against the current time
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate a token against the instant `now`
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        if token.is_empty() {
            return Err(TokenError::NotFound);
        }

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                warn!("Rejected session token: {}", e);
                TokenError::Invalid
            })?
            .claims;

        if now.timestamp() >= claims.expires_at {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

/// Convert a claims timestamp back into a UTC instant
pub fn timestamp_to_utc(seconds: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(seconds, 0).single()
}
