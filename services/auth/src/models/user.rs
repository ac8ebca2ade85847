//! Account models for registration and login

use chrono::{DateTime, Utc};
use common::role::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored credentials of an account, joined with its role
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub password_hash: String,
    pub role: Role,
}

/// Account ready to be persisted, password already hashed
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub telepon: String,
    pub location_id: Uuid,
    pub role_id: Uuid,
    /// Name of the stall opened together with a seller account
    pub stall_name: Option<String>,
}

/// Registration payload
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub telepon: String,
    pub location_id: String,
    #[serde(default)]
    pub is_seller: bool,
}

/// Result of a successful registration
#[derive(Debug, Clone, Serialize)]
pub struct RegisteredUser {
    pub user_id: Uuid,
    pub role: Role,
}

/// User login credentials
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for a successful login
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub expired_at: DateTime<Utc>,
    pub role: Role,
}
