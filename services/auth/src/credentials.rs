//! Registration and login
//!
//! Every registration check runs before anything is written; the account,
//! its profile and a seller's stall are then persisted as one unit by the
//! store.

use common::error::{AuthFailure, Resource, ServiceError, ServiceResult};
use common::jwt::JwtService;
use common::password;
use common::role::Role;
use common::validation::{MIN_FULL_NAME_LEN, MIN_PASSWORD_LEN, Validators, require_min_len};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{LoginRequest, LoginResponse, NewAccount, RegisterRequest, RegisteredUser};
use crate::repositories::CredentialStore;

/// Verifies and creates account credentials
#[derive(Clone)]
pub struct CredentialManager<S> {
    store: S,
    validators: Arc<Validators>,
    jwt: JwtService,
}

impl<S: CredentialStore> CredentialManager<S> {
    pub fn new(store: S, validators: Arc<Validators>, jwt: JwtService) -> Self {
        Self {
            store,
            validators,
            jwt,
        }
    }

    /// Register a new buyer or seller account
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<RegisteredUser> {
        self.validate_registration(&request)?;
        let location_id = Uuid::parse_str(&request.location_id)
            .map_err(|_| ServiceError::invalid("location_id must be a valid id"))?;

        if self.store.find_by_email(&request.email).await?.is_some() {
            return Err(email_taken());
        }

        let role = if request.is_seller {
            Role::Seller
        } else {
            Role::Customer
        };
        let role_id = self
            .store
            .role_id(role)
            .await?
            .ok_or(ServiceError::NotFound(Resource::Role))?;

        if !self.store.location_exists(location_id).await? {
            return Err(ServiceError::NotFound(Resource::Location));
        }

        let password_hash = password::hash_blocking(request.password).await?;
        let stall_name = request
            .is_seller
            .then(|| format!("Lapak {}", request.full_name));

        let account = NewAccount {
            full_name: request.full_name,
            email: request.email,
            password_hash,
            telepon: request.telepon,
            location_id,
            role_id,
            stall_name,
        };

        let user_id = self
            .store
            .create_account(&account)
            .await?
            .ok_or_else(email_taken)?;

        info!("Registered {} as {}", user_id, role);
        Ok(RegisteredUser { user_id, role })
    }

    /// Check a user's password and issue a session token
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<LoginResponse> {
        self.validators.require_email(&request.email)?;

        let user = self
            .store
            .find_by_email(&request.email)
            .await?
            .ok_or(ServiceError::NotFound(Resource::User))?;

        if !password::verify_blocking(user.password_hash, request.password).await? {
            warn!("Invalid password for {}", user.user_id);
            return Err(AuthFailure::InvalidPassword.into());
        }

        let issued = self.jwt.issue(user.user_id, user.role)?;

        Ok(LoginResponse {
            access_token: issued.token,
            expired_at: issued.expires_at,
            role: user.role,
        })
    }

    fn validate_registration(&self, request: &RegisterRequest) -> ServiceResult<()> {
        require_min_len("full name", &request.full_name, MIN_FULL_NAME_LEN)?;
        require_min_len("password", &request.password, MIN_PASSWORD_LEN)?;
        self.validators.require_email(&request.email)?;
        self.validators.require_phone(&request.telepon)?;
        Ok(())
    }
}

fn email_taken() -> ServiceError {
    ServiceError::Conflict("email is existed".to_string())
}
