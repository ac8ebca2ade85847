//! Credential store used by registration and login

use anyhow::Result;
use async_trait::async_trait;
use common::role::Role;
use uuid::Uuid;

use crate::models::{NewAccount, UserCredentials};

#[cfg(test)]
pub mod memory;
pub mod user;

pub use user::UserRepository;

/// Persistence of user accounts
#[async_trait]
pub trait CredentialStore: Clone + Send + Sync + 'static {
    /// Find an account and its role by email
    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>>;

    /// Stable id of the role row named after `role`
    async fn role_id(&self, role: Role) -> Result<Option<Uuid>>;

    /// Whether a location with this id exists
    async fn location_exists(&self, location_id: Uuid) -> Result<bool>;

    /// Persist the user, its profile and (for sellers) its stall as one unit
    ///
    /// Returns `None` when the email is already registered.
    async fn create_account(&self, account: &NewAccount) -> Result<Option<Uuid>>;
}
