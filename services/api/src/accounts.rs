//! Account administration

use common::error::{Resource, ServiceError, ServiceResult};
use common::password;
use common::validation::Validators;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::middleware::Session;
use crate::models::user::{UpdateProfileRequest, UpdateUserRequest, UserProfile, UserSummary};
use crate::repositories::{AccountWrite, UserRepository};

/// Only the account owner or an admin may touch an account
pub fn ensure_self_or_admin(session: &Session, user_id: Uuid) -> ServiceResult<()> {
    if session.is_admin() || session.user_id == user_id {
        Ok(())
    } else {
        Err(ServiceError::Forbidden)
    }
}

/// Admins cannot delete the account they are logged in with
pub fn ensure_not_self(session: &Session, user_id: Uuid) -> ServiceResult<()> {
    if session.user_id == user_id {
        return Err(ServiceError::Forbidden);
    }
    Ok(())
}

fn email_taken() -> ServiceError {
    ServiceError::Conflict("email is existed".to_string())
}

/// Map a repository write onto a service outcome
fn account_written(written: AccountWrite, missing: Resource) -> ServiceResult<()> {
    match written {
        AccountWrite::Updated => Ok(()),
        AccountWrite::Missing => Err(ServiceError::NotFound(missing)),
        AccountWrite::EmailTaken => Err(email_taken()),
    }
}

#[derive(Clone)]
pub struct AccountService {
    users: UserRepository,
    validators: Arc<Validators>,
}

impl AccountService {
    pub fn new(users: UserRepository, validators: Arc<Validators>) -> Self {
        Self { users, validators }
    }

    pub async fn list(&self, search: Option<&str>) -> ServiceResult<Vec<UserSummary>> {
        Ok(self.users.search(search).await?)
    }

    pub async fn get(&self, id: Uuid) -> ServiceResult<UserSummary> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(Resource::User))
    }

    pub async fn profile(&self, session: &Session, id: Uuid) -> ServiceResult<UserProfile> {
        ensure_self_or_admin(session, id)?;

        self.users
            .profile(id)
            .await?
            .ok_or(ServiceError::NotFound(Resource::Profile))
    }

    /// Replace name, email and password of an account
    pub async fn update(
        &self,
        session: &Session,
        id: Uuid,
        request: UpdateUserRequest,
    ) -> ServiceResult<()> {
        ensure_self_or_admin(session, id)?;
        request.validate(&self.validators)?;
        self.get(id).await?;

        self.ensure_email_free(id, &request.email).await?;

        let password_hash = password::hash_blocking(request.password).await?;
        let written = self
            .users
            .update(id, &request.full_name, &request.email, &password_hash)
            .await?;
        account_written(written, Resource::User)?;

        info!("Account {} updated by {}", id, session.user_id);
        Ok(())
    }

    /// Replace name, email, birth date, gender and phone number
    pub async fn update_profile(
        &self,
        session: &Session,
        id: Uuid,
        request: UpdateProfileRequest,
    ) -> ServiceResult<()> {
        ensure_self_or_admin(session, id)?;
        let update = request.validate(&self.validators)?;
        self.get(id).await?;
        self.ensure_email_free(id, &update.email).await?;

        let written = self.users.update_profile(id, &update).await?;
        account_written(written, Resource::Profile)?;

        info!("Profile {} updated by {}", id, session.user_id);
        Ok(())
    }

    async fn ensure_email_free(&self, id: Uuid, email: &str) -> ServiceResult<()> {
        match self.users.id_by_email(email).await? {
            Some(owner) if owner != id => {
                warn!("Email update for {} collides with {}", id, owner);
                Err(email_taken())
            }
            _ => Ok(()),
        }
    }

    pub async fn delete(&self, session: &Session, id: Uuid) -> ServiceResult<()> {
        ensure_not_self(session, id)?;

        if !self.users.delete(id).await? {
            return Err(ServiceError::NotFound(Resource::User));
        }

        info!("Account {} deleted by {}", id, session.user_id);
        Ok(())
    }
}
