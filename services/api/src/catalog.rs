//! Stalls and the products listed under them

use common::error::{Resource, ServiceError, ServiceResult};
use common::role::Role;
use tracing::info;
use uuid::Uuid;

use crate::middleware::Session;
use crate::models::product::{CreateProductRequest, Product};
use crate::models::stall::{Stall, UpdateStallRequest, UpdateStallStatusRequest};
use crate::repositories::{ProductRepository, StallRepository, UserRepository};

/// Admins manage every stall, sellers only their own
pub fn ensure_manages(session: &Session, stall: &Stall) -> ServiceResult<()> {
    match session.role {
        Role::Admin => Ok(()),
        Role::Seller if stall.user_id == session.user_id => Ok(()),
        _ => Err(ServiceError::Forbidden),
    }
}

#[derive(Clone)]
pub struct Catalog {
    stalls: StallRepository,
    products: ProductRepository,
    users: UserRepository,
}

impl Catalog {
    pub fn new(
        stalls: StallRepository,
        products: ProductRepository,
        users: UserRepository,
    ) -> Self {
        Self {
            stalls,
            products,
            users,
        }
    }

    pub async fn list_stalls(&self, search: Option<&str>) -> ServiceResult<Vec<Stall>> {
        Ok(self.stalls.search(search, None).await?)
    }

    /// Stalls in the caller's own region
    pub async fn list_stalls_near(
        &self,
        session: &Session,
        search: Option<&str>,
    ) -> ServiceResult<Vec<Stall>> {
        let daerah = self
            .users
            .region_of(session.user_id)
            .await?
            .ok_or(ServiceError::NotFound(Resource::Profile))?;

        Ok(self.stalls.search(search, Some(daerah.as_str())).await?)
    }

    pub async fn get_stall(&self, id: Uuid) -> ServiceResult<Stall> {
        self.stalls
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(Resource::Stall))
    }

    pub async fn update_stall(
        &self,
        session: &Session,
        id: Uuid,
        request: UpdateStallRequest,
    ) -> ServiceResult<()> {
        let stall = self.get_stall(id).await?;
        ensure_manages(session, &stall)?;
        let status = request.validate()?;

        self.stalls.update(id, &request.name, status).await?;
        info!("Stall {} updated by {}", id, session.user_id);
        Ok(())
    }

    pub async fn update_stall_status(
        &self,
        session: &Session,
        id: Uuid,
        request: UpdateStallStatusRequest,
    ) -> ServiceResult<()> {
        let stall = self.get_stall(id).await?;
        ensure_manages(session, &stall)?;
        let status = request.validate()?;

        self.stalls.update_status(id, status).await?;
        info!("Stall {} is now {}", id, status);
        Ok(())
    }

    pub async fn delete_stall(&self, id: Uuid) -> ServiceResult<()> {
        if !self.stalls.delete(id).await? {
            return Err(ServiceError::NotFound(Resource::Stall));
        }

        info!("Stall {} deleted", id);
        Ok(())
    }

    /// List a new product under a stall the caller manages
    pub async fn create_product(
        &self,
        session: &Session,
        stall_id: Uuid,
        request: CreateProductRequest,
    ) -> ServiceResult<Uuid> {
        let stall = self.get_stall(stall_id).await?;
        ensure_manages(session, &stall)?;
        let product = request.validate()?;

        let id = self.products.create(stall_id, &product).await?;
        info!("Product {} listed under stall {}", id, stall_id);
        Ok(id)
    }

    /// Products matching `search`, limited to the caller's region when they
    /// have a profile
    pub async fn list_products(
        &self,
        session: &Session,
        search: Option<&str>,
    ) -> ServiceResult<Vec<Product>> {
        let daerah = self.users.region_of(session.user_id).await?;
        Ok(self.products.search(search, daerah.as_deref()).await?)
    }

    pub async fn list_stall_products(&self, stall_id: Uuid) -> ServiceResult<Vec<Product>> {
        self.get_stall(stall_id).await?;
        Ok(self.products.list_by_stall(stall_id).await?)
    }

    pub async fn get_product(&self, id: Uuid) -> ServiceResult<Product> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(Resource::Product))
    }
}
