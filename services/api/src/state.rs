//! Application state shared across handlers

use axum::extract::FromRef;
use common::jwt::JwtService;
use sqlx::PgPool;

use crate::{
    accounts::AccountService, catalog::Catalog, orders::OrderService, repositories::PgLedger,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt: JwtService,
    pub orders: OrderService<PgLedger>,
    pub catalog: Catalog,
    pub accounts: AccountService,
}

impl FromRef<AppState> for JwtService {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}
