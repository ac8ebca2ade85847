use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod accounts;
mod catalog;
mod error;
mod ledger;
mod middleware;
mod models;
mod orders;
mod repositories;
mod routes;
mod state;
#[cfg(test)]
mod testing;

use common::{
    config::ServerConfig,
    database::{self, DatabaseConfig},
    jwt::{JwtConfig, JwtService},
    validation::Validators,
};
use tokio::net::TcpListener;

use crate::{
    accounts::AccountService,
    catalog::Catalog,
    orders::OrderService,
    repositories::{PgLedger, ProductRepository, StallRepository, UserRepository},
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting API service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    // Check database connectivity
    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    database::run_migrations(&pool).await?;

    let jwt = JwtService::new(&JwtConfig::from_env()?);
    let validators = Arc::new(Validators::new()?);

    // Initialize repositories
    let users = UserRepository::new(pool.clone());
    let catalog = Catalog::new(
        StallRepository::new(pool.clone()),
        ProductRepository::new(pool.clone()),
        users.clone(),
    );

    let app_state = AppState {
        orders: OrderService::new(PgLedger::new(pool.clone())),
        accounts: AccountService::new(users, validators),
        catalog,
        jwt,
        db_pool: pool,
    };

    info!("API service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let server = ServerConfig::from_env("API", 3001)?;
    let listener = TcpListener::bind(server.bind_address()).await?;
    info!("API service listening on {}", server.bind_address());

    axum::serve(listener, app).await?;

    Ok(())
}
