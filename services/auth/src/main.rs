use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod credentials;
mod models;
mod repositories;
mod routes;

use common::{
    config::ServerConfig,
    database::{self, DatabaseConfig},
    jwt::{JwtConfig, JwtService},
    validation::Validators,
};
use sqlx::PgPool;
use tokio::net::TcpListener;

use crate::{credentials::CredentialManager, repositories::UserRepository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub credentials: CredentialManager<UserRepository>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting authentication service");

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

    let jwt_service = JwtService::new(&JwtConfig::from_env()?);
    let validators = Arc::new(Validators::new()?);
    let credentials =
        CredentialManager::new(UserRepository::new(pool.clone()), validators, jwt_service);

    let app_state = AppState {
        db_pool: pool,
        credentials,
    };

    info!("Authentication service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let server = ServerConfig::from_env("AUTH", 3000)?;
    let listener = TcpListener::bind(server.bind_address()).await?;
    info!("Authentication service listening on {}", server.bind_address());

    axum::serve(listener, app).await?;

    Ok(())
}
