//! Postgres fixtures for tests that run against `DATABASE_URL`
//!
//! Every fixture row carries fresh ids and emails, so tests can share one
//! database and run in parallel. Without `DATABASE_URL` the tests skip.

use anyhow::Result;
use common::database::{DatabaseConfig, init_pool, run_migrations};
use common::role::Role;
use sqlx::PgPool;
use uuid::Uuid;

pub async fn connect() -> Option<PgPool> {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL not set, skipping");
        return None;
    }

    let config = DatabaseConfig::from_env().ok()?;
    let pool = init_pool(&config).await.ok()?;
    run_migrations(&pool).await.ok()?;
    Some(pool)
}

/// One region with a seller, their stall and a customer
pub struct Market {
    pub location_id: Uuid,
    pub daerah: String,
    pub seller_id: Uuid,
    pub customer_id: Uuid,
    pub stall_id: Uuid,
}

pub async fn seed_market(pool: &PgPool) -> Result<Market> {
    let daerah = format!("Daerah {}", Uuid::new_v4());
    let location_id: Uuid =
        sqlx::query_scalar("INSERT INTO locations (daerah) VALUES ($1) RETURNING id")
            .bind(&daerah)
            .fetch_one(pool)
            .await?;

    let seller_id = insert_user(pool, Role::Seller, location_id).await?;
    let customer_id = insert_user(pool, Role::Customer, location_id).await?;

    let stall_id: Uuid = sqlx::query_scalar(
        "INSERT INTO stalls (name, user_id, location_id) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind("Lapak Uji Coba")
    .bind(seller_id)
    .bind(location_id)
    .fetch_one(pool)
    .await?;

    Ok(Market {
        location_id,
        daerah,
        seller_id,
        customer_id,
        stall_id,
    })
}

/// Account with a profile in `location_id`
pub async fn insert_user(pool: &PgPool, role: Role, location_id: Uuid) -> Result<Uuid> {
    let user_id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO users (full_name, email, password, role_id)
        SELECT $1, $2, $3, id FROM roles WHERE name = $4
        RETURNING id
        "#,
    )
    .bind(format!("Pengguna {role}"))
    .bind(email_for(role))
    .bind("not-a-real-hash")
    .bind(role.as_str())
    .fetch_one(pool)
    .await?;

    sqlx::query("INSERT INTO user_profiles (user_id, telepon, location_id) VALUES ($1, $2, $3)")
        .bind(user_id)
        .bind("081234567890")
        .bind(location_id)
        .execute(pool)
        .await?;

    Ok(user_id)
}

pub fn email_for(role: Role) -> String {
    format!("{}-{}@example.com", role.as_str().to_lowercase(), Uuid::new_v4())
}

pub async fn add_product(pool: &PgPool, stall_id: Uuid, stock: i32) -> Result<Uuid> {
    let id = sqlx::query_scalar(
        r#"
        INSERT INTO products (name, stock, category, image_url, stall_id)
        VALUES ($1, $2, 'makanan', $3, $4)
        RETURNING id
        "#,
    )
    .bind("Nasi Goreng Kampung")
    .bind(stock)
    .bind("https://img.example.com/nasi-goreng.jpg")
    .bind(stall_id)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

pub async fn stock_of(pool: &PgPool, product_id: Uuid) -> Result<i32> {
    let stock = sqlx::query_scalar("SELECT stock FROM products WHERE id = $1")
        .bind(product_id)
        .fetch_one(pool)
        .await?;

    Ok(stock)
}
