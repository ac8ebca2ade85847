//! Integration tests for the infrastructure components
//!
//! These tests run the migrations against the PostgreSQL database named by
//! `DATABASE_URL` and check the constraints the services rely on. They are
//! skipped when no database is configured.

use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
use common::role::Role;
use sqlx::{PgPool, Row};
use uuid::Uuid;

async fn connect() -> Option<PgPool> {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL not set, skipping");
        return None;
    }

    let config = DatabaseConfig::from_env().ok()?;
    let pool = init_pool(&config).await.ok()?;
    run_migrations(&pool).await.ok()?;
    Some(pool)
}

#[tokio::test]
async fn test_migrations_seed_every_role() -> Result<(), Box<dyn std::error::Error>> {
    let Some(pool) = connect().await else {
        return Ok(());
    };

    assert!(health_check(&pool).await?, "Database health check failed");

    let rows = sqlx::query("SELECT name FROM roles").fetch_all(&pool).await?;
    let mut names: Vec<Role> = rows
        .iter()
        .map(|row| row.get::<String, _>("name").parse())
        .collect::<Result<_, _>>()?;
    names.sort_by_key(|role| role.as_str());

    assert_eq!(names, vec![Role::Admin, Role::Customer, Role::Seller]);
    Ok(())
}

#[tokio::test]
async fn test_schema_rejects_negative_stock() -> Result<(), Box<dyn std::error::Error>> {
    let Some(pool) = connect().await else {
        return Ok(());
    };

    // Everything below is rolled back when `tx` is dropped
    let mut tx = pool.begin().await?;

    let location_id: Uuid =
        sqlx::query_scalar("INSERT INTO locations (daerah) VALUES ($1) RETURNING id")
            .bind(format!("Daerah {}", Uuid::new_v4()))
            .fetch_one(&mut *tx)
            .await?;
    let role_id: Uuid = sqlx::query_scalar("SELECT id FROM roles WHERE name = $1")
        .bind(Role::Seller.as_str())
        .fetch_one(&mut *tx)
        .await?;
    let user_id: Uuid = sqlx::query_scalar(
        "INSERT INTO users (full_name, email, password, role_id) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind("Penjual Uji")
    .bind(format!("{}@example.com", Uuid::new_v4()))
    .bind("not-a-real-hash")
    .bind(role_id)
    .fetch_one(&mut *tx)
    .await?;
    let stall_id: Uuid = sqlx::query_scalar(
        "INSERT INTO stalls (name, user_id, location_id) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind("Lapak Penjual Uji")
    .bind(user_id)
    .bind(location_id)
    .fetch_one(&mut *tx)
    .await?;

    let negative = sqlx::query(
        "INSERT INTO products (name, stock, category, image_url, stall_id) VALUES ($1, -1, 'makanan', $2, $3)",
    )
    .bind("Roti Bakar")
    .bind("https://img.example.com/roti.jpg")
    .bind(stall_id)
    .execute(&mut *tx)
    .await;

    let err = negative.expect_err("negative stock must violate the check constraint");
    let db_err = err.as_database_error().expect("database error");
    assert!(db_err.is_check_violation());

    Ok(())
}
