//! User repository for database operations

use anyhow::Result;
use async_trait::async_trait;
use common::role::Role;
use sqlx::{PgPool, Row};
use tracing::{info, warn};
use uuid::Uuid;

use super::CredentialStore;
use crate::models::{NewAccount, UserCredentials};

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for UserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>> {
        let row = sqlx::query(
            r#"
            SELECT u.id, u.password, r.name AS role_name
            FROM users u
            JOIN roles r ON r.id = u.role_id
            WHERE u.email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let role_name: String = row.get("role_name");
                let user = UserCredentials {
                    user_id: row.get("id"),
                    password_hash: row.get("password"),
                    role: role_name.parse()?,
                };
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    async fn role_id(&self, role: Role) -> Result<Option<Uuid>> {
        let id = sqlx::query_scalar("SELECT id FROM roles WHERE name = $1")
            .bind(role.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(id)
    }

    async fn location_exists(&self, location_id: Uuid) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM locations WHERE id = $1)")
                .bind(location_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn create_account(&self, account: &NewAccount) -> Result<Option<Uuid>> {
        info!("Creating account for {}", account.email);

        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query_scalar(
            r#"
            INSERT INTO users (full_name, email, password, role_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&account.full_name)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.role_id)
        .fetch_one(&mut *tx)
        .await;

        let user_id: Uuid = match inserted {
            Ok(id) => id,
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                warn!("Email {} registered concurrently", account.email);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        sqlx::query(
            r#"
            INSERT INTO user_profiles (user_id, telepon, location_id)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user_id)
        .bind(&account.telepon)
        .bind(account.location_id)
        .execute(&mut *tx)
        .await?;

        if let Some(stall_name) = &account.stall_name {
            sqlx::query(
                r#"
                INSERT INTO stalls (name, user_id, location_id)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(stall_name)
            .bind(user_id)
            .bind(account.location_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!("Account {} created", user_id);
        Ok(Some(user_id))
    }
}
