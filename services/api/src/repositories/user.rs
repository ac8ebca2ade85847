//! User repository for database operations

use anyhow::Result;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::warn;
use uuid::Uuid;

use crate::models::user::{ProfileUpdate, UserProfile, UserSummary};

/// Result of writing account fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountWrite {
    Updated,
    /// No row to update
    Missing,
    /// Another account holds the email
    EmailTaken,
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn summary_from_row(row: &PgRow) -> Result<UserSummary> {
    let role: String = row.get("role_name");

    Ok(UserSummary {
        id: row.get("id"),
        full_name: row.get("full_name"),
        email: row.get("email"),
        role: role.parse()?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// User repository for database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Users whose name or email contains `search`
    pub async fn search(&self, search: Option<&str>) -> Result<Vec<UserSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT u.id, u.full_name, u.email, r.name AS role_name, u.created_at, u.updated_at
            FROM users u
            JOIN roles r ON r.id = u.role_id
            WHERE ($1::text IS NULL
                   OR u.full_name ILIKE '%' || $1 || '%'
                   OR u.email ILIKE '%' || $1 || '%')
            ORDER BY u.created_at DESC
            "#,
        )
        .bind(search)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(summary_from_row).collect()
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserSummary>> {
        let row = sqlx::query(
            r#"
            SELECT u.id, u.full_name, u.email, r.name AS role_name, u.created_at, u.updated_at
            FROM users u
            JOIN roles r ON r.id = u.role_id
            WHERE u.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(summary_from_row).transpose()
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<Option<UserProfile>> {
        let row = sqlx::query(
            r#"
            SELECT u.id AS user_id, u.full_name, u.email, p.telepon,
                   p.gender, p.tanggal_lahir,
                   loc.id AS location_id, loc.daerah, u.created_at, u.updated_at
            FROM users u
            JOIN user_profiles p ON p.user_id = u.id
            JOIN locations loc ON loc.id = p.location_id
            WHERE u.id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let gender: Option<String> = row.get("gender");

        Ok(Some(UserProfile {
            user_id: row.get("user_id"),
            full_name: row.get("full_name"),
            email: row.get("email"),
            telepon: row.get("telepon"),
            gender: gender.map(|g| g.parse()).transpose()?,
            tanggal_lahir: row.get("tanggal_lahir"),
            location_id: row.get("location_id"),
            daerah: row.get("daerah"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }))
    }

    /// Region name from the user's profile, if they have one
    pub async fn region_of(&self, user_id: Uuid) -> Result<Option<String>> {
        let daerah = sqlx::query_scalar(
            r#"
            SELECT loc.daerah
            FROM user_profiles p
            JOIN locations loc ON loc.id = p.location_id
            WHERE p.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(daerah)
    }

    /// Id of the account registered with `email`
    pub async fn id_by_email(&self, email: &str) -> Result<Option<Uuid>> {
        let id = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(id)
    }

    pub async fn update(
        &self,
        id: Uuid,
        full_name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<AccountWrite> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET full_name = $1, email = $2, password = $3, updated_at = now()
            WHERE id = $4
            "#,
        )
        .bind(full_name)
        .bind(email)
        .bind(password_hash)
        .bind(id)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() > 0 => Ok(AccountWrite::Updated),
            Ok(_) => Ok(AccountWrite::Missing),
            Err(e) if is_unique_violation(&e) => {
                warn!("Email {} taken while updating {}", email, id);
                Ok(AccountWrite::EmailTaken)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Write account and profile details together
    pub async fn update_profile(&self, id: Uuid, update: &ProfileUpdate) -> Result<AccountWrite> {
        let mut tx = self.pool.begin().await?;

        let account = sqlx::query(
            r#"
            UPDATE users
            SET full_name = $1, email = $2, updated_at = now()
            WHERE id = $3
            "#,
        )
        .bind(&update.full_name)
        .bind(&update.email)
        .bind(id)
        .execute(&mut *tx)
        .await;

        match account {
            Ok(done) if done.rows_affected() == 0 => return Ok(AccountWrite::Missing),
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                warn!("Email {} taken while updating profile {}", update.email, id);
                return Ok(AccountWrite::EmailTaken);
            }
            Err(e) => return Err(e.into()),
        }

        let profile = sqlx::query(
            r#"
            UPDATE user_profiles
            SET telepon = $1, gender = $2, tanggal_lahir = $3, updated_at = now()
            WHERE user_id = $4
            "#,
        )
        .bind(&update.telepon)
        .bind(update.gender.as_str())
        .bind(update.birth_date)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if profile.rows_affected() == 0 {
            return Ok(AccountWrite::Missing);
        }

        tx.commit().await?;
        Ok(AccountWrite::Updated)
    }

    /// Delete an account with its profile, stalls and orders
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
