//! Stall repository for database operations

use anyhow::Result;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::models::stall::{Stall, StallStatus};

const STALL_SELECT: &str = r#"
    SELECT u.id AS user_id,
           u.full_name,
           s.id AS lapak_id,
           s.name AS lapak_name,
           s.status,
           loc.id AS location_id,
           loc.daerah
    FROM stalls s
    JOIN users u ON u.id = s.user_id
    JOIN locations loc ON loc.id = s.location_id
"#;

fn stall_from_row(row: &PgRow) -> Result<Stall> {
    let status: String = row.get("status");

    Ok(Stall {
        user_id: row.get("user_id"),
        full_name: row.get("full_name"),
        lapak_id: row.get("lapak_id"),
        lapak_name: row.get("lapak_name"),
        status: status.parse()?,
        location_id: row.get("location_id"),
        daerah: row.get("daerah"),
    })
}

/// Stall repository for database operations
#[derive(Clone)]
pub struct StallRepository {
    pool: PgPool,
}

impl StallRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Stalls whose name contains `search`, optionally limited to a region
    pub async fn search(
        &self,
        search: Option<&str>,
        daerah: Option<&str>,
    ) -> Result<Vec<Stall>> {
        let rows = sqlx::query(&format!(
            r#"
            {STALL_SELECT}
            WHERE ($1::text IS NULL OR s.name ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR loc.daerah = $2)
            ORDER BY s.name
            "#
        ))
        .bind(search)
        .bind(daerah)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(stall_from_row).collect()
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Stall>> {
        let row = sqlx::query(&format!("{STALL_SELECT} WHERE s.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(stall_from_row).transpose()
    }

    pub async fn update(&self, id: Uuid, name: &str, status: StallStatus) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE stalls
            SET name = $1, status = $2, updated_at = now()
            WHERE id = $3
            "#,
        )
        .bind(name)
        .bind(status.as_str())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn update_status(&self, id: Uuid, status: StallStatus) -> Result<()> {
        sqlx::query("UPDATE stalls SET status = $1, updated_at = now() WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete a stall; its products and their orders go with it
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM stalls WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
