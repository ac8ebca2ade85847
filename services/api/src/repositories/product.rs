//! Product repository for database operations

use anyhow::Result;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::models::product::{NewProduct, Product};

const PRODUCT_SELECT: &str = r#"
    SELECT p.id AS product_id,
           p.name AS product_name,
           p.stock,
           p.category,
           p.image_url,
           p.created_at,
           p.updated_at,
           s.id AS lapak_id,
           s.name AS lapak_name,
           loc.id AS location_id,
           loc.daerah
    FROM products p
    JOIN stalls s ON s.id = p.stall_id
    JOIN locations loc ON loc.id = s.location_id
"#;

fn product_from_row(row: &PgRow) -> Result<Product> {
    let category: String = row.get("category");

    Ok(Product {
        product_id: row.get("product_id"),
        product_name: row.get("product_name"),
        stock: row.get("stock"),
        category: category.parse()?,
        product_img: row.get("image_url"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        lapak_id: row.get("lapak_id"),
        lapak_name: row.get("lapak_name"),
        location_id: row.get("location_id"),
        daerah: row.get("daerah"),
    })
}

/// Product repository for database operations
#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a product under `stall_id` with its opening stock
    pub async fn create(&self, stall_id: Uuid, product: &NewProduct) -> Result<Uuid> {
        let id = sqlx::query_scalar(
            r#"
            INSERT INTO products (name, stock, category, image_url, stall_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&product.name)
        .bind(product.stock)
        .bind(product.category.as_str())
        .bind(&product.image_url)
        .bind(stall_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// Products whose name contains `search`, optionally limited to a region
    pub async fn search(
        &self,
        search: Option<&str>,
        daerah: Option<&str>,
    ) -> Result<Vec<Product>> {
        let rows = sqlx::query(&format!(
            r#"
            {PRODUCT_SELECT}
            WHERE ($1::text IS NULL OR p.name ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR loc.daerah = $2)
            ORDER BY p.created_at DESC
            "#
        ))
        .bind(search)
        .bind(daerah)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(product_from_row).collect()
    }

    pub async fn list_by_stall(&self, stall_id: Uuid) -> Result<Vec<Product>> {
        let rows = sqlx::query(&format!(
            "{PRODUCT_SELECT} WHERE p.stall_id = $1 ORDER BY p.created_at DESC"
        ))
        .bind(stall_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(product_from_row).collect()
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>> {
        let row = sqlx::query(&format!("{PRODUCT_SELECT} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(product_from_row).transpose()
    }
}
