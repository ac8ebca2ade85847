//! Postgres inventory ledger

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow};
use uuid::Uuid;

use crate::ledger::{InventoryLedger, LedgerTx, NewOrder, StockedProduct};
use crate::models::order::Order;

const ORDER_COLUMNS: &str =
    "id, name, status, user_id, product_id, quantity, created_at, updated_at";

fn order_from_row(row: &PgRow) -> Order {
    Order {
        id: row.get("id"),
        name: row.get("name"),
        status: row.get("status"),
        user_id: row.get("user_id"),
        product_id: row.get("product_id"),
        quantity: row.get("quantity"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Order and stock persistence backed by Postgres
#[derive(Clone)]
pub struct PgLedger {
    pool: PgPool,
}

impl PgLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Open Postgres transaction; rolled back on drop
pub struct PgLedgerTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl InventoryLedger for PgLedger {
    type Tx = PgLedgerTx;

    async fn begin(&self) -> Result<PgLedgerTx> {
        Ok(PgLedgerTx {
            tx: self.pool.begin().await?,
        })
    }

    async fn find_order(&self, order_id: Uuid) -> Result<Option<Order>> {
        let row = sqlx::query(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(order_from_row))
    }

    async fn list_orders(&self, buyer_id: Option<Uuid>) -> Result<Vec<Order>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {ORDER_COLUMNS}
            FROM orders
            WHERE ($1::uuid IS NULL OR user_id = $1)
            ORDER BY created_at DESC
            "#
        ))
        .bind(buyer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(order_from_row).collect())
    }

    async fn update_order_status(&self, order_id: Uuid, status: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = $1, updated_at = now()
            WHERE id = $2
            "#,
        )
        .bind(status)
        .bind(order_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl LedgerTx for PgLedgerTx {
    async fn product_for_update(&mut self, product_id: Uuid) -> Result<Option<StockedProduct>> {
        let row = sqlx::query("SELECT id, name, stock FROM products WHERE id = $1 FOR UPDATE")
            .bind(product_id)
            .fetch_optional(&mut *self.tx)
            .await?;

        Ok(row.map(|row| StockedProduct {
            id: row.get("id"),
            name: row.get("name"),
            stock: row.get("stock"),
        }))
    }

    async fn order_for_update(&mut self, order_id: Uuid) -> Result<Option<Order>> {
        let row = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 FOR UPDATE"
        ))
        .bind(order_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(row.as_ref().map(order_from_row))
    }

    async fn insert_order(&mut self, order: &NewOrder) -> Result<Uuid> {
        let id = sqlx::query_scalar(
            r#"
            INSERT INTO orders (name, status, user_id, product_id, quantity)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&order.name)
        .bind(&order.status)
        .bind(order.user_id)
        .bind(order.product_id)
        .bind(order.quantity)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(id)
    }

    async fn delete_order(&mut self, order_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(order_id)
            .execute(&mut *self.tx)
            .await?;

        Ok(())
    }

    async fn set_stock(&mut self, product_id: Uuid, stock: i32) -> Result<()> {
        sqlx::query("UPDATE products SET stock = $1, updated_at = now() WHERE id = $2")
            .bind(stock)
            .bind(product_id)
            .execute(&mut *self.tx)
            .await?;

        Ok(())
    }

    async fn commit(self) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
