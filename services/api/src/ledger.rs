//! Inventory ledger: products with a stock counter and the orders placed
//! against them.
//!
//! Stock only changes inside a [`LedgerTx`]. A transaction that is dropped
//! without [`LedgerTx::commit`] leaves the ledger untouched.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::order::Order;

#[cfg(test)]
pub mod memory;

/// Product row as seen by the order workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockedProduct {
    pub id: Uuid,
    pub name: String,
    pub stock: i32,
}

/// Order row to insert
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub name: String,
    pub status: String,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Persistence of products' stock and of orders
#[async_trait]
pub trait InventoryLedger: Clone + Send + Sync + 'static {
    type Tx: LedgerTx;

    /// Open a unit of work
    async fn begin(&self) -> Result<Self::Tx>;

    async fn find_order(&self, order_id: Uuid) -> Result<Option<Order>>;

    /// All orders, or only those placed by `buyer_id`
    async fn list_orders(&self, buyer_id: Option<Uuid>) -> Result<Vec<Order>>;

    /// Returns false when no order has this id
    async fn update_order_status(&self, order_id: Uuid, status: &str) -> Result<bool>;
}

/// Unit of work over the ledger
///
/// Rows read through the `*_for_update` methods stay locked until the
/// transaction ends.
#[async_trait]
pub trait LedgerTx: Send + Sized {
    async fn product_for_update(&mut self, product_id: Uuid) -> Result<Option<StockedProduct>>;

    async fn order_for_update(&mut self, order_id: Uuid) -> Result<Option<Order>>;

    async fn insert_order(&mut self, order: &NewOrder) -> Result<Uuid>;

    async fn delete_order(&mut self, order_id: Uuid) -> Result<()>;

    async fn set_stock(&mut self, product_id: Uuid, stock: i32) -> Result<()>;

    async fn commit(self) -> Result<()>;
}
