//! In-memory ledger for tests
//!
//! A transaction holds the ledger lock from `begin` until it is committed or
//! dropped, and works on a copy of the books that only replaces the shared
//! state on commit.

use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use super::{InventoryLedger, LedgerTx, NewOrder, StockedProduct};
use crate::models::order::Order;

#[derive(Debug, Clone, Default)]
struct Books {
    products: HashMap<Uuid, StockedProduct>,
    orders: HashMap<Uuid, Order>,
    fail_stock_writes: bool,
}

#[derive(Clone, Default)]
pub struct MemoryLedger {
    books: Arc<Mutex<Books>>,
}

impl MemoryLedger {
    pub async fn add_product(&self, name: &str, stock: i32) -> Uuid {
        let id = Uuid::new_v4();
        self.books.lock().await.products.insert(
            id,
            StockedProduct {
                id,
                name: name.to_string(),
                stock,
            },
        );
        id
    }

    pub async fn stock_of(&self, product_id: Uuid) -> Option<i32> {
        self.books
            .lock()
            .await
            .products
            .get(&product_id)
            .map(|product| product.stock)
    }

    pub async fn order_count(&self) -> usize {
        self.books.lock().await.orders.len()
    }

    /// Make every later stock write fail
    pub async fn fail_stock_writes(&self) {
        self.books.lock().await.fail_stock_writes = true;
    }
}

pub struct MemoryTx {
    guard: OwnedMutexGuard<Books>,
    draft: Books,
}

#[async_trait]
impl InventoryLedger for MemoryLedger {
    type Tx = MemoryTx;

    async fn begin(&self) -> Result<MemoryTx> {
        let guard = self.books.clone().lock_owned().await;
        let draft = guard.clone();
        Ok(MemoryTx { guard, draft })
    }

    async fn find_order(&self, order_id: Uuid) -> Result<Option<Order>> {
        Ok(self.books.lock().await.orders.get(&order_id).cloned())
    }

    async fn list_orders(&self, buyer_id: Option<Uuid>) -> Result<Vec<Order>> {
        let books = self.books.lock().await;
        let mut orders: Vec<Order> = books
            .orders
            .values()
            .filter(|order| buyer_id.is_none_or(|buyer| order.user_id == buyer))
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn update_order_status(&self, order_id: Uuid, status: &str) -> Result<bool> {
        let mut books = self.books.lock().await;
        match books.orders.get_mut(&order_id) {
            Some(order) => {
                order.status = status.to_string();
                order.updated_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl LedgerTx for MemoryTx {
    async fn product_for_update(&mut self, product_id: Uuid) -> Result<Option<StockedProduct>> {
        Ok(self.draft.products.get(&product_id).cloned())
    }

    async fn order_for_update(&mut self, order_id: Uuid) -> Result<Option<Order>> {
        Ok(self.draft.orders.get(&order_id).cloned())
    }

    async fn insert_order(&mut self, order: &NewOrder) -> Result<Uuid> {
        let id = Uuid::new_v4();
        self.draft.orders.insert(
            id,
            Order {
                id,
                name: order.name.clone(),
                status: order.status.clone(),
                user_id: order.user_id,
                product_id: order.product_id,
                quantity: order.quantity,
                created_at: Utc::now(),
                updated_at: None,
            },
        );
        Ok(id)
    }

    async fn delete_order(&mut self, order_id: Uuid) -> Result<()> {
        self.draft.orders.remove(&order_id);
        Ok(())
    }

    async fn set_stock(&mut self, product_id: Uuid, stock: i32) -> Result<()> {
        if self.draft.fail_stock_writes {
            bail!("stock write failed for product {}", product_id);
        }
        if stock < 0 {
            bail!("stock of product {} would become {}", product_id, stock);
        }
        match self.draft.products.get_mut(&product_id) {
            Some(product) => product.stock = stock,
            None => bail!("product {} vanished", product_id),
        }
        Ok(())
    }

    async fn commit(self) -> Result<()> {
        let MemoryTx { mut guard, draft } = self;
        *guard = draft;
        Ok(())
    }
}
