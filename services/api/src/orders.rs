//! Order transactions
//!
//! Placing an order and cancelling one are the only operations that move
//! stock. Each runs as one ledger transaction holding the product row lock,
//! so the stock check and the write cannot interleave with another order.

use common::error::{Resource, ServiceError, ServiceResult};
use tracing::{info, warn};
use uuid::Uuid;

use crate::ledger::{InventoryLedger, LedgerTx, NewOrder};
use crate::models::order::{
    CreateOrderRequest, Order, UpdateOrderRequest, order_name, require_status,
};

/// Creates, cancels and reads orders
#[derive(Clone)]
pub struct OrderService<L> {
    ledger: L,
}

impl<L: InventoryLedger> OrderService<L> {
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    /// Record an order for `buyer_id` and take its quantity out of stock
    pub async fn create_order(
        &self,
        buyer_id: Uuid,
        product_id: Uuid,
        request: CreateOrderRequest,
    ) -> ServiceResult<()> {
        let mut tx = self.ledger.begin().await?;

        let product = tx
            .product_for_update(product_id)
            .await?
            .ok_or(ServiceError::NotFound(Resource::Product))?;

        request.validate()?;

        if product.stock < request.quantity {
            warn!(
                "Order of {} rejected, product {} has {} left",
                request.quantity, product.id, product.stock
            );
            return Err(ServiceError::invalid(format!(
                "insufficient stock: {} left",
                product.stock
            )));
        }

        let order_id = tx
            .insert_order(&NewOrder {
                name: order_name(request.quantity, &product.name),
                status: request.status,
                user_id: buyer_id,
                product_id: product.id,
                quantity: request.quantity,
            })
            .await?;
        tx.set_stock(product.id, product.stock - request.quantity)
            .await?;
        tx.commit().await?;

        info!("Order {} placed by {}", order_id, buyer_id);
        Ok(())
    }

    /// Remove an order and put its quantity back into stock
    pub async fn cancel_order(&self, order_id: Uuid) -> ServiceResult<()> {
        let mut tx = self.ledger.begin().await?;

        let order = tx
            .order_for_update(order_id)
            .await?
            .ok_or(ServiceError::NotFound(Resource::Order))?;
        let product = tx
            .product_for_update(order.product_id)
            .await?
            .ok_or(ServiceError::NotFound(Resource::Product))?;

        tx.delete_order(order.id).await?;
        tx.set_stock(product.id, product.stock + order.quantity).await?;
        tx.commit().await?;

        info!(
            "Order {} cancelled, {} returned to stock",
            order.id, order.quantity
        );
        Ok(())
    }

    pub async fn update_status(
        &self,
        order_id: Uuid,
        request: UpdateOrderRequest,
    ) -> ServiceResult<()> {
        if self.ledger.find_order(order_id).await?.is_none() {
            return Err(ServiceError::NotFound(Resource::Order));
        }
        require_status(&request.status)?;

        if !self
            .ledger
            .update_order_status(order_id, &request.status)
            .await?
        {
            return Err(ServiceError::NotFound(Resource::Order));
        }

        Ok(())
    }

    pub async fn list_all(&self) -> ServiceResult<Vec<Order>> {
        Ok(self.ledger.list_orders(None).await?)
    }

    /// Orders placed by `buyer_id`
    pub async fn list_for_buyer(&self, buyer_id: Uuid) -> ServiceResult<Vec<Order>> {
        Ok(self.ledger.list_orders(Some(buyer_id)).await?)
    }

    pub async fn get(&self, order_id: Uuid) -> ServiceResult<Order> {
        self.ledger
            .find_order(order_id)
            .await?
            .ok_or(ServiceError::NotFound(Resource::Order))
    }
}
