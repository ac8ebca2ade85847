//! Order ("pemesanan") models

use chrono::{DateTime, Utc};
use common::error::{ServiceError, ServiceResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A buyer's order for one product
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    #[serde(rename = "id_pemesanan")]
    pub id: Uuid,
    #[serde(rename = "pemesanan_name")]
    pub name: String,
    pub status: String,
    pub user_id: Uuid,
    pub product_id: Uuid,
    #[serde(rename = "qty")]
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for placing an order
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderRequest {
    pub status: String,
    #[serde(rename = "qty")]
    pub quantity: i32,
}

impl CreateOrderRequest {
    pub fn validate(&self) -> ServiceResult<()> {
        if self.quantity < 1 {
            return Err(ServiceError::invalid("qty must be at least 1"));
        }
        require_status(&self.status)
    }
}

/// Payload for changing an order's status
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOrderRequest {
    pub status: String,
}

pub fn require_status(status: &str) -> ServiceResult<()> {
    if status.trim().is_empty() {
        return Err(ServiceError::invalid("status is required"));
    }
    Ok(())
}

/// Display name recorded on a new order
pub fn order_name(quantity: i32, product_name: &str) -> String {
    format!("Pesanan: {quantity} {product_name}")
}
