//! Product models

use chrono::{DateTime, Utc};
use common::error::{ServiceError, ServiceResult};
use common::validation::{MIN_CATALOG_NAME_LEN, require_min_len};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Product category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductCategory {
    /// "makanan"
    #[serde(rename = "makanan")]
    Food,
    /// "minuman"
    #[serde(rename = "minuman")]
    Beverage,
}

impl ProductCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Food => "makanan",
            ProductCategory::Beverage => "minuman",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("category must be makanan or minuman, got {0:?}")]
pub struct UnknownCategory(pub String);

impl FromStr for ProductCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "makanan" => Ok(ProductCategory::Food),
            "minuman" => Ok(ProductCategory::Beverage),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

/// Product joined with its stall and region
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub product_id: Uuid,
    pub product_name: String,
    #[serde(rename = "stok")]
    pub stock: i32,
    #[serde(rename = "product_kategori")]
    pub category: ProductCategory,
    pub product_img: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    pub lapak_id: Uuid,
    pub lapak_name: String,
    pub location_id: Uuid,
    pub daerah: String,
}

/// Payload for listing a product under a stall
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductRequest {
    pub product_name: String,
    #[serde(rename = "stok")]
    pub stock: i32,
    #[serde(rename = "product_kategori")]
    pub category: String,
    pub product_img: String,
}

/// Validated product ready to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub stock: i32,
    pub category: ProductCategory,
    pub image_url: String,
}

impl CreateProductRequest {
    pub fn validate(self) -> ServiceResult<NewProduct> {
        require_min_len("product name", &self.product_name, MIN_CATALOG_NAME_LEN)?;

        if self.stock < 1 {
            return Err(ServiceError::invalid("stock must be at least 1"));
        }

        let category = self
            .category
            .parse()
            .map_err(|e: UnknownCategory| ServiceError::invalid(e.to_string()))?;

        if self.product_img.trim().is_empty() {
            return Err(ServiceError::invalid("product image is required"));
        }

        Ok(NewProduct {
            name: self.product_name,
            stock: self.stock,
            category,
            image_url: self.product_img,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateProductRequest {
        CreateProductRequest {
            product_name: "Es Teh Manis".to_string(),
            stock: 20,
            category: "minuman".to_string(),
            product_img: "https://img.example.com/es-teh.jpg".to_string(),
        }
    }

    #[test]
    fn valid_request_becomes_new_product() {
        let product = request().validate().unwrap();
        assert_eq!(product.category, ProductCategory::Beverage);
        assert_eq!(product.stock, 20);
    }

    #[test]
    fn rejects_out_of_policy_products() {
        let mut no_stock = request();
        no_stock.stock = 0;
        let mut bad_category = request();
        bad_category.category = "pakaian".to_string();
        let mut short_name = request();
        short_name.product_name = "Teh".to_string();
        let mut no_image = request();
        no_image.product_img = " ".to_string();

        for invalid in [no_stock, bad_category, short_name, no_image] {
            assert!(matches!(
                invalid.validate(),
                Err(ServiceError::InvalidRequest(_))
            ));
        }
    }

    #[test]
    fn category_uses_indonesian_names_on_the_wire() {
        assert_eq!(
            serde_json::to_value(ProductCategory::Food).unwrap(),
            serde_json::json!("makanan")
        );
        assert!("drink".parse::<ProductCategory>().is_err());
    }
}
