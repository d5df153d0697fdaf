use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};

/// A purchasable configuration of a product carrying its own prices and
/// stock count.
///
/// `quantity` is the only field in the system with contested concurrent
/// writers; all writes to it go through the invoice coordinator's
/// lock-plan-write path or a product edit, never ad hoc.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: String,
    pub name: String,
    pub cost_price: Decimal,
    pub selling_price: Decimal,
    /// Units on hand; never negative
    pub quantity: i64,
}

/// A catalog product with its ordered variants (at least one).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub hsn_sac_code: String,
    /// GST percentage applied to every variant of this product
    pub gst_rate: Decimal,
    pub variants: Vec<ProductVariant>,
}

impl Product {
    pub fn variant(&self, variant_id: &str) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| v.id == variant_id)
    }

    pub fn variant_mut(&mut self, variant_id: &str) -> Option<&mut ProductVariant> {
        self.variants.iter_mut().find(|v| v.id == variant_id)
    }
}

/// One variant as submitted by product create/update.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantRequest {
    /// Present when editing an existing variant; absent for new ones
    pub id: Option<String>,
    pub name: String,
    pub cost_price: Decimal,
    pub selling_price: Decimal,
    pub quantity: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub hsn_sac_code: String,
    pub gst_rate: Decimal,
    pub variants: Vec<VariantRequest>,
}

impl CreateProductRequest {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Product name cannot be empty"));
        }

        if self.variants.is_empty() {
            return Err(AppError::validation(
                "Product must have at least one variant",
            ));
        }

        if self.gst_rate < Decimal::ZERO || self.gst_rate > Decimal::from(100) {
            return Err(AppError::validation(format!(
                "GST rate must be between 0 and 100, got {}",
                self.gst_rate
            )));
        }

        for variant in &self.variants {
            if variant.name.trim().is_empty() {
                return Err(AppError::validation("Variant name cannot be empty"));
            }
            if variant.quantity < 0 {
                return Err(AppError::validation(format!(
                    "Variant '{}' quantity cannot be negative",
                    variant.name
                )));
            }
            if variant.cost_price < Decimal::ZERO || variant.selling_price < Decimal::ZERO {
                return Err(AppError::validation(format!(
                    "Variant '{}' prices cannot be negative",
                    variant.name
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateProductRequest {
        CreateProductRequest {
            name: "Ghee".to_string(),
            description: "Pure cow ghee".to_string(),
            hsn_sac_code: "0405".to_string(),
            gst_rate: Decimal::from(12),
            variants: vec![VariantRequest {
                id: None,
                name: "500ml".to_string(),
                cost_price: Decimal::from(220),
                selling_price: Decimal::from(280),
                quantity: 40,
            }],
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_request_needs_a_variant() {
        let mut req = request();
        req.variants.clear();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_request_rejects_negative_stock() {
        let mut req = request();
        req.variants[0].quantity = -1;
        assert!(req.validate().is_err());
    }
}
