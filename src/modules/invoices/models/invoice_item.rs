// A line of an invoice, carrying a snapshot of the product and variant
// as they existed at invoice time. Deliberate denormalization: invoice
// history must not change when the catalog is edited later.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{money, AppError, Result};

/// A sold line on an invoice.
///
/// `product_id`/`variant_id` still point at the live catalog (for stock
/// adjustments and integrity guards), but every descriptive field is a
/// frozen copy taken when the invoice was written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    /// Unique within the invoice
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub description: String,
    pub hsn_sac_code: String,
    pub variant_id: String,
    pub variant_name: String,
    /// Quantity sold on this invoice
    pub quantity: i64,
    /// Selling price per unit at the time of sale
    pub unit_price: Decimal,
    /// GST rate (%) at the time of sale
    pub gst_rate: Decimal,
}

impl InvoiceItem {
    /// Line subtotal before tax, rounded to paise.
    pub fn subtotal(&self) -> Decimal {
        money::round(Decimal::from(self.quantity) * self.unit_price)
    }

    pub fn validate(&self) -> Result<()> {
        if self.quantity <= 0 {
            return Err(AppError::validation(format!(
                "Quantity must be positive, got {}",
                self.quantity
            )));
        }

        if self.unit_price < Decimal::ZERO {
            return Err(AppError::validation("Unit price must be non-negative"));
        }

        if self.gst_rate < Decimal::ZERO || self.gst_rate > Decimal::from(100) {
            return Err(AppError::validation(format!(
                "GST rate must be between 0 and 100, got {}",
                self.gst_rate
            )));
        }

        Ok(())
    }
}

/// One requested line when creating or editing an invoice.
///
/// The service resolves this against the live catalog and freezes the
/// snapshot fields itself; callers never supply snapshot data.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItemRequest {
    pub product_id: String,
    pub variant_id: String,
    pub quantity: i64,
    /// Overrides the variant's selling price when present
    pub unit_price: Option<Decimal>,
    /// Overrides the product description when present
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn item(quantity: i64, unit_price: &str) -> InvoiceItem {
        InvoiceItem {
            id: "it-1".to_string(),
            product_id: "p-1".to_string(),
            product_name: "Tea".to_string(),
            description: "Loose leaf".to_string(),
            hsn_sac_code: "0902".to_string(),
            variant_id: "v-1".to_string(),
            variant_name: "250g".to_string(),
            quantity,
            unit_price: Decimal::from_str(unit_price).unwrap(),
            gst_rate: Decimal::from(5),
        }
    }

    #[test]
    fn test_subtotal_rounds_to_paise() {
        assert_eq!(
            item(3, "199.99").subtotal(),
            Decimal::from_str("599.97").unwrap()
        );
    }

    #[test]
    fn test_validate_rejects_non_positive_quantity() {
        assert!(item(0, "10").validate().is_err());
        assert!(item(-2, "10").validate().is_err());
        assert!(item(1, "10").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_gst() {
        let mut bad = item(1, "10");
        bad.gst_rate = Decimal::from(101);
        assert!(bad.validate().is_err());
    }
}
