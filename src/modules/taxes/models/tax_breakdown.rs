use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The GST components of an invoice.
///
/// `total = subtotal + cgst + sgst + igst`, all rounded to paise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub subtotal: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub igst: Decimal,
    pub total: Decimal,
}
