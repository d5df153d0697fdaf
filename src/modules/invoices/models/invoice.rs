use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::invoice_item::{InvoiceItem, InvoiceItemRequest};
use crate::core::{AppError, Result};
use crate::modules::taxes::models::TaxBreakdown;

/// Invoice status, always derived from payments and the due date,
/// never set directly by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    #[serde(rename = "Unpaid")]
    Unpaid,

    /// Some but not all of the total has been received
    #[serde(rename = "Partially Paid")]
    PartiallyPaid,

    #[serde(rename = "Paid")]
    Paid,

    /// Due date passed without full payment
    #[serde(rename = "Overdue")]
    Overdue,
}

impl Default for InvoiceStatus {
    fn default() -> Self {
        InvoiceStatus::Unpaid
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvoiceStatus::Unpaid => write!(f, "Unpaid"),
            InvoiceStatus::PartiallyPaid => write!(f, "Partially Paid"),
            InvoiceStatus::Paid => write!(f, "Paid"),
            InvoiceStatus::Overdue => write!(f, "Overdue"),
        }
    }
}

impl std::str::FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Unpaid" => Ok(InvoiceStatus::Unpaid),
            "Partially Paid" => Ok(InvoiceStatus::PartiallyPaid),
            "Paid" => Ok(InvoiceStatus::Paid),
            "Overdue" => Ok(InvoiceStatus::Overdue),
            _ => Err(format!("Invalid invoice status: {}", s)),
        }
    }
}

/// Frozen copy of the client as it existed when the invoice was written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSnapshot {
    pub id: String,
    pub name: String,
    pub gstin: String,
    pub address: String,
    pub state: String,
    pub contact: String,
}

/// An invoice with embedded item snapshots and denormalized derived
/// fields (`paid_amount`, `status`). The derived fields are written only
/// by the status reconciler, never assigned ad hoc.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    /// Unique, monotonic per business ("INV-1001", "INV-1002", ...)
    pub invoice_number: String,
    pub client: ClientSnapshot,
    pub items: Vec<InvoiceItem>,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: InvoiceStatus,
    pub subtotal: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub igst: Decimal,
    pub total: Decimal,
    /// Sum of linked payments, recomputed after every payment mutation
    pub paid_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Overwrite the tax fields from a computed breakdown.
    pub fn apply_taxes(&mut self, taxes: TaxBreakdown) {
        self.subtotal = taxes.subtotal;
        self.cgst = taxes.cgst;
        self.sgst = taxes.sgst;
        self.igst = taxes.igst;
        self.total = taxes.total;
    }

    pub fn validate(&self) -> Result<()> {
        if self.items.is_empty() {
            return Err(AppError::validation(
                "Invoice must have at least one item",
            ));
        }

        if self.due_date < self.issue_date {
            return Err(AppError::validation(
                "Due date cannot be before the issue date",
            ));
        }

        for item in &self.items {
            item.validate()?;
        }

        Ok(())
    }
}

/// Payload for creating an invoice. Snapshots are taken server-side from
/// the live client and catalog, so only references come in.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    /// Allocated from the sequence when absent
    pub invoice_number: Option<String>,
    pub client_id: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub items: Vec<InvoiceItemRequest>,
}

/// Payload for editing an invoice: a full replacement of its lines and
/// dates. Stock is re-deltaed against the previous lines in the same
/// transaction that overwrites the invoice.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvoiceRequest {
    pub client_id: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub items: Vec<InvoiceItemRequest>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_status_round_trips_display_strings() {
        for status in [
            InvoiceStatus::Unpaid,
            InvoiceStatus::PartiallyPaid,
            InvoiceStatus::Paid,
            InvoiceStatus::Overdue,
        ] {
            assert_eq!(
                InvoiceStatus::from_str(&status.to_string()).unwrap(),
                status
            );
        }
        assert_eq!(InvoiceStatus::PartiallyPaid.to_string(), "Partially Paid");
    }

    #[test]
    fn test_status_rejects_unknown_string() {
        assert!(InvoiceStatus::from_str("Pending").is_err());
    }
}
