//! Payment-driven invoice status.
//!
//! An invoice's `status` and `paid_amount` are derived values: they are
//! recomputed from the payments linked to the invoice every time one of
//! those payments changes, never edited directly.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::warn;

use crate::core::Result;
use crate::modules::invoices::models::InvoiceStatus;
use crate::modules::invoices::repositories::InvoiceRepository;
use crate::modules::payments::repositories::PaymentRepository;

/// Derives the status an invoice should carry given its total, the sum
/// of its linked payments and today's date.
///
/// Overpayment counts as Paid, as does covering a zero total; an unpaid
/// or partially paid invoice past its due date reads Overdue.
pub fn derive_status(
    total: Decimal,
    total_paid: Decimal,
    due_date: NaiveDate,
    today: NaiveDate,
) -> InvoiceStatus {
    if total_paid >= total {
        InvoiceStatus::Paid
    } else if today > due_date {
        InvoiceStatus::Overdue
    } else if total_paid > Decimal::ZERO {
        InvoiceStatus::PartiallyPaid
    } else {
        InvoiceStatus::Unpaid
    }
}

pub struct StatusReconciler {
    invoice_repo: Arc<InvoiceRepository>,
    payment_repo: Arc<PaymentRepository>,
}

impl StatusReconciler {
    pub fn new(
        invoice_repo: Arc<InvoiceRepository>,
        payment_repo: Arc<PaymentRepository>,
    ) -> Self {
        Self {
            invoice_repo,
            payment_repo,
        }
    }

    /// Recomputes `paid_amount` and `status` for one invoice from its
    /// linked payments. A missing invoice is logged and skipped rather
    /// than failing the payment operation that triggered the pass; the
    /// payment may legitimately outlive its invoice.
    pub async fn reconcile(&self, owner_id: &str, invoice_id: &str) -> Result<()> {
        let Some(invoice) = self.invoice_repo.find_by_id(owner_id, invoice_id).await? else {
            warn!(invoice_id, "skipping status reconciliation: invoice not found");
            return Ok(());
        };

        let total_paid = self
            .payment_repo
            .total_for_invoice(owner_id, invoice_id)
            .await?;

        let today = Utc::now().date_naive();
        let status = derive_status(invoice.total, total_paid, invoice.due_date, today);

        self.invoice_repo
            .update_derived(owner_id, invoice_id, total_paid, status)
            .await
    }
}
