use std::sync::Arc;

use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::invoices::repositories::InvoiceRepository;
use crate::modules::invoices::services::StatusReconciler;
use crate::modules::payments::models::{Payment, PaymentRequest};
use crate::modules::payments::repositories::PaymentRepository;

pub struct PaymentService {
    payment_repo: Arc<PaymentRepository>,
    invoice_repo: Arc<InvoiceRepository>,
    reconciler: Arc<StatusReconciler>,
}

impl PaymentService {
    pub fn new(
        payment_repo: Arc<PaymentRepository>,
        invoice_repo: Arc<InvoiceRepository>,
        reconciler: Arc<StatusReconciler>,
    ) -> Self {
        Self {
            payment_repo,
            invoice_repo,
            reconciler,
        }
    }

    pub async fn record_payment(
        &self,
        owner_id: &str,
        request: PaymentRequest,
    ) -> Result<Payment> {
        request.validate()?;
        self.check_invoice_link(owner_id, request.invoice_id.as_deref())
            .await?;

        let payment = self.payment_repo.create(owner_id, &request).await?;

        if let Some(invoice_id) = &payment.invoice_id {
            self.reconciler.reconcile(owner_id, invoice_id).await?;
        }

        info!(payment_id = %payment.id, amount = %payment.amount, "payment recorded");
        Ok(payment)
    }

    pub async fn update_payment(
        &self,
        owner_id: &str,
        id: &str,
        request: PaymentRequest,
    ) -> Result<Payment> {
        request.validate()?;
        self.check_invoice_link(owner_id, request.invoice_id.as_deref())
            .await?;

        let old = self.require_payment(owner_id, id).await?;
        self.payment_repo.update(owner_id, id, &request).await?;

        // Both sides of a re-link go stale.
        if let Some(invoice_id) = &old.invoice_id {
            self.reconciler.reconcile(owner_id, invoice_id).await?;
        }
        if let Some(invoice_id) = &request.invoice_id {
            if old.invoice_id.as_deref() != Some(invoice_id.as_str()) {
                self.reconciler.reconcile(owner_id, invoice_id).await?;
            }
        }

        self.require_payment(owner_id, id).await
    }

    pub async fn delete_payment(&self, owner_id: &str, id: &str) -> Result<()> {
        let payment = self.require_payment(owner_id, id).await?;
        self.payment_repo.delete(owner_id, id).await?;

        if let Some(invoice_id) = &payment.invoice_id {
            self.reconciler.reconcile(owner_id, invoice_id).await?;
        }

        info!(payment_id = %id, "payment deleted");
        Ok(())
    }

    pub async fn get_payment(&self, owner_id: &str, id: &str) -> Result<Payment> {
        self.require_payment(owner_id, id).await
    }

    pub async fn list_payments(
        &self,
        owner_id: &str,
        client_id: Option<&str>,
    ) -> Result<Vec<Payment>> {
        self.payment_repo.list(owner_id, client_id).await
    }

    async fn require_payment(&self, owner_id: &str, id: &str) -> Result<Payment> {
        self.payment_repo
            .find_by_id(owner_id, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Payment with id '{}' not found", id)))
    }

    async fn check_invoice_link(&self, owner_id: &str, invoice_id: Option<&str>) -> Result<()> {
        let Some(invoice_id) = invoice_id else {
            return Ok(());
        };
        if self
            .invoice_repo
            .find_by_id(owner_id, invoice_id)
            .await?
            .is_none()
        {
            return Err(AppError::validation(format!(
                "Invoice with id '{}' does not exist",
                invoice_id
            )));
        }
        Ok(())
    }
}
