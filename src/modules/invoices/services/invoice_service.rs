use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::clients::repositories::ClientRepository;
use crate::modules::invoices::models::{
    ClientSnapshot, CreateInvoiceRequest, Invoice, InvoiceItem, InvoiceItemRequest,
    UpdateInvoiceRequest,
};
use crate::modules::invoices::repositories::{invoice_repository, InvoiceRepository};
use crate::modules::invoices::services::status_reconciler;
use crate::modules::products::repositories::ProductRepository;
use crate::modules::profile::repositories::ProfileRepository;
use crate::modules::taxes::gst_calculator;

pub struct InvoiceService {
    invoice_repo: Arc<InvoiceRepository>,
    client_repo: Arc<ClientRepository>,
    product_repo: Arc<ProductRepository>,
    profile_repo: Arc<ProfileRepository>,
}

impl InvoiceService {
    pub fn new(
        invoice_repo: Arc<InvoiceRepository>,
        client_repo: Arc<ClientRepository>,
        product_repo: Arc<ProductRepository>,
        profile_repo: Arc<ProfileRepository>,
    ) -> Self {
        Self {
            invoice_repo,
            client_repo,
            product_repo,
            profile_repo,
        }
    }

    pub async fn create_invoice(
        &self,
        owner_id: &str,
        request: CreateInvoiceRequest,
    ) -> Result<Invoice> {
        let client = self.client_snapshot(owner_id, &request.client_id).await?;
        let items = self.build_items(owner_id, &request.items).await?;

        let invoice_number = match request.invoice_number {
            Some(number) if !number.trim().is_empty() => number,
            _ => self.invoice_repo.next_invoice_number(owner_id).await?,
        };

        let now = Utc::now();
        let mut invoice = Invoice {
            id: Uuid::new_v4().to_string(),
            invoice_number,
            client,
            items,
            issue_date: request.issue_date,
            due_date: request.due_date,
            status: Default::default(),
            subtotal: Decimal::ZERO,
            cgst: Decimal::ZERO,
            sgst: Decimal::ZERO,
            igst: Decimal::ZERO,
            total: Decimal::ZERO,
            paid_amount: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        };
        self.apply_taxes(owner_id, &mut invoice).await?;
        invoice.validate()?;

        self.invoice_repo.create(owner_id, &invoice).await?;

        info!(
            invoice_id = %invoice.id,
            invoice_number = %invoice.invoice_number,
            "invoice created"
        );
        Ok(invoice)
    }

    pub async fn update_invoice(
        &self,
        owner_id: &str,
        id: &str,
        request: UpdateInvoiceRequest,
    ) -> Result<Invoice> {
        let old = self.require_invoice(owner_id, id).await?;

        let client = self.client_snapshot(owner_id, &request.client_id).await?;
        let items = self.build_items(owner_id, &request.items).await?;

        let mut new = Invoice {
            id: old.id.clone(),
            invoice_number: old.invoice_number.clone(),
            client,
            items,
            issue_date: request.issue_date,
            due_date: request.due_date,
            status: old.status,
            subtotal: Decimal::ZERO,
            cgst: Decimal::ZERO,
            sgst: Decimal::ZERO,
            igst: Decimal::ZERO,
            total: Decimal::ZERO,
            paid_amount: old.paid_amount,
            created_at: old.created_at,
            updated_at: Utc::now(),
        };
        self.apply_taxes(owner_id, &mut new).await?;
        new.validate()?;

        // An edit can change the total or due date out from under the
        // already-recorded payments.
        new.status = status_reconciler::derive_status(
            new.total,
            new.paid_amount,
            new.due_date,
            Utc::now().date_naive(),
        );

        self.invoice_repo.update(owner_id, &old, &new).await?;

        info!(invoice_id = %new.id, "invoice updated");
        Ok(new)
    }

    pub async fn delete_invoice(&self, owner_id: &str, id: &str) -> Result<()> {
        let invoice = self.require_invoice(owner_id, id).await?;
        self.invoice_repo.delete(owner_id, &invoice).await?;

        info!(invoice_id = %id, "invoice deleted, stock returned");
        Ok(())
    }

    pub async fn get_invoice(&self, owner_id: &str, id: &str) -> Result<Invoice> {
        self.require_invoice(owner_id, id).await
    }

    pub async fn list_invoices(&self, owner_id: &str) -> Result<Vec<Invoice>> {
        self.invoice_repo.list(owner_id).await
    }

    async fn require_invoice(&self, owner_id: &str, id: &str) -> Result<Invoice> {
        self.invoice_repo
            .find_by_id(owner_id, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Invoice with id '{}' not found", id)))
    }

    async fn client_snapshot(&self, owner_id: &str, client_id: &str) -> Result<ClientSnapshot> {
        let client = self
            .client_repo
            .find_by_id(owner_id, client_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Client with id '{}' not found", client_id))
            })?;

        Ok(ClientSnapshot {
            id: client.id,
            name: client.name,
            gstin: client.gstin,
            address: client.address,
            state: client.state,
            contact: client.contact,
        })
    }

    /// Resolves line requests against the catalog into self-contained
    /// snapshots. Unit price falls back to the variant's selling price,
    /// the GST rate always comes from the product.
    async fn build_items(
        &self,
        owner_id: &str,
        requests: &[InvoiceItemRequest],
    ) -> Result<Vec<InvoiceItem>> {
        let mut items = Vec::with_capacity(requests.len());

        for request in requests {
            let product = self
                .product_repo
                .find_by_id(owner_id, &request.product_id)
                .await?
                .ok_or_else(|| {
                    AppError::not_found(format!(
                        "Product with id '{}' not found",
                        request.product_id
                    ))
                })?;

            let variant = product.variant(&request.variant_id).ok_or_else(|| {
                AppError::validation(format!(
                    "Product '{}' has no variant with id '{}'",
                    product.name, request.variant_id
                ))
            })?;

            items.push(InvoiceItem {
                id: invoice_repository::new_item_id(),
                product_id: product.id.clone(),
                product_name: product.name.clone(),
                description: request
                    .description
                    .clone()
                    .unwrap_or_else(|| product.description.clone()),
                hsn_sac_code: product.hsn_sac_code.clone(),
                variant_id: variant.id.clone(),
                variant_name: variant.name.clone(),
                quantity: request.quantity,
                unit_price: request.unit_price.unwrap_or(variant.selling_price),
                gst_rate: product.gst_rate,
            });
        }

        Ok(items)
    }

    async fn apply_taxes(&self, owner_id: &str, invoice: &mut Invoice) -> Result<()> {
        let seller_state = self
            .profile_repo
            .get(owner_id)
            .await?
            .map(|p| p.state)
            .unwrap_or_default();

        let taxes = gst_calculator::calculate_invoice_taxes(
            &invoice.items,
            &seller_state,
            &invoice.client.state,
        );
        invoice.apply_taxes(taxes);
        Ok(())
    }
}
