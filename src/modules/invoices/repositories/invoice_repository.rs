// Transaction coordinator: invoice creation, edit and deletion commit
// together with their stock adjustments (and, on delete, the payment
// cascade) as one database transaction. Referenced product rows are
// locked with SELECT ... FOR UPDATE so concurrent invoice operations on
// the same variants serialize; a failed stock check rolls the whole
// unit back with no observable partial effect.

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::Utc;
use sqlx::{MySql, MySqlPool, Transaction};
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::inventory::{stock_ledger, StockDelta};
use crate::modules::invoices::models::{ClientSnapshot, Invoice, InvoiceItem, InvoiceStatus};
use crate::modules::products::models::{Product, ProductVariant};

pub struct InvoiceRepository {
    pool: MySqlPool,
}

impl InvoiceRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Creates an invoice, allocating its lines out of stock in the same
    /// transaction.
    pub async fn create(&self, owner_id: &str, invoice: &Invoice) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let deltas = stock_ledger::sale_deltas(&invoice.items);
        let mut products = Self::lock_products(&mut tx, owner_id, &deltas).await?;
        stock_ledger::apply(&mut products, &deltas)?;
        Self::persist_quantities(&mut tx, &products).await?;

        Self::insert_invoice(&mut tx, owner_id, invoice).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Replaces an invoice with a new version, applying only the net
    /// stock difference between the old and new lines. Old lines whose
    /// product or variant has left the catalog since the sale carry no
    /// stock to restore and are skipped; new lines were resolved from
    /// the live catalog before reaching this point.
    pub async fn update(&self, owner_id: &str, old: &Invoice, new: &Invoice) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let deltas = stock_ledger::edit_deltas(&old.items, &new.items);
        let mut products = Self::lock_products(&mut tx, owner_id, &deltas).await?;
        let deltas = stock_ledger::retain_known(deltas, &products);
        stock_ledger::apply(&mut products, &deltas)?;
        Self::persist_quantities(&mut tx, &products).await?;

        let result = sqlx::query(
            r#"
            UPDATE invoices
            SET invoice_number = ?, client_id = ?, client_name = ?, client_gstin = ?,
                client_address = ?, client_state = ?, client_contact = ?,
                issue_date = ?, due_date = ?, status = ?,
                subtotal = ?, cgst = ?, sgst = ?, igst = ?, total = ?, paid_amount = ?,
                updated_at = ?
            WHERE owner_id = ? AND id = ?
            "#,
        )
        .bind(&new.invoice_number)
        .bind(&new.client.id)
        .bind(&new.client.name)
        .bind(&new.client.gstin)
        .bind(&new.client.address)
        .bind(&new.client.state)
        .bind(&new.client.contact)
        .bind(new.issue_date)
        .bind(new.due_date)
        .bind(new.status.to_string())
        .bind(new.subtotal)
        .bind(new.cgst)
        .bind(new.sgst)
        .bind(new.igst)
        .bind(new.total)
        .bind(new.paid_amount)
        .bind(Utc::now())
        .bind(owner_id)
        .bind(&new.id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Invoice with id '{}' not found",
                new.id
            )));
        }

        // Lines are replaced wholesale; the snapshots belong to this
        // invoice version.
        sqlx::query("DELETE FROM invoice_items WHERE invoice_id = ?")
            .bind(&new.id)
            .execute(&mut *tx)
            .await?;
        Self::insert_items(&mut tx, &new.id, &new.items).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Deletes an invoice, returning its quantities to stock and
    /// cascading the delete to every linked payment, atomically.
    /// Returns never fail the stock check, and products or variants
    /// removed from the catalog since the sale are skipped.
    pub async fn delete(&self, owner_id: &str, invoice: &Invoice) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let deltas = stock_ledger::return_deltas(&invoice.items);
        let mut products = Self::lock_products(&mut tx, owner_id, &deltas).await?;
        let deltas = stock_ledger::retain_known(deltas, &products);
        stock_ledger::apply(&mut products, &deltas)?;
        Self::persist_quantities(&mut tx, &products).await?;

        sqlx::query("DELETE FROM payments WHERE owner_id = ? AND invoice_id = ?")
            .bind(owner_id)
            .bind(&invoice.id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM invoice_items WHERE invoice_id = ?")
            .bind(&invoice.id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM invoices WHERE owner_id = ? AND id = ?")
            .bind(owner_id)
            .bind(&invoice.id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Invoice with id '{}' not found",
                invoice.id
            )));
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn find_by_id(&self, owner_id: &str, id: &str) -> Result<Option<Invoice>> {
        let row = sqlx::query_as::<_, InvoiceRow>(&format!(
            "{} WHERE owner_id = ? AND id = ?",
            SELECT_INVOICE
        ))
        .bind(owner_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items = self.fetch_items(id).await?;
        Ok(Some(row.into_invoice(items)?))
    }

    pub async fn list(&self, owner_id: &str) -> Result<Vec<Invoice>> {
        let rows = sqlx::query_as::<_, InvoiceRow>(&format!(
            "{} WHERE owner_id = ? ORDER BY created_at DESC",
            SELECT_INVOICE
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        let mut invoices = Vec::with_capacity(rows.len());
        for row in rows {
            let items = self.fetch_items(&row.id).await?;
            invoices.push(row.into_invoice(items)?);
        }

        Ok(invoices)
    }

    /// Single write path for the derived fields; nothing else may touch
    /// `paid_amount` or `status`.
    pub async fn update_derived(
        &self,
        owner_id: &str,
        id: &str,
        paid_amount: rust_decimal::Decimal,
        status: InvoiceStatus,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE invoices
            SET paid_amount = ?, status = ?, updated_at = ?
            WHERE owner_id = ? AND id = ?
            "#,
        )
        .bind(paid_amount)
        .bind(status.to_string())
        .bind(Utc::now())
        .bind(owner_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Invoice with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    pub async fn client_in_use(&self, owner_id: &str, client_id: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM invoices WHERE owner_id = ? AND client_id = ?",
        )
        .bind(owner_id)
        .bind(client_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    pub async fn product_in_use(&self, owner_id: &str, product_id: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM invoice_items it
            JOIN invoices i ON i.id = it.invoice_id
            WHERE i.owner_id = ? AND it.product_id = ?
            "#,
        )
        .bind(owner_id)
        .bind(product_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Allocates the next invoice number in the owner's "INV-<n>"
    /// sequence, starting at INV-1001. Numbers in other formats are
    /// ignored.
    pub async fn next_invoice_number(&self, owner_id: &str) -> Result<String> {
        let numbers: Vec<String> = sqlx::query_scalar(
            "SELECT invoice_number FROM invoices WHERE owner_id = ? AND invoice_number LIKE 'INV-%'",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(next_number(numbers.iter().map(String::as_str)))
    }

    // Transaction internals

    async fn lock_products(
        tx: &mut Transaction<'_, MySql>,
        owner_id: &str,
        deltas: &[StockDelta],
    ) -> Result<Vec<Product>> {
        let product_ids: BTreeSet<&str> =
            deltas.iter().map(|d| d.product_id.as_str()).collect();
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; product_ids.len()].join(", ");

        let sql = format!(
            "SELECT id, name, description, hsn_sac_code, gst_rate \
             FROM products WHERE owner_id = ? AND id IN ({}) FOR UPDATE",
            placeholders
        );
        let mut query = sqlx::query_as::<_, LockedProductRow>(&sql).bind(owner_id);
        for id in &product_ids {
            query = query.bind(*id);
        }
        let product_rows = query.fetch_all(&mut **tx).await?;

        let sql = format!(
            "SELECT id, product_id, name, cost_price, selling_price, quantity \
             FROM product_variants WHERE product_id IN ({}) ORDER BY position FOR UPDATE",
            placeholders
        );
        let mut query = sqlx::query_as::<_, LockedVariantRow>(&sql);
        for id in &product_ids {
            query = query.bind(*id);
        }
        let variant_rows = query.fetch_all(&mut **tx).await?;

        let mut products: Vec<Product> = product_rows
            .into_iter()
            .map(|row| Product {
                id: row.id,
                name: row.name,
                description: row.description,
                hsn_sac_code: row.hsn_sac_code,
                gst_rate: row.gst_rate,
                variants: Vec::new(),
            })
            .collect();

        for row in variant_rows {
            if let Some(product) = products.iter_mut().find(|p| p.id == row.product_id) {
                product.variants.push(ProductVariant {
                    id: row.id,
                    name: row.name,
                    cost_price: row.cost_price,
                    selling_price: row.selling_price,
                    quantity: row.quantity,
                });
            }
        }

        Ok(products)
    }

    async fn persist_quantities(
        tx: &mut Transaction<'_, MySql>,
        products: &[Product],
    ) -> Result<()> {
        for product in products {
            for variant in &product.variants {
                sqlx::query("UPDATE product_variants SET quantity = ? WHERE id = ?")
                    .bind(variant.quantity)
                    .bind(&variant.id)
                    .execute(&mut **tx)
                    .await?;
            }
        }
        Ok(())
    }

    async fn insert_invoice(
        tx: &mut Transaction<'_, MySql>,
        owner_id: &str,
        invoice: &Invoice,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO invoices (
                id, owner_id, invoice_number,
                client_id, client_name, client_gstin, client_address, client_state, client_contact,
                issue_date, due_date, status,
                subtotal, cgst, sgst, igst, total, paid_amount,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&invoice.id)
        .bind(owner_id)
        .bind(&invoice.invoice_number)
        .bind(&invoice.client.id)
        .bind(&invoice.client.name)
        .bind(&invoice.client.gstin)
        .bind(&invoice.client.address)
        .bind(&invoice.client.state)
        .bind(&invoice.client.contact)
        .bind(invoice.issue_date)
        .bind(invoice.due_date)
        .bind(invoice.status.to_string())
        .bind(invoice.subtotal)
        .bind(invoice.cgst)
        .bind(invoice.sgst)
        .bind(invoice.igst)
        .bind(invoice.total)
        .bind(invoice.paid_amount)
        .bind(invoice.created_at)
        .bind(invoice.updated_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::validation(format!(
                        "Invoice number '{}' already exists",
                        invoice.invoice_number
                    ));
                }
            }
            AppError::Database(e)
        })?;

        Self::insert_items(tx, &invoice.id, &invoice.items).await
    }

    async fn insert_items(
        tx: &mut Transaction<'_, MySql>,
        invoice_id: &str,
        items: &[InvoiceItem],
    ) -> Result<()> {
        for (position, item) in items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO invoice_items (
                    id, invoice_id,
                    product_id, product_name, description, hsn_sac_code,
                    variant_id, variant_name,
                    quantity, unit_price, gst_rate, position
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&item.id)
            .bind(invoice_id)
            .bind(&item.product_id)
            .bind(&item.product_name)
            .bind(&item.description)
            .bind(&item.hsn_sac_code)
            .bind(&item.variant_id)
            .bind(&item.variant_name)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.gst_rate)
            .bind(position as i32)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    async fn fetch_items(&self, invoice_id: &str) -> Result<Vec<InvoiceItem>> {
        let rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, product_id, product_name, description, hsn_sac_code,
                   variant_id, variant_name, quantity, unit_price, gst_rate
            FROM invoice_items
            WHERE invoice_id = ?
            ORDER BY position
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ItemRow::into_item).collect())
    }
}

/// Generates a fresh line id, unique within an invoice.
pub fn new_item_id() -> String {
    Uuid::new_v4().to_string()
}

/// Pure successor function over an owner's existing "INV-<n>" numbers.
pub fn next_number<'a>(numbers: impl Iterator<Item = &'a str>) -> String {
    let max = numbers
        .filter_map(|n| n.strip_prefix("INV-"))
        .filter_map(|n| n.parse::<u64>().ok())
        .max();

    match max {
        Some(n) => format!("INV-{}", n + 1),
        None => "INV-1001".to_string(),
    }
}

// Row mapping

const SELECT_INVOICE: &str = r#"
    SELECT id, invoice_number,
           client_id, client_name, client_gstin, client_address, client_state, client_contact,
           issue_date, due_date, status,
           subtotal, cgst, sgst, igst, total, paid_amount,
           created_at, updated_at
    FROM invoices
"#;

#[derive(Debug, sqlx::FromRow)]
struct InvoiceRow {
    id: String,
    invoice_number: String,
    client_id: String,
    client_name: String,
    client_gstin: String,
    client_address: String,
    client_state: String,
    client_contact: String,
    issue_date: chrono::NaiveDate,
    due_date: chrono::NaiveDate,
    status: String,
    subtotal: rust_decimal::Decimal,
    cgst: rust_decimal::Decimal,
    sgst: rust_decimal::Decimal,
    igst: rust_decimal::Decimal,
    total: rust_decimal::Decimal,
    paid_amount: rust_decimal::Decimal,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl InvoiceRow {
    fn into_invoice(self, items: Vec<InvoiceItem>) -> Result<Invoice> {
        let status = InvoiceStatus::from_str(&self.status)
            .map_err(|e| AppError::internal(format!("Invalid status in database: {}", e)))?;

        Ok(Invoice {
            id: self.id,
            invoice_number: self.invoice_number,
            client: ClientSnapshot {
                id: self.client_id,
                name: self.client_name,
                gstin: self.client_gstin,
                address: self.client_address,
                state: self.client_state,
                contact: self.client_contact,
            },
            items,
            issue_date: self.issue_date,
            due_date: self.due_date,
            status,
            subtotal: self.subtotal,
            cgst: self.cgst,
            sgst: self.sgst,
            igst: self.igst,
            total: self.total,
            paid_amount: self.paid_amount,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    id: String,
    product_id: String,
    product_name: String,
    description: String,
    hsn_sac_code: String,
    variant_id: String,
    variant_name: String,
    quantity: i64,
    unit_price: rust_decimal::Decimal,
    gst_rate: rust_decimal::Decimal,
}

impl ItemRow {
    fn into_item(self) -> InvoiceItem {
        InvoiceItem {
            id: self.id,
            product_id: self.product_id,
            product_name: self.product_name,
            description: self.description,
            hsn_sac_code: self.hsn_sac_code,
            variant_id: self.variant_id,
            variant_name: self.variant_name,
            quantity: self.quantity,
            unit_price: self.unit_price,
            gst_rate: self.gst_rate,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LockedProductRow {
    id: String,
    name: String,
    description: String,
    hsn_sac_code: String,
    gst_rate: rust_decimal::Decimal,
}

#[derive(Debug, sqlx::FromRow)]
struct LockedVariantRow {
    id: String,
    product_id: String,
    name: String,
    cost_price: rust_decimal::Decimal,
    selling_price: rust_decimal::Decimal,
    quantity: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_number_in_sequence() {
        assert_eq!(next_number(std::iter::empty::<&str>()), "INV-1001");
    }

    #[test]
    fn test_next_number_is_max_plus_one() {
        let numbers = ["INV-1001", "INV-1003", "INV-1002"];
        assert_eq!(next_number(numbers.iter().copied()), "INV-1004");
    }

    #[test]
    fn test_foreign_formats_are_ignored() {
        let numbers = ["INV-1001", "2024/07-15", "INV-abc"];
        assert_eq!(next_number(numbers.iter().copied()), "INV-1002");
    }
}
