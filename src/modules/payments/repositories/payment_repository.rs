use std::str::FromStr;

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::MySqlPool;
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::payments::models::{Payment, PaymentMode, PaymentRequest};

pub struct PaymentRepository {
    pool: MySqlPool,
}

impl PaymentRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, owner_id: &str, request: &PaymentRequest) -> Result<Payment> {
        let now = Utc::now();
        let payment = Payment {
            id: Uuid::new_v4().to_string(),
            invoice_id: request.invoice_id.clone(),
            client_id: request.client_id.clone(),
            amount: request.amount,
            date: request.date,
            mode: request.mode,
            notes: request.notes.clone().unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO payments (id, owner_id, invoice_id, client_id, amount, paid_on, mode, notes, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&payment.id)
        .bind(owner_id)
        .bind(&payment.invoice_id)
        .bind(&payment.client_id)
        .bind(payment.amount)
        .bind(payment.date)
        .bind(payment.mode.to_string())
        .bind(&payment.notes)
        .bind(payment.created_at)
        .bind(payment.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(payment)
    }

    pub async fn find_by_id(&self, owner_id: &str, id: &str) -> Result<Option<Payment>> {
        let row = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT id, invoice_id, client_id, amount, paid_on, mode, notes, created_at, updated_at
            FROM payments
            WHERE owner_id = ? AND id = ?
            "#,
        )
        .bind(owner_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(PaymentRow::into_payment).transpose()
    }

    /// Lists payments, optionally narrowed to one client (receipts view).
    pub async fn list(&self, owner_id: &str, client_id: Option<&str>) -> Result<Vec<Payment>> {
        let rows = match client_id {
            Some(client_id) => {
                sqlx::query_as::<_, PaymentRow>(
                    r#"
                    SELECT id, invoice_id, client_id, amount, paid_on, mode, notes, created_at, updated_at
                    FROM payments
                    WHERE owner_id = ? AND client_id = ?
                    ORDER BY paid_on DESC, created_at DESC
                    "#,
                )
                .bind(owner_id)
                .bind(client_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, PaymentRow>(
                    r#"
                    SELECT id, invoice_id, client_id, amount, paid_on, mode, notes, created_at, updated_at
                    FROM payments
                    WHERE owner_id = ?
                    ORDER BY paid_on DESC, created_at DESC
                    "#,
                )
                .bind(owner_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(PaymentRow::into_payment).collect()
    }

    pub async fn update(&self, owner_id: &str, id: &str, request: &PaymentRequest) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE payments
            SET invoice_id = ?, client_id = ?, amount = ?, paid_on = ?, mode = ?, notes = ?, updated_at = ?
            WHERE owner_id = ? AND id = ?
            "#,
        )
        .bind(&request.invoice_id)
        .bind(&request.client_id)
        .bind(request.amount)
        .bind(request.date)
        .bind(request.mode.to_string())
        .bind(request.notes.clone().unwrap_or_default())
        .bind(Utc::now())
        .bind(owner_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Payment with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    pub async fn delete(&self, owner_id: &str, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM payments WHERE owner_id = ? AND id = ?")
            .bind(owner_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Payment with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    /// Sum of every payment linked to one invoice.
    pub async fn total_for_invoice(&self, owner_id: &str, invoice_id: &str) -> Result<Decimal> {
        let total: Option<Decimal> = sqlx::query_scalar(
            "SELECT SUM(amount) FROM payments WHERE owner_id = ? AND invoice_id = ?",
        )
        .bind(owner_id)
        .bind(invoice_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total.unwrap_or_default())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: String,
    invoice_id: Option<String>,
    client_id: String,
    amount: Decimal,
    paid_on: chrono::NaiveDate,
    mode: String,
    notes: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl PaymentRow {
    fn into_payment(self) -> Result<Payment> {
        let mode = PaymentMode::from_str(&self.mode)
            .map_err(|e| AppError::internal(format!("Invalid payment mode in database: {}", e)))?;

        Ok(Payment {
            id: self.id,
            invoice_id: self.invoice_id,
            client_id: self.client_id,
            amount: self.amount,
            date: self.paid_on,
            mode,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
