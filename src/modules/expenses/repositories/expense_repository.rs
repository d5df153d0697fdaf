use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::MySqlPool;
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::expenses::models::{Expense, ExpenseCategory, ExpenseRequest};

pub struct ExpenseRepository {
    pool: MySqlPool,
}

impl ExpenseRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, owner_id: &str, request: &ExpenseRequest) -> Result<Expense> {
        let now = Utc::now();
        let expense = Expense {
            id: Uuid::new_v4().to_string(),
            description: request.description.clone(),
            amount: request.amount,
            date: request.date,
            category: request.category,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO expenses (id, owner_id, description, amount, incurred_on, category, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&expense.id)
        .bind(owner_id)
        .bind(&expense.description)
        .bind(expense.amount)
        .bind(expense.date)
        .bind(expense.category.to_string())
        .bind(expense.created_at)
        .bind(expense.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(expense)
    }

    pub async fn find_by_id(&self, owner_id: &str, id: &str) -> Result<Option<Expense>> {
        let row = sqlx::query_as::<_, ExpenseRow>(
            r#"
            SELECT id, description, amount, incurred_on, category, created_at, updated_at
            FROM expenses
            WHERE owner_id = ? AND id = ?
            "#,
        )
        .bind(owner_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ExpenseRow::into_expense).transpose()
    }

    pub async fn list(&self, owner_id: &str) -> Result<Vec<Expense>> {
        let rows = sqlx::query_as::<_, ExpenseRow>(
            r#"
            SELECT id, description, amount, incurred_on, category, created_at, updated_at
            FROM expenses
            WHERE owner_id = ?
            ORDER BY incurred_on DESC, created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ExpenseRow::into_expense).collect()
    }

    pub async fn update(&self, owner_id: &str, id: &str, request: &ExpenseRequest) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE expenses
            SET description = ?, amount = ?, incurred_on = ?, category = ?, updated_at = ?
            WHERE owner_id = ? AND id = ?
            "#,
        )
        .bind(&request.description)
        .bind(request.amount)
        .bind(request.date)
        .bind(request.category.to_string())
        .bind(Utc::now())
        .bind(owner_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Expense with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    pub async fn delete(&self, owner_id: &str, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM expenses WHERE owner_id = ? AND id = ?")
            .bind(owner_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Expense with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    /// Folds a stock purchase into the day's Inventory expense: at most
    /// one Inventory expense exists per owner per date, and concurrent
    /// intakes on the same day add to it instead of creating duplicates.
    /// The existing row is locked for the duration of the fold.
    pub async fn fold_inventory_purchase(
        &self,
        owner_id: &str,
        date: NaiveDate,
        amount: Decimal,
        note: &str,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<(String, Decimal, String)> = sqlx::query_as(
            r#"
            SELECT id, amount, description
            FROM expenses
            WHERE owner_id = ? AND category = 'Inventory' AND incurred_on = ?
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(owner_id)
        .bind(date)
        .fetch_optional(&mut *tx)
        .await?;

        match existing {
            Some((id, current, description)) => {
                sqlx::query(
                    "UPDATE expenses SET amount = ?, description = ?, updated_at = ? WHERE id = ?",
                )
                .bind(current + amount)
                .bind(format!("{}; {}", description, note))
                .bind(Utc::now())
                .bind(&id)
                .execute(&mut *tx)
                .await?;
            }
            None => {
                let now = Utc::now();
                sqlx::query(
                    r#"
                    INSERT INTO expenses (id, owner_id, description, amount, incurred_on, category, created_at, updated_at)
                    VALUES (?, ?, ?, ?, ?, 'Inventory', ?, ?)
                    "#,
                )
                .bind(Uuid::new_v4().to_string())
                .bind(owner_id)
                .bind(note)
                .bind(amount)
                .bind(date)
                .bind(now)
                .bind(now)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ExpenseRow {
    id: String,
    description: String,
    amount: Decimal,
    incurred_on: NaiveDate,
    category: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl ExpenseRow {
    fn into_expense(self) -> Result<Expense> {
        let category = ExpenseCategory::from_str(&self.category).map_err(|e| {
            AppError::internal(format!("Invalid expense category in database: {}", e))
        })?;

        Ok(Expense {
            id: self.id,
            description: self.description,
            amount: self.amount,
            date: self.incurred_on,
            category,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
