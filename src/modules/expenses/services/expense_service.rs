use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;

use crate::core::money;
use crate::core::{AppError, Result};
use crate::modules::expenses::models::{Expense, ExpenseRequest, InventoryPurchase};
use crate::modules::expenses::repositories::ExpenseRepository;

pub struct ExpenseService {
    expense_repo: Arc<ExpenseRepository>,
}

impl ExpenseService {
    pub fn new(expense_repo: Arc<ExpenseRepository>) -> Self {
        Self { expense_repo }
    }

    pub async fn create_expense(
        &self,
        owner_id: &str,
        request: ExpenseRequest,
    ) -> Result<Expense> {
        request.validate()?;
        self.expense_repo.create(owner_id, &request).await
    }

    pub async fn get_expense(&self, owner_id: &str, id: &str) -> Result<Expense> {
        self.expense_repo
            .find_by_id(owner_id, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Expense with id '{}' not found", id)))
    }

    pub async fn list_expenses(&self, owner_id: &str) -> Result<Vec<Expense>> {
        self.expense_repo.list(owner_id).await
    }

    pub async fn update_expense(
        &self,
        owner_id: &str,
        id: &str,
        request: ExpenseRequest,
    ) -> Result<Expense> {
        request.validate()?;
        self.expense_repo.update(owner_id, id, &request).await?;
        self.get_expense(owner_id, id).await
    }

    pub async fn delete_expense(&self, owner_id: &str, id: &str) -> Result<()> {
        self.expense_repo.delete(owner_id, id).await
    }

    /// Books a stock intake as an Inventory expense at cost, folded
    /// into today's entry. Unpriced lines are skipped; if nothing is
    /// priced this is a no-op, never an error.
    pub async fn post_inventory_purchase(
        &self,
        owner_id: &str,
        purchases: &[InventoryPurchase],
    ) -> Result<()> {
        let total = purchase_total(purchases);
        if total <= Decimal::ZERO {
            return Ok(());
        }

        let note = purchase_note(purchases);
        let today = Utc::now().date_naive();
        self.expense_repo
            .fold_inventory_purchase(owner_id, today, total, &note)
            .await?;

        info!(amount = %total, "inventory purchase booked as expense");
        Ok(())
    }
}

fn priced(purchases: &[InventoryPurchase]) -> impl Iterator<Item = &InventoryPurchase> {
    purchases
        .iter()
        .filter(|p| p.quantity > 0 && p.unit_cost > Decimal::ZERO)
}

pub fn purchase_total(purchases: &[InventoryPurchase]) -> Decimal {
    money::round(
        priced(purchases)
            .map(|p| Decimal::from(p.quantity) * p.unit_cost)
            .sum(),
    )
}

pub fn purchase_note(purchases: &[InventoryPurchase]) -> String {
    priced(purchases)
        .map(|p| {
            format!(
                "Stock purchase: {} x {} @ {}",
                p.label,
                p.quantity,
                money::format_inr(p.unit_cost)
            )
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn purchase(label: &str, quantity: i64, unit_cost: Decimal) -> InventoryPurchase {
        InventoryPurchase {
            label: label.to_string(),
            quantity,
            unit_cost,
        }
    }

    #[test]
    fn test_total_sums_priced_lines_only() {
        let purchases = vec![
            purchase("Tea (250g)", 10, dec!(120.50)),
            purchase("Tea (500g)", 5, dec!(0)),
            purchase("Sugar (1kg)", 0, dec!(40)),
        ];
        assert_eq!(purchase_total(&purchases), dec!(1205.00));
    }

    #[test]
    fn test_unpriced_intake_produces_zero_total() {
        let purchases = vec![purchase("Sample (unit)", 3, dec!(0))];
        assert_eq!(purchase_total(&purchases), Decimal::ZERO);
    }

    #[test]
    fn test_note_names_each_line() {
        let purchases = vec![
            purchase("Tea (250g)", 10, dec!(120.50)),
            purchase("Sugar (1kg)", 2, dec!(40)),
        ];
        let note = purchase_note(&purchases);
        assert!(note.contains("Tea (250g) x 10"));
        assert!(note.contains("Sugar (1kg) x 2"));
    }
}
