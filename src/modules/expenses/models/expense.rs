use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpenseCategory {
    Inventory,
    Marketing,
    Utilities,
    Salary,
    Other,
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExpenseCategory::Inventory => "Inventory",
            ExpenseCategory::Marketing => "Marketing",
            ExpenseCategory::Utilities => "Utilities",
            ExpenseCategory::Salary => "Salary",
            ExpenseCategory::Other => "Other",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ExpenseCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Inventory" => Ok(ExpenseCategory::Inventory),
            "Marketing" => Ok(ExpenseCategory::Marketing),
            "Utilities" => Ok(ExpenseCategory::Utilities),
            "Salary" => Ok(ExpenseCategory::Salary),
            "Other" => Ok(ExpenseCategory::Other),
            other => Err(format!("unknown expense category '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub category: ExpenseCategory,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRequest {
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub category: ExpenseCategory,
}

impl ExpenseRequest {
    pub fn validate(&self) -> Result<()> {
        if self.description.trim().is_empty() {
            return Err(AppError::validation("Expense description is required"));
        }
        if self.amount <= Decimal::ZERO {
            return Err(AppError::validation("Expense amount must be positive"));
        }
        crate::core::money::validate_amount(self.amount).map_err(AppError::validation)?;
        Ok(())
    }
}

/// One line of a stock intake, priced at cost. Produced by the catalog
/// when new quantities enter it and folded into the books as an
/// Inventory expense.
#[derive(Debug, Clone)]
pub struct InventoryPurchase {
    pub label: String,
    pub quantity: i64,
    pub unit_cost: Decimal,
}
