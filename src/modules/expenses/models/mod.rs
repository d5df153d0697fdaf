pub mod expense;

pub use expense::{Expense, ExpenseCategory, ExpenseRequest, InventoryPurchase};
