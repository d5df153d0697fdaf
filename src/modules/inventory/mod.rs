// Inventory ledger: per-variant stock deltas with atomic, all-or-nothing
// application.

pub mod models;
pub mod services;

pub use models::StockDelta;
pub use services::stock_ledger;
