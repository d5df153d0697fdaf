pub mod stock_ledger;
