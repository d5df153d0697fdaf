//! Bahikhata - GST invoicing and bookkeeping backend for small
//! retail businesses.
//!
//! The catalog, sales and books stay consistent through two rules:
//! invoice mutations commit together with their stock adjustments in
//! one transaction, and invoice status is always derived from the
//! payments linked to the invoice.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

pub use modules::clients;
pub use modules::expenses;
pub use modules::inventory;
pub use modules::invoices;
pub use modules::payments;
pub use modules::products;
pub use modules::taxes;
