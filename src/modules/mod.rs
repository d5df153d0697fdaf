pub mod clients;
pub mod expenses;
pub mod health;
pub mod insights;
pub mod inventory;
pub mod invoices;
pub mod payments;
pub mod products;
pub mod profile;
pub mod taxes;
