pub mod invoice_service;
pub mod status_reconciler;

pub use invoice_service::InvoiceService;
pub use status_reconciler::StatusReconciler;
