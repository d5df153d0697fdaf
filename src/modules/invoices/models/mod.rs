pub mod invoice;
pub mod invoice_item;

pub use invoice::{
    ClientSnapshot, CreateInvoiceRequest, Invoice, InvoiceStatus, UpdateInvoiceRequest,
};
pub use invoice_item::{InvoiceItem, InvoiceItemRequest};
