// GST calculation

pub mod models;
pub mod services;

pub use models::TaxBreakdown;
pub use services::gst_calculator;
