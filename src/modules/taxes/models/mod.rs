pub mod tax_breakdown;

pub use tax_breakdown::TaxBreakdown;
