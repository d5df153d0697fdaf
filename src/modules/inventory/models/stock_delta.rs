use serde::Serialize;

/// A signed stock adjustment against one product variant.
///
/// Negative deltas allocate stock to an invoice; positive deltas return
/// it. Deltas are always aggregated per (product, variant) before being
/// applied, so one batch never touches the same variant twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockDelta {
    pub product_id: String,
    pub variant_id: String,
    pub delta: i64,
}
