// Stock ledger: plans and applies signed quantity deltas against
// product variants, rejecting any batch that would drive a quantity
// negative. Pure in-memory logic; persistence happens in the invoice
// repository inside the same database transaction.

use std::collections::BTreeMap;

use crate::core::{AppError, Result};
use crate::modules::inventory::models::StockDelta;
use crate::modules::invoices::models::InvoiceItem;
use crate::modules::products::models::Product;

/// Deltas for allocating an invoice's lines out of stock (all negative).
pub fn sale_deltas(items: &[InvoiceItem]) -> Vec<StockDelta> {
    aggregate(items.iter().map(|i| keyed(i, -i.quantity)))
}

/// Deltas for returning an invoice's lines to stock (all positive).
pub fn return_deltas(items: &[InvoiceItem]) -> Vec<StockDelta> {
    aggregate(items.iter().map(|i| keyed(i, i.quantity)))
}

/// Net deltas for replacing `old` lines with `new` lines: the old
/// quantities come back and the new quantities go out, collapsed per
/// variant so an unchanged line produces no adjustment at all.
pub fn edit_deltas(old: &[InvoiceItem], new: &[InvoiceItem]) -> Vec<StockDelta> {
    aggregate(
        old.iter()
            .map(|i| keyed(i, i.quantity))
            .chain(new.iter().map(|i| keyed(i, -i.quantity))),
    )
}

/// Applies a delta batch to the given products.
///
/// All-or-nothing: every resulting quantity is computed and checked
/// before any variant is mutated, so a failed batch leaves the products
/// exactly as they were. Failure names the offending product/variant and
/// the available vs. requested amounts.
pub fn apply(products: &mut [Product], deltas: &[StockDelta]) -> Result<()> {
    // Check phase: resolve every delta and validate the new quantity.
    let mut staged: Vec<(usize, usize, i64)> = Vec::with_capacity(deltas.len());

    for delta in deltas {
        let product_idx = products
            .iter()
            .position(|p| p.id == delta.product_id)
            .ok_or_else(|| {
                AppError::not_found(format!("Product with ID {} not found", delta.product_id))
            })?;

        let product = &products[product_idx];
        let variant_idx = product
            .variants
            .iter()
            .position(|v| v.id == delta.variant_id)
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Variant for {} not found",
                    product.name
                ))
            })?;

        let variant = &product.variants[variant_idx];
        let new_quantity = variant.quantity + delta.delta;
        if new_quantity < 0 {
            return Err(AppError::InsufficientStock {
                product: product.name.clone(),
                variant: variant.name.clone(),
                requested: -delta.delta,
                available: variant.quantity,
            });
        }

        staged.push((product_idx, variant_idx, new_quantity));
    }

    // Write phase: every check passed, mutate in place.
    for (product_idx, variant_idx, new_quantity) in staged {
        products[product_idx].variants[variant_idx].quantity = new_quantity;
    }

    Ok(())
}

/// Drops deltas whose product or variant is absent from `products`.
///
/// Old invoice lines may reference catalog entries removed since the
/// sale; their restore deltas are skipped rather than failing the edit
/// or delete. Deltas for live lines always resolve, so nothing real is
/// lost here.
pub fn retain_known(deltas: Vec<StockDelta>, products: &[Product]) -> Vec<StockDelta> {
    deltas
        .into_iter()
        .filter(|d| {
            products
                .iter()
                .find(|p| p.id == d.product_id)
                .map(|p| p.variant(&d.variant_id).is_some())
                .unwrap_or(false)
        })
        .collect()
}

fn keyed(item: &InvoiceItem, delta: i64) -> ((String, String), i64) {
    ((item.product_id.clone(), item.variant_id.clone()), delta)
}

fn aggregate(entries: impl Iterator<Item = ((String, String), i64)>) -> Vec<StockDelta> {
    let mut net: BTreeMap<(String, String), i64> = BTreeMap::new();
    for (key, delta) in entries {
        *net.entry(key).or_insert(0) += delta;
    }

    net.into_iter()
        .filter(|(_, delta)| *delta != 0)
        .map(|((product_id, variant_id), delta)| StockDelta {
            product_id,
            variant_id,
            delta,
        })
        .collect()
}
