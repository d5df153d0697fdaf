use rust_decimal::Decimal;

use crate::core::money;
use crate::modules::invoices::models::InvoiceItem;
use crate::modules::taxes::models::TaxBreakdown;

/// Derives the GST breakdown for a set of invoice items.
///
/// Pure function, never fails. Each line contributes
/// `quantity × unit_price` to the subtotal and `line_subtotal × rate/100`
/// of GST, split evenly into CGST and SGST.
///
/// Business policy: IGST is always 0 and the split is applied regardless
/// of whether the seller and buyer states match. This intentionally
/// diverges from the standard interstate IGST rule; the jurisdiction
/// parameters remain on the signature so a compliant rule can replace it.
pub fn calculate_invoice_taxes(
    items: &[InvoiceItem],
    _seller_state: &str,
    _buyer_state: &str,
) -> TaxBreakdown {
    let mut subtotal = Decimal::ZERO;
    let mut cgst = Decimal::ZERO;
    let mut sgst = Decimal::ZERO;
    let igst = Decimal::ZERO;

    let two = Decimal::from(2);
    let hundred = Decimal::from(100);

    for item in items {
        let line_subtotal = Decimal::from(item.quantity) * item.unit_price;
        subtotal += line_subtotal;

        let gst_amount = line_subtotal * item.gst_rate / hundred;
        cgst += gst_amount / two;
        sgst += gst_amount / two;
    }

    let subtotal = money::round(subtotal);
    let cgst = money::round(cgst);
    let sgst = money::round(sgst);
    let total = money::round(subtotal + cgst + sgst + igst);

    TaxBreakdown {
        subtotal,
        cgst,
        sgst,
        igst,
        total,
    }
}
