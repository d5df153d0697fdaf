use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use bahikhata::invoices::models::{ClientSnapshot, Invoice, InvoiceItem, InvoiceStatus};
use bahikhata::taxes::gst_calculator::calculate_invoice_taxes;

fn item(id: &str, quantity: i64, unit_price: Decimal, gst_rate: Decimal) -> InvoiceItem {
    InvoiceItem {
        id: id.to_string(),
        product_id: "product-1".to_string(),
        product_name: "Assam Tea".to_string(),
        description: "Loose leaf".to_string(),
        hsn_sac_code: "0902".to_string(),
        variant_id: "variant-1".to_string(),
        variant_name: "250g".to_string(),
        quantity,
        unit_price,
        gst_rate,
    }
}

fn invoice(items: Vec<InvoiceItem>) -> Invoice {
    let now = Utc::now();
    Invoice {
        id: "invoice-1".to_string(),
        invoice_number: "INV-1001".to_string(),
        client: ClientSnapshot {
            id: "client-1".to_string(),
            name: "Sharma Traders".to_string(),
            gstin: "27AAAAA0000A1Z5".to_string(),
            address: "12 MG Road".to_string(),
            state: "Maharashtra".to_string(),
            contact: "9800000000".to_string(),
        },
        items,
        issue_date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
        due_date: NaiveDate::from_ymd_opt(2024, 7, 31).unwrap(),
        status: InvoiceStatus::Unpaid,
        subtotal: Decimal::ZERO,
        cgst: Decimal::ZERO,
        sgst: Decimal::ZERO,
        igst: Decimal::ZERO,
        total: Decimal::ZERO,
        paid_amount: Decimal::ZERO,
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn test_totals_cover_every_line() {
    let mut inv = invoice(vec![
        item("it-1", 2, dec!(500), dec!(18)),
        item("it-2", 1, dec!(250), dec!(5)),
    ]);
    let taxes = calculate_invoice_taxes(&inv.items, "Maharashtra", "Maharashtra");
    inv.apply_taxes(taxes);

    assert_eq!(inv.subtotal, dec!(1250.00));
    // 18% of 1000 plus 5% of 250, split into halves
    assert_eq!(inv.cgst, dec!(96.25));
    assert_eq!(inv.sgst, dec!(96.25));
    assert_eq!(inv.igst, dec!(0));
    assert_eq!(inv.total, dec!(1442.50));
}

#[test]
fn test_total_equals_subtotal_plus_taxes() {
    let mut inv = invoice(vec![item("it-1", 3, dec!(33.33), dec!(18))]);
    let taxes = calculate_invoice_taxes(&inv.items, "Delhi", "Delhi");
    inv.apply_taxes(taxes);

    assert_eq!(inv.total, inv.subtotal + inv.cgst + inv.sgst + inv.igst);
}

#[test]
fn test_valid_invoice_passes_validation() {
    let inv = invoice(vec![item("it-1", 1, dec!(100), dec!(18))]);
    assert!(inv.validate().is_ok());
}

#[test]
fn test_invoice_without_lines_is_rejected() {
    let inv = invoice(vec![]);
    assert!(inv.validate().is_err());
}

#[test]
fn test_due_date_before_issue_date_is_rejected() {
    let mut inv = invoice(vec![item("it-1", 1, dec!(100), dec!(18))]);
    inv.due_date = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
    assert!(inv.validate().is_err());
}

#[test]
fn test_same_day_issue_and_due_is_allowed() {
    let mut inv = invoice(vec![item("it-1", 1, dec!(100), dec!(18))]);
    inv.due_date = inv.issue_date;
    assert!(inv.validate().is_ok());
}

#[test]
fn test_bad_line_fails_the_invoice() {
    let inv = invoice(vec![item("it-1", 0, dec!(100), dec!(18))]);
    assert!(inv.validate().is_err());
}
