use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use bahikhata::invoices::models::InvoiceStatus;
use bahikhata::invoices::services::status_reconciler::derive_status;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_no_payments_before_due_date_is_unpaid() {
    let status = derive_status(dec!(1180), Decimal::ZERO, date(2024, 7, 31), date(2024, 7, 10));
    assert_eq!(status, InvoiceStatus::Unpaid);
}

#[test]
fn test_partial_payment_before_due_date() {
    let status = derive_status(dec!(1180), dec!(500), date(2024, 7, 31), date(2024, 7, 10));
    assert_eq!(status, InvoiceStatus::PartiallyPaid);
}

#[test]
fn test_full_payment_is_paid() {
    let status = derive_status(dec!(1180), dec!(1180), date(2024, 7, 31), date(2024, 7, 10));
    assert_eq!(status, InvoiceStatus::Paid);
}

#[test]
fn test_overpayment_still_reads_paid() {
    let status = derive_status(dec!(1180), dec!(2000), date(2024, 7, 31), date(2024, 7, 10));
    assert_eq!(status, InvoiceStatus::Paid);
}

#[test]
fn test_paid_wins_over_overdue() {
    // Fully settled after the due date has passed.
    let status = derive_status(dec!(1180), dec!(1180), date(2024, 7, 31), date(2024, 8, 15));
    assert_eq!(status, InvoiceStatus::Paid);
}

#[test]
fn test_unpaid_past_due_date_is_overdue() {
    let status = derive_status(dec!(1180), Decimal::ZERO, date(2024, 7, 31), date(2024, 8, 1));
    assert_eq!(status, InvoiceStatus::Overdue);
}

#[test]
fn test_partial_payment_past_due_date_is_overdue() {
    let status = derive_status(dec!(1180), dec!(500), date(2024, 7, 31), date(2024, 8, 1));
    assert_eq!(status, InvoiceStatus::Overdue);
}

#[test]
fn test_due_date_itself_is_not_overdue() {
    let status = derive_status(dec!(1180), Decimal::ZERO, date(2024, 7, 31), date(2024, 7, 31));
    assert_eq!(status, InvoiceStatus::Unpaid);
}

#[test]
fn test_zero_total_invoice_settles_immediately() {
    // Zero owed is zero outstanding: a free-of-charge invoice reads
    // Paid without any payment recorded.
    let status = derive_status(Decimal::ZERO, Decimal::ZERO, date(2024, 7, 31), date(2024, 7, 10));
    assert_eq!(status, InvoiceStatus::Paid);
}

#[test]
fn test_zero_total_invoice_never_goes_overdue() {
    let status = derive_status(Decimal::ZERO, Decimal::ZERO, date(2024, 7, 31), date(2024, 8, 15));
    assert_eq!(status, InvoiceStatus::Paid);
}
