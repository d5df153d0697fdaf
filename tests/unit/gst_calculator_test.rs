use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use bahikhata::invoices::models::InvoiceItem;
use bahikhata::taxes::gst_calculator::calculate_invoice_taxes;

fn item(quantity: i64, unit_price: Decimal, gst_rate: Decimal) -> InvoiceItem {
    InvoiceItem {
        id: "item-1".to_string(),
        product_id: "product-1".to_string(),
        product_name: "Assam Tea".to_string(),
        description: String::new(),
        hsn_sac_code: "0902".to_string(),
        variant_id: "variant-1".to_string(),
        variant_name: "250g".to_string(),
        quantity,
        unit_price,
        gst_rate,
    }
}

#[test]
fn test_single_line_splits_gst_evenly() {
    let items = vec![item(1, dec!(1000), dec!(18))];
    let taxes = calculate_invoice_taxes(&items, "Maharashtra", "Maharashtra");

    assert_eq!(taxes.subtotal, dec!(1000.00));
    assert_eq!(taxes.cgst, dec!(90.00));
    assert_eq!(taxes.sgst, dec!(90.00));
    assert_eq!(taxes.igst, dec!(0));
    assert_eq!(taxes.total, dec!(1180.00));
}

#[test]
fn test_split_is_independent_of_state_match() {
    let items = vec![item(1, dec!(1000), dec!(18))];
    let intra = calculate_invoice_taxes(&items, "Maharashtra", "Maharashtra");
    let inter = calculate_invoice_taxes(&items, "Maharashtra", "Karnataka");

    assert_eq!(intra.cgst, inter.cgst);
    assert_eq!(intra.sgst, inter.sgst);
    assert_eq!(inter.igst, dec!(0));
    assert_eq!(intra.total, inter.total);
}

#[test]
fn test_mixed_rates_accumulate_per_line() {
    let items = vec![
        item(2, dec!(500), dec!(18)),  // 1000.00, gst 180.00
        item(4, dec!(25.50), dec!(5)), // 102.00, gst 5.10
    ];
    let taxes = calculate_invoice_taxes(&items, "Delhi", "Delhi");

    assert_eq!(taxes.subtotal, dec!(1102.00));
    assert_eq!(taxes.cgst, dec!(92.55));
    assert_eq!(taxes.sgst, dec!(92.55));
    assert_eq!(taxes.total, dec!(1287.10));
}

#[test]
fn test_line_amounts_are_rounded_to_paise() {
    let items = vec![item(3, dec!(33.33), dec!(18))];
    let taxes = calculate_invoice_taxes(&items, "Delhi", "Delhi");

    assert_eq!(taxes.subtotal, dec!(99.99));
    // 99.99 * 18% = 17.9982, split 8.9991 each side
    assert_eq!(taxes.cgst + taxes.sgst + taxes.subtotal, taxes.total);
}

#[test]
fn test_zero_rate_line_carries_no_tax() {
    let items = vec![item(10, dec!(12.50), dec!(0))];
    let taxes = calculate_invoice_taxes(&items, "Delhi", "Delhi");

    assert_eq!(taxes.subtotal, dec!(125.00));
    assert_eq!(taxes.cgst, dec!(0));
    assert_eq!(taxes.sgst, dec!(0));
    assert_eq!(taxes.total, dec!(125.00));
}

#[test]
fn test_no_lines_means_zero_everything() {
    let taxes = calculate_invoice_taxes(&[], "Delhi", "Delhi");

    assert_eq!(taxes.subtotal, Decimal::ZERO);
    assert_eq!(taxes.total, Decimal::ZERO);
}

proptest! {
    #[test]
    fn test_igst_is_always_zero(
        quantity in 1i64..1_000,
        price_paise in 0u64..10_000_000,
        rate_percent in 0u32..=28,
    ) {
        let price = Decimal::from(price_paise) / Decimal::from(100);
        let items = vec![item(quantity, price, Decimal::from(rate_percent))];
        let taxes = calculate_invoice_taxes(&items, "Maharashtra", "Karnataka");

        prop_assert_eq!(taxes.igst, Decimal::ZERO);
    }

    #[test]
    fn test_halves_are_equal_and_total_is_consistent(
        quantity in 1i64..1_000,
        price_paise in 0u64..10_000_000,
        rate_percent in 0u32..=28,
    ) {
        let price = Decimal::from(price_paise) / Decimal::from(100);
        let items = vec![item(quantity, price, Decimal::from(rate_percent))];
        let taxes = calculate_invoice_taxes(&items, "Delhi", "Delhi");

        prop_assert_eq!(taxes.cgst, taxes.sgst);
        prop_assert_eq!(
            taxes.total,
            taxes.subtotal + taxes.cgst + taxes.sgst + taxes.igst
        );
        prop_assert!(taxes.total >= taxes.subtotal);
    }
}
