use rust_decimal_macros::dec;

use bahikhata::core::AppError;
use bahikhata::inventory::stock_ledger;
use bahikhata::invoices::models::InvoiceItem;
use bahikhata::products::models::{Product, ProductVariant};

fn catalog_item(variant_id: &str, quantity: i64) -> InvoiceItem {
    InvoiceItem {
        id: format!("item-{}", variant_id),
        product_id: "product-1".to_string(),
        product_name: "Assam Tea".to_string(),
        description: String::new(),
        hsn_sac_code: "0902".to_string(),
        variant_id: variant_id.to_string(),
        variant_name: format!("Variant {}", variant_id),
        quantity,
        unit_price: dec!(100),
        gst_rate: dec!(18),
    }
}

fn product(stock_a: i64, stock_b: i64) -> Product {
    Product {
        id: "product-1".to_string(),
        name: "Assam Tea".to_string(),
        description: String::new(),
        hsn_sac_code: "0902".to_string(),
        gst_rate: dec!(18),
        variants: vec![
            ProductVariant {
                id: "variant-a".to_string(),
                name: "250g".to_string(),
                cost_price: dec!(60),
                selling_price: dec!(100),
                quantity: stock_a,
            },
            ProductVariant {
                id: "variant-b".to_string(),
                name: "500g".to_string(),
                cost_price: dec!(110),
                selling_price: dec!(180),
                quantity: stock_b,
            },
        ],
    }
}

fn quantities(product: &Product) -> (i64, i64) {
    (product.variants[0].quantity, product.variants[1].quantity)
}

#[test]
fn test_sale_decrements_each_variant() {
    let mut products = vec![product(10, 5)];
    let items = vec![catalog_item("variant-a", 3), catalog_item("variant-b", 2)];

    let deltas = stock_ledger::sale_deltas(&items);
    stock_ledger::apply(&mut products, &deltas).unwrap();

    assert_eq!(quantities(&products[0]), (7, 3));
}

#[test]
fn test_deleting_a_sale_restores_stock() {
    let mut products = vec![product(7, 3)];
    let items = vec![catalog_item("variant-a", 3), catalog_item("variant-b", 2)];

    let deltas = stock_ledger::return_deltas(&items);
    stock_ledger::apply(&mut products, &deltas).unwrap();

    assert_eq!(quantities(&products[0]), (10, 5));
}

#[test]
fn test_edit_applies_only_the_net_difference() {
    // Sold 3 originally, stock is down to 7; raising the line to 5
    // should only take the 2 extra.
    let mut products = vec![product(7, 5)];
    let old = vec![catalog_item("variant-a", 3)];
    let new = vec![catalog_item("variant-a", 5)];

    let deltas = stock_ledger::edit_deltas(&old, &new);
    stock_ledger::apply(&mut products, &deltas).unwrap();

    assert_eq!(quantities(&products[0]), (5, 5));
}

#[test]
fn test_oversell_fails_and_names_the_variant() {
    let mut products = vec![product(7, 5)];
    let old = vec![catalog_item("variant-a", 3)];
    let new = vec![catalog_item("variant-a", 13)];

    let deltas = stock_ledger::edit_deltas(&old, &new);
    let err = stock_ledger::apply(&mut products, &deltas).unwrap_err();

    match err {
        AppError::InsufficientStock {
            product,
            variant,
            requested,
            available,
        } => {
            assert_eq!(product, "Assam Tea");
            assert_eq!(variant, "250g");
            assert_eq!(requested, 10);
            assert_eq!(available, 7);
        }
        other => panic!("expected InsufficientStock, got {:?}", other),
    }
}

#[test]
fn test_failed_check_leaves_all_quantities_untouched() {
    // The first delta alone would succeed; the oversell on the second
    // variant must prevent both.
    let mut products = vec![product(10, 1)];
    let items = vec![catalog_item("variant-a", 2), catalog_item("variant-b", 4)];

    let deltas = stock_ledger::sale_deltas(&items);
    assert!(stock_ledger::apply(&mut products, &deltas).is_err());

    assert_eq!(quantities(&products[0]), (10, 1));
}

#[test]
fn test_duplicate_variant_lines_are_aggregated() {
    let mut products = vec![product(10, 5)];
    let items = vec![catalog_item("variant-a", 3), catalog_item("variant-a", 4)];

    let deltas = stock_ledger::sale_deltas(&items);
    assert_eq!(deltas.len(), 1);
    assert_eq!(deltas[0].delta, -7);

    stock_ledger::apply(&mut products, &deltas).unwrap();
    assert_eq!(quantities(&products[0]), (3, 5));
}

#[test]
fn test_unchanged_edit_produces_no_deltas() {
    let old = vec![catalog_item("variant-a", 3)];
    let deltas = stock_ledger::edit_deltas(&old, &old);

    assert!(deltas.is_empty());
}

#[test]
fn test_edit_skips_restock_for_a_variant_gone_from_the_catalog() {
    // The old line's variant was deleted from the catalog after the
    // sale; dropping that line from the invoice must still go through,
    // restoring nothing for it.
    let mut products = vec![product(7, 5)];
    let old = vec![
        catalog_item("variant-a", 3),
        catalog_item("variant-gone", 2),
    ];
    let new = vec![catalog_item("variant-a", 3)];

    let deltas = stock_ledger::edit_deltas(&old, &new);
    let deltas = stock_ledger::retain_known(deltas, &products);
    stock_ledger::apply(&mut products, &deltas).unwrap();

    assert_eq!(quantities(&products[0]), (7, 5));
}

#[test]
fn test_retain_known_keeps_live_deltas() {
    let products = vec![product(7, 5)];
    let old = vec![
        catalog_item("variant-a", 3),
        catalog_item("variant-gone", 2),
    ];
    let new = vec![catalog_item("variant-a", 5)];

    let deltas = stock_ledger::retain_known(stock_ledger::edit_deltas(&old, &new), &products);

    assert_eq!(deltas.len(), 1);
    assert_eq!(deltas[0].variant_id, "variant-a");
    assert_eq!(deltas[0].delta, -2);
}

#[test]
fn test_unknown_product_is_rejected() {
    let mut products: Vec<Product> = Vec::new();
    let items = vec![catalog_item("variant-a", 1)];

    let deltas = stock_ledger::sale_deltas(&items);
    let err = stock_ledger::apply(&mut products, &deltas).unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}
