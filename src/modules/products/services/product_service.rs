use std::sync::Arc;

use crate::core::{AppError, Result};
use crate::modules::expenses::models::InventoryPurchase;
use crate::modules::expenses::services::ExpenseService;
use crate::modules::invoices::repositories::InvoiceRepository;
use crate::modules::products::models::{CreateProductRequest, Product, VariantRequest};
use crate::modules::products::repositories::{ProductRepository, ProductWrite};

/// Product business logic: catalog CRUD, scanner batch import, the
/// delete guard, and the inventory-purchase trigger for the expense
/// auto-poster.
pub struct ProductService {
    product_repo: Arc<ProductRepository>,
    invoice_repo: Arc<InvoiceRepository>,
    expense_service: Arc<ExpenseService>,
}

impl ProductService {
    pub fn new(
        product_repo: Arc<ProductRepository>,
        invoice_repo: Arc<InvoiceRepository>,
        expense_service: Arc<ExpenseService>,
    ) -> Self {
        Self {
            product_repo,
            invoice_repo,
            expense_service,
        }
    }

    pub async fn create_product(
        &self,
        owner_id: &str,
        request: CreateProductRequest,
    ) -> Result<Product> {
        request.validate()?;
        let product = self.product_repo.create(owner_id, &request).await?;

        let purchases = initial_purchases(&product.name, &request.variants);
        if !purchases.is_empty() {
            self.expense_service
                .post_inventory_purchase(owner_id, &purchases)
                .await?;
        }

        Ok(product)
    }

    pub async fn get_product(&self, owner_id: &str, id: &str) -> Result<Product> {
        self.product_repo
            .find_by_id(owner_id, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product with id '{}' not found", id)))
    }

    pub async fn list_products(&self, owner_id: &str) -> Result<Vec<Product>> {
        self.product_repo.list(owner_id).await
    }

    pub async fn update_product(
        &self,
        owner_id: &str,
        id: &str,
        request: CreateProductRequest,
    ) -> Result<Product> {
        request.validate()?;
        let old = self.get_product(owner_id, id).await?;

        self.product_repo.update(owner_id, id, &request).await?;

        let purchases = increase_purchases(&old, &request);
        if !purchases.is_empty() {
            self.expense_service
                .post_inventory_purchase(owner_id, &purchases)
                .await?;
        }

        self.get_product(owner_id, id).await
    }

    /// Deletes a product unless an invoice line still references it.
    pub async fn delete_product(&self, owner_id: &str, id: &str) -> Result<()> {
        if self.invoice_repo.product_in_use(owner_id, id).await? {
            return Err(AppError::integrity(
                "This product cannot be deleted as it is part of one or more invoices. \
                 Please remove it from all invoices first.",
            ));
        }

        self.product_repo.delete(owner_id, id).await
    }

    /// Imports scanned products, merging into the existing catalog by
    /// case-insensitive name (and variants by name), all in a single
    /// transaction. Stock brought in with a positive cost price feeds
    /// the daily inventory expense.
    pub async fn batch_import(
        &self,
        owner_id: &str,
        requests: Vec<CreateProductRequest>,
    ) -> Result<()> {
        for request in &requests {
            request.validate()?;
        }

        let existing = self.product_repo.list(owner_id).await?;
        let mut writes: Vec<ProductWrite> = Vec::with_capacity(requests.len());
        let mut purchases: Vec<InventoryPurchase> = Vec::new();

        for request in requests {
            match existing
                .iter()
                .find(|p| p.name.eq_ignore_ascii_case(&request.name))
            {
                Some(product) => {
                    let mut merged: Vec<VariantRequest> = product
                        .variants
                        .iter()
                        .map(|v| VariantRequest {
                            id: Some(v.id.clone()),
                            name: v.name.clone(),
                            cost_price: v.cost_price,
                            selling_price: v.selling_price,
                            quantity: v.quantity,
                        })
                        .collect();

                    for incoming in &request.variants {
                        match merged
                            .iter_mut()
                            .find(|v| v.name.eq_ignore_ascii_case(&incoming.name))
                        {
                            Some(known) => known.quantity += incoming.quantity,
                            None => merged.push(VariantRequest {
                                id: None,
                                ..incoming.clone()
                            }),
                        }

                        if incoming.quantity > 0 && incoming.cost_price > rust_decimal::Decimal::ZERO
                        {
                            purchases.push(InventoryPurchase {
                                label: format!("{} ({})", product.name, incoming.name),
                                quantity: incoming.quantity,
                                unit_cost: incoming.cost_price,
                            });
                        }
                    }

                    writes.push(ProductWrite::Update {
                        id: product.id.clone(),
                        request: CreateProductRequest {
                            name: product.name.clone(),
                            description: product.description.clone(),
                            hsn_sac_code: product.hsn_sac_code.clone(),
                            gst_rate: product.gst_rate,
                            variants: merged,
                        },
                    });
                }
                None => {
                    purchases.extend(initial_purchases(&request.name, &request.variants));
                    writes.push(ProductWrite::Create(request));
                }
            }
        }

        self.product_repo.apply_batch(owner_id, &writes).await?;

        if !purchases.is_empty() {
            self.expense_service
                .post_inventory_purchase(owner_id, &purchases)
                .await?;
        }

        Ok(())
    }
}

/// Purchases implied by brand-new stock with a positive cost price.
fn initial_purchases(product_name: &str, variants: &[VariantRequest]) -> Vec<InventoryPurchase> {
    variants
        .iter()
        .filter(|v| v.quantity > 0 && v.cost_price > rust_decimal::Decimal::ZERO)
        .map(|v| InventoryPurchase {
            label: format!("{} ({})", product_name, v.name),
            quantity: v.quantity,
            unit_cost: v.cost_price,
        })
        .collect()
}

/// Purchases implied by an edit that raised variant quantities.
fn increase_purchases(old: &Product, request: &CreateProductRequest) -> Vec<InventoryPurchase> {
    request
        .variants
        .iter()
        .filter_map(|variant| {
            let previous = variant
                .id
                .as_deref()
                .and_then(|id| old.variant(id))
                .map(|v| v.quantity)
                .unwrap_or(0);
            let increase = variant.quantity - previous;

            if increase > 0 && variant.cost_price > rust_decimal::Decimal::ZERO {
                Some(InventoryPurchase {
                    label: format!("{} ({})", request.name, variant.name),
                    quantity: increase,
                    unit_cost: variant.cost_price,
                })
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::products::models::ProductVariant;
    use rust_decimal::Decimal;

    fn old_product() -> Product {
        Product {
            id: "p-1".to_string(),
            name: "Atta".to_string(),
            description: String::new(),
            hsn_sac_code: "1101".to_string(),
            gst_rate: Decimal::from(5),
            variants: vec![ProductVariant {
                id: "v-1".to_string(),
                name: "10kg".to_string(),
                cost_price: Decimal::from(300),
                selling_price: Decimal::from(380),
                quantity: 12,
            }],
        }
    }

    #[test]
    fn test_increase_purchases_only_counts_positive_deltas() {
        let request = CreateProductRequest {
            name: "Atta".to_string(),
            description: String::new(),
            hsn_sac_code: "1101".to_string(),
            gst_rate: Decimal::from(5),
            variants: vec![VariantRequest {
                id: Some("v-1".to_string()),
                name: "10kg".to_string(),
                cost_price: Decimal::from(300),
                selling_price: Decimal::from(380),
                quantity: 20,
            }],
        };

        let purchases = increase_purchases(&old_product(), &request);
        assert_eq!(purchases.len(), 1);
        assert_eq!(purchases[0].quantity, 8);
        assert_eq!(purchases[0].label, "Atta (10kg)");
    }

    #[test]
    fn test_decrease_produces_no_purchase() {
        let request = CreateProductRequest {
            name: "Atta".to_string(),
            description: String::new(),
            hsn_sac_code: "1101".to_string(),
            gst_rate: Decimal::from(5),
            variants: vec![VariantRequest {
                id: Some("v-1".to_string()),
                name: "10kg".to_string(),
                cost_price: Decimal::from(300),
                selling_price: Decimal::from(380),
                quantity: 5,
            }],
        };

        assert!(increase_purchases(&old_product(), &request).is_empty());
    }

    #[test]
    fn test_new_variant_counts_from_zero() {
        let request = CreateProductRequest {
            name: "Atta".to_string(),
            description: String::new(),
            hsn_sac_code: "1101".to_string(),
            gst_rate: Decimal::from(5),
            variants: vec![VariantRequest {
                id: None,
                name: "5kg".to_string(),
                cost_price: Decimal::from(160),
                selling_price: Decimal::from(200),
                quantity: 6,
            }],
        };

        let purchases = increase_purchases(&old_product(), &request);
        assert_eq!(purchases.len(), 1);
        assert_eq!(purchases[0].quantity, 6);
    }

    #[test]
    fn test_zero_cost_stock_is_not_an_expense() {
        let variants = vec![VariantRequest {
            id: None,
            name: "Sample".to_string(),
            cost_price: Decimal::ZERO,
            selling_price: Decimal::from(10),
            quantity: 50,
        }];
        assert!(initial_purchases("Freebie", &variants).is_empty());
    }
}
