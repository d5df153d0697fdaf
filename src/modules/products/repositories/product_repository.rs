use sqlx::{MySql, MySqlPool, Transaction};
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::products::models::{CreateProductRequest, Product, ProductVariant};

/// A staged catalog write, applied in one transaction by
/// [`ProductRepository::apply_batch`]. Batch imports stay atomic this way.
#[derive(Debug, Clone)]
pub enum ProductWrite {
    Create(CreateProductRequest),
    Update {
        id: String,
        request: CreateProductRequest,
    },
}

/// MySQL access for products and their variants.
///
/// Variant quantities written here come from direct catalog edits
/// (stock intake, corrections). Invoice-driven quantity changes go
/// through the invoice repository's locked transaction instead.
pub struct ProductRepository {
    pool: MySqlPool,
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    description: String,
    hsn_sac_code: String,
    gst_rate: rust_decimal::Decimal,
}

#[derive(Debug, sqlx::FromRow)]
struct VariantRow {
    id: String,
    product_id: String,
    name: String,
    cost_price: rust_decimal::Decimal,
    selling_price: rust_decimal::Decimal,
    quantity: i64,
}

impl VariantRow {
    fn into_variant(self) -> ProductVariant {
        ProductVariant {
            id: self.id,
            name: self.name,
            cost_price: self.cost_price,
            selling_price: self.selling_price,
            quantity: self.quantity,
        }
    }
}

impl ProductRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, owner_id: &str, request: &CreateProductRequest) -> Result<Product> {
        let mut tx = self.pool.begin().await?;
        let product = Self::insert_product_tx(&mut tx, owner_id, request).await?;
        tx.commit().await?;
        Ok(product)
    }

    pub async fn find_by_id(&self, owner_id: &str, id: &str) -> Result<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, description, hsn_sac_code, gst_rate
            FROM products
            WHERE owner_id = ? AND id = ?
            "#,
        )
        .bind(owner_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let variants = sqlx::query_as::<_, VariantRow>(
            r#"
            SELECT id, product_id, name, cost_price, selling_price, quantity
            FROM product_variants
            WHERE product_id = ?
            ORDER BY position
            "#,
        )
        .bind(&row.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(Product {
            id: row.id,
            name: row.name,
            description: row.description,
            hsn_sac_code: row.hsn_sac_code,
            gst_rate: row.gst_rate,
            variants: variants.into_iter().map(VariantRow::into_variant).collect(),
        }))
    }

    pub async fn list(&self, owner_id: &str) -> Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, description, hsn_sac_code, gst_rate
            FROM products
            WHERE owner_id = ?
            ORDER BY name
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        let variant_rows = sqlx::query_as::<_, VariantRow>(
            r#"
            SELECT v.id, v.product_id, v.name, v.cost_price, v.selling_price, v.quantity
            FROM product_variants v
            JOIN products p ON p.id = v.product_id
            WHERE p.owner_id = ?
            ORDER BY v.position
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        let mut products: Vec<Product> = rows
            .into_iter()
            .map(|row| Product {
                id: row.id,
                name: row.name,
                description: row.description,
                hsn_sac_code: row.hsn_sac_code,
                gst_rate: row.gst_rate,
                variants: Vec::new(),
            })
            .collect();

        for variant in variant_rows {
            if let Some(product) = products.iter_mut().find(|p| p.id == variant.product_id) {
                product.variants.push(variant.into_variant());
            }
        }

        Ok(products)
    }

    pub async fn update(
        &self,
        owner_id: &str,
        id: &str,
        request: &CreateProductRequest,
    ) -> Result<()> {
        self.apply_batch(
            owner_id,
            &[ProductWrite::Update {
                id: id.to_string(),
                request: request.clone(),
            }],
        )
        .await
    }

    /// Applies a set of catalog writes in a single transaction.
    pub async fn apply_batch(&self, owner_id: &str, writes: &[ProductWrite]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for write in writes {
            match write {
                ProductWrite::Create(request) => {
                    Self::insert_product_tx(&mut tx, owner_id, request).await?;
                }
                ProductWrite::Update { id, request } => {
                    Self::update_product_tx(&mut tx, owner_id, id, request).await?;
                }
            }
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn delete(&self, owner_id: &str, id: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            DELETE v FROM product_variants v
            JOIN products p ON p.id = v.product_id
            WHERE p.owner_id = ? AND p.id = ?
            "#,
        )
        .bind(owner_id)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM products WHERE owner_id = ? AND id = ?")
            .bind(owner_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Product with id '{}' not found",
                id
            )));
        }

        tx.commit().await?;
        Ok(())
    }

    async fn insert_product_tx(
        tx: &mut Transaction<'_, MySql>,
        owner_id: &str,
        request: &CreateProductRequest,
    ) -> Result<Product> {
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO products (id, owner_id, name, description, hsn_sac_code, gst_rate)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(owner_id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(&request.hsn_sac_code)
        .bind(request.gst_rate)
        .execute(&mut **tx)
        .await?;

        let mut variants = Vec::with_capacity(request.variants.len());
        for (position, variant) in request.variants.iter().enumerate() {
            let variant_id = variant
                .id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string());

            sqlx::query(
                r#"
                INSERT INTO product_variants
                    (id, product_id, name, cost_price, selling_price, quantity, position)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&variant_id)
            .bind(&id)
            .bind(&variant.name)
            .bind(variant.cost_price)
            .bind(variant.selling_price)
            .bind(variant.quantity)
            .bind(position as i32)
            .execute(&mut **tx)
            .await?;

            variants.push(ProductVariant {
                id: variant_id,
                name: variant.name.clone(),
                cost_price: variant.cost_price,
                selling_price: variant.selling_price,
                quantity: variant.quantity,
            });
        }

        Ok(Product {
            id,
            name: request.name.clone(),
            description: request.description.clone(),
            hsn_sac_code: request.hsn_sac_code.clone(),
            gst_rate: request.gst_rate,
            variants,
        })
    }

    /// Overwrites product fields and reconciles variants by id: known ids
    /// are updated, new entries inserted, and rows absent from the
    /// request deleted.
    async fn update_product_tx(
        tx: &mut Transaction<'_, MySql>,
        owner_id: &str,
        id: &str,
        request: &CreateProductRequest,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?, description = ?, hsn_sac_code = ?, gst_rate = ?
            WHERE owner_id = ? AND id = ?
            "#,
        )
        .bind(&request.name)
        .bind(&request.description)
        .bind(&request.hsn_sac_code)
        .bind(request.gst_rate)
        .bind(owner_id)
        .bind(id)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Product with id '{}' not found",
                id
            )));
        }

        let mut kept_ids: Vec<String> = Vec::with_capacity(request.variants.len());

        for (position, variant) in request.variants.iter().enumerate() {
            match &variant.id {
                Some(variant_id) => {
                    sqlx::query(
                        r#"
                        UPDATE product_variants
                        SET name = ?, cost_price = ?, selling_price = ?, quantity = ?, position = ?
                        WHERE id = ? AND product_id = ?
                        "#,
                    )
                    .bind(&variant.name)
                    .bind(variant.cost_price)
                    .bind(variant.selling_price)
                    .bind(variant.quantity)
                    .bind(position as i32)
                    .bind(variant_id)
                    .bind(id)
                    .execute(&mut **tx)
                    .await?;
                    kept_ids.push(variant_id.clone());
                }
                None => {
                    let variant_id = Uuid::new_v4().to_string();
                    sqlx::query(
                        r#"
                        INSERT INTO product_variants
                            (id, product_id, name, cost_price, selling_price, quantity, position)
                        VALUES (?, ?, ?, ?, ?, ?, ?)
                        "#,
                    )
                    .bind(&variant_id)
                    .bind(id)
                    .bind(&variant.name)
                    .bind(variant.cost_price)
                    .bind(variant.selling_price)
                    .bind(variant.quantity)
                    .bind(position as i32)
                    .execute(&mut **tx)
                    .await?;
                    kept_ids.push(variant_id);
                }
            }
        }

        // Drop variants removed from the request
        let placeholders = vec!["?"; kept_ids.len()].join(", ");
        let sql = format!(
            "DELETE FROM product_variants WHERE product_id = ? AND id NOT IN ({})",
            placeholders
        );
        let mut query = sqlx::query(&sql).bind(id);
        for kept in &kept_ids {
            query = query.bind(kept);
        }
        query.execute(&mut **tx).await?;

        Ok(())
    }
}
