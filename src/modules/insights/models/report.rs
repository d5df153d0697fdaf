use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Variant-level analysis of the business, produced by the model under
/// a structured-output schema so every field below is guaranteed
/// present.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessReport {
    pub restock_recommendations: Vec<RestockRecommendation>,
    pub top_selling_products: Vec<TopSellingProduct>,
    pub inventory_forecasts: Vec<InventoryForecast>,
    pub predicted_sales: PredictedSales,
    pub overall_summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestockRecommendation {
    pub product_name: String,
    pub variant_name: String,
    pub current_stock: i64,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSellingProduct {
    pub product_name: String,
    pub variant_name: String,
    pub units_sold: i64,
    pub total_revenue: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryForecast {
    pub product_name: String,
    pub variant_name: String,
    pub suggested_order_quantity: i64,
    pub reasoning: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictedSales {
    pub next_month: Decimal,
    pub insight: String,
}

/// A line item read off a supplier invoice image.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedLineItem {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub hsn_sac_code: String,
    pub price: Decimal,
    pub quantity: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionRequest {
    pub item_name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionResponse {
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceImageRequest {
    pub base64_image: String,
    pub mime_type: String,
}
