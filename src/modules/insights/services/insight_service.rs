use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::info;

use super::genai_client::{ContentPart, GenAiClient};
use crate::core::{AppError, Result};
use crate::modules::expenses::repositories::ExpenseRepository;
use crate::modules::insights::models::{BusinessReport, ExtractedLineItem, InvoiceImageRequest};
use crate::modules::invoices::repositories::InvoiceRepository;
use crate::modules::products::repositories::ProductRepository;

pub struct InsightService {
    genai: Arc<dyn GenAiClient>,
    product_repo: Arc<ProductRepository>,
    invoice_repo: Arc<InvoiceRepository>,
    expense_repo: Arc<ExpenseRepository>,
}

impl InsightService {
    pub fn new(
        genai: Arc<dyn GenAiClient>,
        product_repo: Arc<ProductRepository>,
        invoice_repo: Arc<InvoiceRepository>,
        expense_repo: Arc<ExpenseRepository>,
    ) -> Self {
        Self {
            genai,
            product_repo,
            invoice_repo,
            expense_repo,
        }
    }

    /// Short invoice-item description for the catalog form.
    pub async fn generate_description(&self, item_name: &str) -> Result<String> {
        if item_name.trim().is_empty() {
            return Err(AppError::validation("Item name is required"));
        }

        let prompt = format!(
            "Write a brief, professional description for an invoice item named '{}'. \
             Keep it under 15 words.",
            item_name
        );
        self.genai.generate_text(&prompt).await
    }

    /// Reads line items off a supplier invoice image.
    pub async fn extract_invoice_items(
        &self,
        request: &InvoiceImageRequest,
    ) -> Result<Vec<ExtractedLineItem>> {
        let parts = [
            ContentPart::InlineData {
                mime_type: request.mime_type.clone(),
                data: request.base64_image.clone(),
            },
            ContentPart::Text(
                "Analyze this invoice image. Extract all line items and return them as a \
                 JSON array. For each item, provide 'name', 'description' (if any), \
                 'hsnSacCode' (if any), 'price' (as a number), and 'quantity' (as a number)."
                    .to_string(),
            ),
        ];

        let raw = self
            .genai
            .generate_json(&parts, extracted_items_schema())
            .await?;
        let items: Vec<ExtractedLineItem> = serde_json::from_str(&raw)?;

        info!(count = items.len(), "line items extracted from invoice image");
        Ok(items)
    }

    /// Full business analysis over the owner's catalog, sales and
    /// expenses.
    pub async fn business_report(&self, owner_id: &str) -> Result<BusinessReport> {
        let products = self.product_repo.list(owner_id).await?;
        let invoices = self.invoice_repo.list(owner_id).await?;
        let expenses = self.expense_repo.list(owner_id).await?;

        let prompt = format!(
            "You are an expert business analyst AI for a small retail store in India. \
             Analyze the following business data. The data includes the current product \
             inventory (tracked by variants), all recent invoices (sales), and business \
             expenses. Based on this data, provide a detailed business analysis in the \
             required JSON format. Today's date is {}.\n\n\
             Here is the data:\n\
             Current Product Inventory (by variant): {}\n\
             Recent Sales Invoices (by variant): {}\n\
             Recent Business Expenses: {}\n\n\
             Please provide the following insights at the variant level:\n\
             1. restockRecommendations: Identify product variants that are low in stock \
             and have high sales velocity. Suggest at least 2-3 items.\n\
             2. topSellingProducts: List the top 3 product variants by total revenue \
             generated. Calculate units sold and total revenue for each.\n\
             3. inventoryForecasts: For the top 3 selling product variants, calculate a \
             suggested order quantity for the next month. Base this on recent sales. \
             Provide brief reasoning.\n\
             4. predictedSales: Forecast the total sales revenue for the next calendar \
             month across all products. Provide a brief insight.\n\
             5. overallSummary: Provide a concise (2-3 sentences), actionable summary \
             for the business owner.",
            Utc::now().format("%Y-%m-%d %H:%M:%S"),
            serde_json::to_string(&products)?,
            serde_json::to_string(&invoices)?,
            serde_json::to_string(&expenses)?,
        );

        let parts = [ContentPart::Text(prompt)];
        let raw = self
            .genai
            .generate_json(&parts, business_report_schema())
            .await?;
        let report: BusinessReport = serde_json::from_str(&raw)?;

        info!("business report generated");
        Ok(report)
    }
}

fn extracted_items_schema() -> serde_json::Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "name": { "type": "STRING" },
                "description": { "type": "STRING" },
                "hsnSacCode": { "type": "STRING" },
                "price": { "type": "NUMBER" },
                "quantity": { "type": "NUMBER" }
            },
            "required": ["name", "quantity", "price"]
        }
    })
}

fn business_report_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "restockRecommendations": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "productName": { "type": "STRING" },
                        "variantName": { "type": "STRING" },
                        "currentStock": { "type": "NUMBER" },
                        "reason": { "type": "STRING" }
                    },
                    "required": ["productName", "variantName", "currentStock", "reason"]
                }
            },
            "topSellingProducts": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "productName": { "type": "STRING" },
                        "variantName": { "type": "STRING" },
                        "unitsSold": { "type": "NUMBER" },
                        "totalRevenue": { "type": "NUMBER" }
                    },
                    "required": ["productName", "variantName", "unitsSold", "totalRevenue"]
                }
            },
            "inventoryForecasts": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "productName": { "type": "STRING" },
                        "variantName": { "type": "STRING" },
                        "suggestedOrderQuantity": { "type": "NUMBER" },
                        "reasoning": { "type": "STRING" }
                    },
                    "required": ["productName", "variantName", "suggestedOrderQuantity", "reasoning"]
                }
            },
            "predictedSales": {
                "type": "OBJECT",
                "properties": {
                    "nextMonth": { "type": "NUMBER" },
                    "insight": { "type": "STRING" }
                },
                "required": ["nextMonth", "insight"]
            },
            "overallSummary": { "type": "STRING" }
        },
        "required": [
            "restockRecommendations",
            "topSellingProducts",
            "inventoryForecasts",
            "predictedSales",
            "overallSummary"
        ]
    })
}
