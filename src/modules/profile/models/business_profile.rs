use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};

/// The owner's registered business identity. Printed on invoices and
/// the source of the seller state for tax computation.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BusinessProfile {
    pub name: String,
    pub gstin: String,
    pub address: String,
    pub state: String,
    pub contact: String,
    pub upi_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessProfileRequest {
    pub name: String,
    #[serde(default)]
    pub gstin: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub upi_id: String,
}

impl BusinessProfileRequest {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Business name is required"));
        }
        if !self.gstin.is_empty() && self.gstin.len() != 15 {
            return Err(AppError::validation("GSTIN must be 15 characters"));
        }
        Ok(())
    }
}
