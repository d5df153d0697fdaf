use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::{AppError, Result};

/// A buyer the business invoices. Referenced from invoices as a frozen
/// snapshot, never as a live join.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Client {
    pub id: String,
    pub name: String,
    /// GST registration identifier; empty for unregistered buyers
    pub gstin: String,
    pub address: String,
    /// Home state, used as the buyer jurisdiction on invoices
    pub state: String,
    pub contact: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientRequest {
    pub name: String,
    #[serde(default)]
    pub gstin: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub contact: String,
}

impl ClientRequest {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Client name cannot be empty"));
        }

        // GSTIN is a fixed 15-character identifier when present
        if !self.gstin.is_empty() && self.gstin.len() != 15 {
            return Err(AppError::validation(
                "GSTIN must be exactly 15 characters",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_requires_name() {
        let req = ClientRequest {
            name: "  ".to_string(),
            gstin: String::new(),
            address: String::new(),
            state: String::new(),
            contact: String::new(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_gstin_length_checked_when_present() {
        let mut req = ClientRequest {
            name: "Sharma Traders".to_string(),
            gstin: "27ABCDE1234F1Z5".to_string(),
            address: String::new(),
            state: "Maharashtra".to_string(),
            contact: String::new(),
        };
        assert!(req.validate().is_ok());

        req.gstin = "short".to_string();
        assert!(req.validate().is_err());
    }
}
