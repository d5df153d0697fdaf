use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMode {
    Cash,
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    #[serde(rename = "UPI")]
    Upi,
    Other,
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentMode::Cash => "Cash",
            PaymentMode::BankTransfer => "Bank Transfer",
            PaymentMode::Upi => "UPI",
            PaymentMode::Other => "Other",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for PaymentMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Cash" => Ok(PaymentMode::Cash),
            "Bank Transfer" => Ok(PaymentMode::BankTransfer),
            "UPI" => Ok(PaymentMode::Upi),
            "Other" => Ok(PaymentMode::Other),
            other => Err(format!("unknown payment mode '{}'", other)),
        }
    }
}

/// A payment received from a client. Linking to an invoice is optional;
/// an unlinked payment is an on-account receipt and never affects any
/// invoice's status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub invoice_id: Option<String>,
    pub client_id: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub mode: PaymentMode,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub invoice_id: Option<String>,
    pub client_id: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub mode: PaymentMode,
    #[serde(default)]
    pub notes: Option<String>,
}

impl PaymentRequest {
    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(AppError::validation("Client is required"));
        }
        if self.amount <= Decimal::ZERO {
            return Err(AppError::validation("Payment amount must be positive"));
        }
        crate::core::money::validate_amount(self.amount).map_err(AppError::validation)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request(amount: Decimal) -> PaymentRequest {
        PaymentRequest {
            invoice_id: None,
            client_id: "client-1".to_string(),
            amount,
            date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            mode: PaymentMode::Upi,
            notes: None,
        }
    }

    #[test]
    fn test_zero_amount_is_rejected() {
        assert!(request(dec!(0)).validate().is_err());
        assert!(request(dec!(-10)).validate().is_err());
        assert!(request(dec!(0.01)).validate().is_ok());
    }

    #[test]
    fn test_mode_round_trips_through_display_strings() {
        for mode in [
            PaymentMode::Cash,
            PaymentMode::BankTransfer,
            PaymentMode::Upi,
            PaymentMode::Other,
        ] {
            assert_eq!(mode.to_string().parse::<PaymentMode>(), Ok(mode));
        }
    }
}
