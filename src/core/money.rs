use rust_decimal::Decimal;

/// All amounts in the system are rupees with paise precision.
pub const SCALE: u32 = 2;

/// Rounds a rupee amount to paise (banker's rounding, as rust_decimal does).
pub fn round(amount: Decimal) -> Decimal {
    amount.round_dp(SCALE)
}

/// Validates that an amount is non-negative and carries at most paise precision.
pub fn validate_amount(amount: Decimal) -> std::result::Result<(), String> {
    if amount < Decimal::ZERO {
        return Err("Amount cannot be negative".to_string());
    }

    if amount.scale() > SCALE {
        return Err(format!(
            "Amounts must have at most {} decimal places, got {}",
            SCALE,
            amount.scale()
        ));
    }

    Ok(())
}

/// Formats an amount for display, e.g. "₹1,234.50" without the grouping.
pub fn format_inr(amount: Decimal) -> String {
    format!("₹{:.2}", amount.round_dp(SCALE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_round_to_paise() {
        assert_eq!(
            round(Decimal::from_str("10.005").unwrap()),
            Decimal::from_str("10.00").unwrap()
        );
        assert_eq!(
            round(Decimal::from_str("10.015").unwrap()),
            Decimal::from_str("10.02").unwrap()
        );
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(Decimal::from_str("100.50").unwrap()).is_ok());
        assert!(validate_amount(Decimal::from_str("-1").unwrap()).is_err());
        assert!(validate_amount(Decimal::from_str("1.005").unwrap()).is_err());
    }

    #[test]
    fn test_format_inr() {
        assert_eq!(format_inr(Decimal::from_str("1180").unwrap()), "₹1180.00");
    }
}
