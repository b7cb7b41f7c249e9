//! Money bounds
//!
//! Amounts are stored as `NUMERIC(14, 2)`: at most two decimal places and
//! twelve integer digits. Anything outside that is rejected before it
//! reaches storage, so both backends see the same values.

use rust_decimal::Decimal;

use crate::{Result, SpendError};

/// Decimal places kept for money
pub const MONEY_SCALE: u32 = 2;

/// Largest storable amount, `999_999_999_999.99`
pub const MAX_MONEY: Decimal = Decimal::from_parts(0x107A_3FFF, 0x5AF3, 0, false, MONEY_SCALE);

/// Reject values with more than two decimal places or beyond [`MAX_MONEY`]
pub fn validate_money(field: &str, value: Decimal) -> Result<()> {
    if value.normalize().scale() > MONEY_SCALE {
        return Err(SpendError::Validation(format!(
            "{} must have at most {} decimal places, got {}",
            field, MONEY_SCALE, value
        )));
    }
    if value.abs() > MAX_MONEY {
        return Err(SpendError::Validation(format!(
            "{} must not exceed {}, got {}",
            field, MAX_MONEY, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_max_money() {
        assert_eq!(MAX_MONEY, dec!(999999999999.99));
    }

    #[test]
    fn test_scale() {
        assert!(validate_money("amount", dec!(10.25)).is_ok());
        // Trailing zeros do not count
        assert!(validate_money("amount", dec!(10.2500)).is_ok());
        assert!(validate_money("amount", dec!(0.001)).is_err());
        assert!(validate_money("amount", dec!(100.005)).is_err());
    }

    #[test]
    fn test_magnitude() {
        assert!(validate_money("amount", MAX_MONEY).is_ok());
        assert!(validate_money("amount", dec!(1000000000000)).is_err());
        assert!(validate_money("amount", dec!(-1000000000000)).is_err());
    }
}
