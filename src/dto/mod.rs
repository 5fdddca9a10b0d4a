//! Typed request and response bodies for the remote-callable operations.

pub mod payroll;
pub mod production_plan;
pub mod reposting;
pub mod work_order;

use rust_decimal::Decimal;
use validator::ValidationError;

pub(crate) fn validate_positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        let mut err = ValidationError::new("positive");
        err.message = Some("Quantity must be greater than zero".into());
        return Err(err);
    }
    Ok(())
}

pub(crate) fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("not_blank");
        err.message = Some("Value cannot be blank".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn positive_rejects_zero_and_negative() {
        assert!(validate_positive(&dec!(1)).is_ok());
        assert!(validate_positive(&Decimal::ZERO).is_err());
        assert!(validate_positive(&dec!(-2)).is_err());
    }

    #[test]
    fn blank_strings_are_rejected() {
        assert!(validate_not_blank("Stores").is_ok());
        assert!(validate_not_blank("   ").is_err());
    }
}
