use bigdecimal::BigDecimal;
use std::fmt;

use crate::domain::CurrentUser;

pub const AUTHORITY_MAX_LEN: usize = 64;
/// Largest accepted amount in minor units: 18 digits, which fits NUMERIC(20, 0) and i64.
pub const AMOUNT_MAX_MINOR_UNITS: i64 = 999_999_999_999_999_999;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), ValidationError>;

pub fn validate_required(field: &'static str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }

    Ok(())
}

pub fn validate_max_len(field: &'static str, value: &str, max_len: usize) -> ValidationResult {
    if value.len() > max_len {
        return Err(ValidationError::new(
            field,
            format!("must be at most {} characters", max_len),
        ));
    }

    Ok(())
}

pub fn validate_positive_amount(amount: &BigDecimal) -> ValidationResult {
    if amount <= &BigDecimal::from(0) {
        return Err(ValidationError::new("amount", "must be greater than zero"));
    }

    Ok(())
}

/// Amounts are whole currency minor units, strictly positive and bounded.
pub fn validate_amount(amount: &BigDecimal) -> ValidationResult {
    validate_positive_amount(amount)?;

    if amount.with_scale(0) != *amount {
        return Err(ValidationError::new(
            "amount",
            "must be a whole number of minor currency units",
        ));
    }

    if amount > &BigDecimal::from(AMOUNT_MAX_MINOR_UNITS) {
        return Err(ValidationError::new(
            "amount",
            format!("must be at most {}", AMOUNT_MAX_MINOR_UNITS),
        ));
    }

    Ok(())
}

pub fn validate_authority(authority: &str) -> ValidationResult {
    validate_required("authority", authority)?;
    validate_max_len("authority", authority, AUTHORITY_MAX_LEN)?;

    if !authority
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.')
    {
        return Err(ValidationError::new(
            "authority",
            "must contain only letters, digits, '-', '_' or '.'",
        ));
    }

    Ok(())
}

pub fn validate_identity(user: &CurrentUser) -> ValidationResult {
    if user.id <= 0 {
        return Err(ValidationError::new("user", "an authenticated identity is required"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn validates_required_field() {
        assert!(validate_required("field", "value").is_ok());
        assert!(validate_required("field", "   ").is_err());
    }

    #[test]
    fn validates_max_len() {
        assert!(validate_max_len("field", "abc", 3).is_ok());
        assert!(validate_max_len("field", "abcd", 3).is_err());
    }

    #[test]
    fn validates_positive_amount() {
        let positive = BigDecimal::from_str("1.23").expect("valid decimal");
        let zero = BigDecimal::from(0);
        let negative = BigDecimal::from(-1);

        assert!(validate_positive_amount(&positive).is_ok());
        assert!(validate_positive_amount(&zero).is_err());
        assert!(validate_positive_amount(&negative).is_err());
    }

    #[test]
    fn validates_amount_in_minor_units() {
        assert!(validate_amount(&BigDecimal::from(100000)).is_ok());
        assert!(validate_amount(&BigDecimal::from_str("100000.00").unwrap()).is_ok());
        assert!(validate_amount(&BigDecimal::from(1)).is_ok());
        assert!(validate_amount(&BigDecimal::from(AMOUNT_MAX_MINOR_UNITS)).is_ok());

        let fractional = validate_amount(&BigDecimal::from_str("10.5").unwrap()).unwrap_err();
        assert_eq!(fractional.field, "amount");
        assert!(validate_amount(&BigDecimal::from(0)).is_err());
        assert!(validate_amount(&BigDecimal::from(-100)).is_err());
        assert!(validate_amount(&BigDecimal::from_str("1000000000000000000").unwrap()).is_err());
    }

    #[test]
    fn validates_authority() {
        assert!(validate_authority("5f8f8c44d6e36").is_ok());
        assert!(validate_authority("65f1c2a8b3e4d5.12345678").is_ok());
        assert!(validate_authority("").is_err());
        assert!(validate_authority("  ").is_err());
        assert!(validate_authority(&"a".repeat(AUTHORITY_MAX_LEN + 1)).is_err());
        assert!(validate_authority("abc; DROP TABLE").is_err());
    }

    #[test]
    fn validates_identity() {
        assert!(validate_identity(&CurrentUser { id: 42 }).is_ok());
        assert!(validate_identity(&CurrentUser { id: 0 }).is_err());
        assert!(validate_identity(&CurrentUser { id: -3 }).is_err());
    }

    #[test]
    fn validation_error_display() {
        let err = ValidationError::new("amount", "must be greater than zero");
        assert_eq!(err.to_string(), "amount: must be greater than zero");
    }
}
