//! Domain Errors - Business rule violations
//!
//! Contains ONLY business logic errors, не infrastructure errors

use thiserror::Error;

/// Domain-specific errors representing business rule violations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Business validation: title/name cannot be empty
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    /// Business validation: amount must be a positive finite number
    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),

    /// Business rule: payment cannot exceed the remaining balance
    #[error("Payment amount {amount:.2} exceeds remaining balance {remaining:.2}")]
    PaymentExceedsBalance { amount: f64, remaining: f64 },

    /// Business validation: habit goal must be at least 1
    #[error("Invalid habit goal: {0}")]
    InvalidGoal(u64),

    /// Business validation: odds must be positive
    #[error("Invalid odds: {0}")]
    InvalidOdds(f64),

    /// Business validation: link cannot be normalized
    #[error("Invalid link: {0}")]
    InvalidLink(String),

    /// Business validation: unknown role name
    #[error("Unknown role: {0}")]
    UnknownRole(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Check if error is a business validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            DomainError::EmptyField(_)
                | DomainError::InvalidAmount(_)
                | DomainError::InvalidGoal(_)
                | DomainError::InvalidOdds(_)
                | DomainError::InvalidLink(_)
                | DomainError::UnknownRole(_)
        )
    }

    /// Check if error is a business rule violation
    pub fn is_business_rule_error(&self) -> bool {
        matches!(self, DomainError::PaymentExceedsBalance { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(DomainError::EmptyField("Title").is_validation_error());
        assert!(!DomainError::EmptyField("Title").is_business_rule_error());

        let overpay = DomainError::PaymentExceedsBalance {
            amount: 10.0,
            remaining: 5.0,
        };
        assert!(overpay.is_business_rule_error());
        assert_eq!(
            overpay.to_string(),
            "Payment amount 10.00 exceeds remaining balance 5.00"
        );
    }
}
