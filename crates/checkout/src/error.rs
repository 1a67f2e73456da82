//! Checkout error types.

use common::{BillId, OrderId};
use shop_api::ApiError;
use thiserror::Error;

use crate::state::CheckoutState;

/// Errors that can occur during a checkout attempt.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has no items.
    #[error("Cart is empty")]
    EmptyCart,

    /// No authenticated client id is available.
    #[error("Sign in before checking out")]
    AuthRequired,

    /// A required address field is missing.
    #[error("Address field '{field}' must not be empty")]
    AddressField { field: &'static str },

    /// Another attempt already holds the cart lock.
    #[error("A checkout is already in progress")]
    CheckoutInProgress,

    /// The attempt was cancelled before any financial record existed.
    #[error("Checkout cancelled")]
    Cancelled,

    /// The live cart no longer matches the attempt's snapshot; the
    /// attempt cannot be resumed and a fresh one must be started.
    #[error("Cart changed since this checkout started, start a new checkout")]
    CartChanged,

    /// A remote step failed with nothing committed yet.
    #[error("Checkout step {stage} failed: {source}")]
    StepFailed {
        stage: CheckoutState,
        source: ApiError,
    },

    /// A remote step failed after earlier steps committed records.
    ///
    /// Carries exactly what exists server-side so the orphan is never
    /// silent: the bill always, the order and line count when they
    /// were reached.
    #[error("Checkout step {stage} failed after earlier steps committed: {source}")]
    PartialFailure {
        stage: CheckoutState,
        bill_id: BillId,
        order_id: Option<OrderId>,
        details_created: usize,
        source: ApiError,
    },
}

impl CheckoutError {
    /// Returns the failed remote stage, if the error came from one.
    pub fn stage(&self) -> Option<CheckoutState> {
        match self {
            CheckoutError::StepFailed { stage, .. }
            | CheckoutError::PartialFailure { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Returns true for client-side validation failures that occur
    /// before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CheckoutError::EmptyCart | CheckoutError::AddressField { .. }
        )
    }

    /// Returns true if remote records were committed before the failure.
    pub fn is_partial(&self) -> bool {
        matches!(self, CheckoutError::PartialFailure { .. })
    }
}

/// Convenience type alias for checkout results.
pub type Result<T> = std::result::Result<T, CheckoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(status: u16) -> ApiError {
        ApiError::Status {
            path: "/bills/".to_string(),
            status,
        }
    }

    #[test]
    fn test_stage_only_set_for_remote_failures() {
        let step = CheckoutError::StepFailed {
            stage: CheckoutState::CreatingBill,
            source: remote(500),
        };
        assert_eq!(step.stage(), Some(CheckoutState::CreatingBill));

        assert_eq!(CheckoutError::EmptyCart.stage(), None);
        assert_eq!(CheckoutError::Cancelled.stage(), None);
    }

    #[test]
    fn test_validation_classification() {
        assert!(CheckoutError::EmptyCart.is_validation());
        assert!(CheckoutError::AddressField { field: "street" }.is_validation());
        assert!(!CheckoutError::AuthRequired.is_validation());
        assert!(
            !CheckoutError::StepFailed {
                stage: CheckoutState::CreatingOrder,
                source: remote(500),
            }
            .is_validation()
        );
    }

    #[test]
    fn test_partial_classification() {
        let partial = CheckoutError::PartialFailure {
            stage: CheckoutState::CreatingOrder,
            bill_id: BillId::new(7),
            order_id: None,
            details_created: 0,
            source: remote(500),
        };
        assert!(partial.is_partial());
        assert!(!partial.is_validation());
        assert_eq!(partial.stage(), Some(CheckoutState::CreatingOrder));
    }
}
