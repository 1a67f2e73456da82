//! Checkout state machine.

use serde::{Deserialize, Serialize};

/// The state of a checkout attempt in its lifecycle.
///
/// State transitions:
/// ```text
/// Idle ──► ValidatingCart ──► ResolvingAddress ──► CreatingBill
///            ──► CreatingOrder ──► CreatingOrderDetails ──► Completed
/// ```
/// `Failed` is reachable from every non-terminal state. A failed
/// attempt is not dead: re-running it resumes from the progress the
/// attempt recorded, so `Failed` is a resting state rather than a
/// terminal one. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CheckoutState {
    /// Attempt created, nothing validated yet.
    #[default]
    Idle,

    /// Checking the cart is non-empty and locking it.
    ValidatingCart,

    /// Resolving or creating the shipping address.
    ResolvingAddress,

    /// Submitting the bill (first financial write).
    CreatingBill,

    /// Submitting the order referencing the bill and address.
    CreatingOrder,

    /// Submitting one order line per cart item, in cart order.
    CreatingOrderDetails,

    /// All records created, cart cleared (terminal state).
    Completed,

    /// A step failed; recorded progress allows a resume.
    Failed,
}

impl CheckoutState {
    /// Returns true once the attempt has finished successfully.
    pub fn is_completed(&self) -> bool {
        matches!(self, CheckoutState::Completed)
    }

    /// Returns true if the last run of the attempt failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, CheckoutState::Failed)
    }

    /// Returns true while cancellation is still honored.
    ///
    /// Once bill creation starts, the attempt runs to completion and
    /// reports its outcome instead of aborting mid-write.
    pub fn can_cancel(&self) -> bool {
        matches!(
            self,
            CheckoutState::Idle | CheckoutState::ValidatingCart | CheckoutState::ResolvingAddress
        )
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutState::Idle => "Idle",
            CheckoutState::ValidatingCart => "ValidatingCart",
            CheckoutState::ResolvingAddress => "ResolvingAddress",
            CheckoutState::CreatingBill => "CreatingBill",
            CheckoutState::CreatingOrder => "CreatingOrder",
            CheckoutState::CreatingOrderDetails => "CreatingOrderDetails",
            CheckoutState::Completed => "Completed",
            CheckoutState::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_idle() {
        assert_eq!(CheckoutState::default(), CheckoutState::Idle);
    }

    #[test]
    fn test_completed_and_failed() {
        assert!(CheckoutState::Completed.is_completed());
        assert!(!CheckoutState::Failed.is_completed());
        assert!(CheckoutState::Failed.is_failed());
        assert!(!CheckoutState::CreatingBill.is_failed());
    }

    #[test]
    fn test_can_cancel_only_before_bill_creation() {
        assert!(CheckoutState::Idle.can_cancel());
        assert!(CheckoutState::ValidatingCart.can_cancel());
        assert!(CheckoutState::ResolvingAddress.can_cancel());
        assert!(!CheckoutState::CreatingBill.can_cancel());
        assert!(!CheckoutState::CreatingOrder.can_cancel());
        assert!(!CheckoutState::CreatingOrderDetails.can_cancel());
        assert!(!CheckoutState::Completed.can_cancel());
        assert!(!CheckoutState::Failed.can_cancel());
    }

    #[test]
    fn test_display() {
        assert_eq!(CheckoutState::Idle.to_string(), "Idle");
        assert_eq!(CheckoutState::ValidatingCart.to_string(), "ValidatingCart");
        assert_eq!(
            CheckoutState::CreatingOrderDetails.to_string(),
            "CreatingOrderDetails"
        );
        assert_eq!(CheckoutState::Failed.to_string(), "Failed");
    }

    #[test]
    fn test_serialization() {
        let state = CheckoutState::CreatingBill;
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: CheckoutState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
    }
}
