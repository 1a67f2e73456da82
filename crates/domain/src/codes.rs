//! Integer and string codes the shop backend uses on the wire.

use serde::{Deserialize, Serialize};

/// Lifecycle status of an order, integer-coded on the wire.
///
/// The backend stores these as plain numbers; a freshly submitted
/// order is always `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(into = "i64", try_from = "i64")]
pub enum OrderStatus {
    /// Order submitted, not yet picked up for fulfillment.
    #[default]
    Pending,

    /// Order is being prepared or shipped.
    InProgress,

    /// Order was delivered (terminal state).
    Delivered,

    /// Order was cancelled and its stock restored (terminal state).
    Cancelled,
}

impl OrderStatus {
    /// Returns the wire code for this status.
    pub fn code(&self) -> i64 {
        match self {
            OrderStatus::Pending => 1,
            OrderStatus::InProgress => 2,
            OrderStatus::Delivered => 3,
            OrderStatus::Cancelled => 4,
        }
    }

    /// Returns true if no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::InProgress => "InProgress",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<OrderStatus> for i64 {
    fn from(status: OrderStatus) -> Self {
        status.code()
    }
}

impl TryFrom<i64> for OrderStatus {
    type Error = String;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(OrderStatus::Pending),
            2 => Ok(OrderStatus::InProgress),
            3 => Ok(OrderStatus::Delivered),
            4 => Ok(OrderStatus::Cancelled),
            other => Err(format!("invalid order status code: {}", other)),
        }
    }
}

/// Delivery method for an order, integer-coded on the wire.
///
/// The storefront always submits `Standard`; the other codes appear in
/// orders created through different channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(into = "i64", try_from = "i64")]
pub enum DeliveryMethod {
    /// Regular carrier delivery.
    #[default]
    Standard,

    /// Expedited carrier delivery.
    Express,

    /// Customer picks the order up in store.
    StorePickup,
}

impl DeliveryMethod {
    /// Returns the wire code for this delivery method.
    pub fn code(&self) -> i64 {
        match self {
            DeliveryMethod::Standard => 1,
            DeliveryMethod::Express => 2,
            DeliveryMethod::StorePickup => 3,
        }
    }

    /// Returns the method name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryMethod::Standard => "Standard",
            DeliveryMethod::Express => "Express",
            DeliveryMethod::StorePickup => "StorePickup",
        }
    }
}

impl std::fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<DeliveryMethod> for i64 {
    fn from(method: DeliveryMethod) -> Self {
        method.code()
    }
}

impl TryFrom<i64> for DeliveryMethod {
    type Error = String;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(DeliveryMethod::Standard),
            2 => Ok(DeliveryMethod::Express),
            3 => Ok(DeliveryMethod::StorePickup),
            other => Err(format!("invalid delivery method code: {}", other)),
        }
    }
}

/// Payment type recorded on a bill, string-coded on the wire.
///
/// Payment handling itself is outside this core; the checkout flow
/// records `CreditCard` on every bill it creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentType {
    /// Paid by credit card.
    #[default]
    CreditCard,

    /// Paid by debit card.
    DebitCard,

    /// Paid in cash on delivery or pickup.
    Cash,
}

impl PaymentType {
    /// Returns the wire string for this payment type.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::CreditCard => "CREDIT_CARD",
            PaymentType::DebitCard => "DEBIT_CARD",
            PaymentType::Cash => "CASH",
        }
    }
}

impl std::fmt::Display for PaymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_codes() {
        assert_eq!(OrderStatus::Pending.code(), 1);
        assert_eq!(OrderStatus::InProgress.code(), 2);
        assert_eq!(OrderStatus::Delivered.code(), 3);
        assert_eq!(OrderStatus::Cancelled.code(), 4);
    }

    #[test]
    fn test_order_status_serializes_as_integer() {
        let json = serde_json::to_string(&OrderStatus::Pending).unwrap();
        assert_eq!(json, "1");
        let back: OrderStatus = serde_json::from_str("3").unwrap();
        assert_eq!(back, OrderStatus::Delivered);
    }

    #[test]
    fn test_order_status_rejects_unknown_code() {
        let result: Result<OrderStatus, _> = serde_json::from_str("9");
        assert!(result.is_err());
    }

    #[test]
    fn test_order_status_terminal_states() {
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::InProgress.is_terminal());
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_order_status_default_is_pending() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_delivery_method_codes() {
        assert_eq!(DeliveryMethod::Standard.code(), 1);
        assert_eq!(DeliveryMethod::Express.code(), 2);
        assert_eq!(DeliveryMethod::StorePickup.code(), 3);
        assert_eq!(serde_json::to_string(&DeliveryMethod::Standard).unwrap(), "1");
    }

    #[test]
    fn test_payment_type_wire_strings() {
        assert_eq!(
            serde_json::to_string(&PaymentType::CreditCard).unwrap(),
            "\"CREDIT_CARD\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentType::DebitCard).unwrap(),
            "\"DEBIT_CARD\""
        );
        assert_eq!(serde_json::to_string(&PaymentType::Cash).unwrap(), "\"CASH\"");
    }

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(OrderStatus::InProgress.to_string(), "InProgress");
        assert_eq!(DeliveryMethod::StorePickup.to_string(), "StorePickup");
        assert_eq!(PaymentType::CreditCard.to_string(), "CREDIT_CARD");
    }
}
