//! Cart change notifications.

use common::ProductId;
use serde::{Deserialize, Serialize};

/// A change made to the cart, broadcast to whoever subscribed.
///
/// Quantities carried here are the values after clamping, so a
/// subscriber rendering a badge never has to re-derive them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CartEvent {
    /// A product was added; `quantity` is the resulting line quantity.
    ItemAdded { product_id: ProductId, quantity: u32 },

    /// A line's quantity changed; `quantity` is the clamped result.
    QuantityUpdated { product_id: ProductId, quantity: u32 },

    /// A line was removed.
    ItemRemoved { product_id: ProductId },

    /// Every line was removed.
    Cleared,

    /// A checkout took its snapshot and locked the cart.
    CheckoutLocked,

    /// The checkout lock was released.
    CheckoutReleased,
}

impl CartEvent {
    /// Returns the event name as a string.
    pub fn event_type(&self) -> &'static str {
        match self {
            CartEvent::ItemAdded { .. } => "ItemAdded",
            CartEvent::QuantityUpdated { .. } => "QuantityUpdated",
            CartEvent::ItemRemoved { .. } => "ItemRemoved",
            CartEvent::Cleared => "Cleared",
            CartEvent::CheckoutLocked => "CheckoutLocked",
            CartEvent::CheckoutReleased => "CheckoutReleased",
        }
    }
}
