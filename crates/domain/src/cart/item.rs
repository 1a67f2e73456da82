//! A single cart line.

use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::product::Product;

/// One line in the cart.
///
/// `unit_price` and `stock_at_add` are snapshots captured when the
/// product was added. The price never changes for the lifetime of the
/// line, even if the catalog price moves; the stock ceiling is
/// refreshed whenever the same product is added again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// The product this line refers to.
    pub product_id: ProductId,

    /// Display name captured at add time.
    pub name: String,

    /// Price per unit locked in at add time.
    pub unit_price: Money,

    /// Units of this product in the cart.
    pub quantity: u32,

    /// Stock known at the most recent add, the ceiling for `quantity`.
    pub stock_at_add: u32,
}

impl CartItem {
    /// Creates a line from a catalog snapshot.
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            unit_price: product.price,
            quantity,
            stock_at_add: product.stock,
        }
    }

    /// Returns the total for this line (unit price times quantity).
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}
