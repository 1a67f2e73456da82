//! Cart aggregate.

use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::product::Product;

use super::{CartError, CartItem};

/// The shopping cart: an insertion-ordered list of lines, unique by
/// product.
///
/// All quantity rules live here. Callers pass requested quantities and
/// the cart clamps them to `[1, stock]`; nothing outside this type ever
/// re-validates a quantity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a product to the cart.
    ///
    /// If a line for the product already exists, the requested quantity
    /// is added onto it and the stock ceiling is refreshed from the
    /// snapshot; the unit price stays locked at what it was when the
    /// line was first created. Returns the resulting line quantity.
    pub fn add_item(&mut self, product: &Product, quantity: u32) -> Result<u32, CartError> {
        if product.stock == 0 {
            return Err(CartError::OutOfStock {
                product_id: product.id,
            });
        }

        if let Some(existing) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            let requested = existing.quantity.saturating_add(quantity);
            existing.quantity = requested.clamp(1, product.stock);
            existing.stock_at_add = product.stock;
            Ok(existing.quantity)
        } else {
            let item = CartItem::from_product(product, quantity.clamp(1, product.stock));
            let resulting = item.quantity;
            self.items.push(item);
            Ok(resulting)
        }
    }

    /// Sets the quantity of an existing line, clamped to
    /// `[1, stock_at_add]`.
    ///
    /// A requested zero floors to one; removing a line is a separate,
    /// explicit action. Returns the resulting line quantity.
    pub fn update_quantity(
        &mut self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<u32, CartError> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.product_id == product_id)
            .ok_or(CartError::ItemNotFound { product_id })?;

        item.quantity = quantity.clamp(1, item.stock_at_add);
        Ok(item.quantity)
    }

    /// Removes a line from the cart.
    pub fn remove_item(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        if self.items.len() == before {
            return Err(CartError::ItemNotFound { product_id });
        }
        Ok(())
    }

    /// Removes every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns the sum of unit price times quantity over all lines.
    ///
    /// Derived purely from the lines themselves; no catalog lookups.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Returns the lines in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Returns the line for a product, if present.
    pub fn get_item(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    /// Returns the number of lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the total unit count across all lines.
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Returns true when every line holds the invariants the mutation
    /// methods maintain: quantity within `[1, stock_at_add]` and at most
    /// one line per product.
    ///
    /// Carts built through `add_item` and `update_quantity` always pass;
    /// a cart deserialized from persisted state may not.
    pub fn is_well_formed(&self) -> bool {
        self.items.iter().enumerate().all(|(i, item)| {
            (1..=item.stock_at_add).contains(&item.quantity)
                && self.items[..i].iter().all(|prev| prev.product_id != item.product_id)
        })
    }
}
