//! Catalog product snapshot.

use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// A product as the catalog presents it to the storefront.
///
/// The cart never looks products up itself; callers hand it this
/// snapshot and the cart captures the price and stock it needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Backend identifier of the product.
    pub id: ProductId,

    /// Display name.
    pub name: String,

    /// Current listed unit price.
    pub price: Money,

    /// Units available at the time the catalog was read.
    pub stock: u32,
}

impl Product {
    /// Creates a new product snapshot.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Money, stock: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            stock,
        }
    }
}
