//! Cart aggregate and related types.

mod aggregate;
mod events;
mod item;
mod storage;
mod store;

pub use aggregate::Cart;
pub use events::CartEvent;
pub use item::CartItem;
pub use storage::{CartStorage, FileCartStorage, MemoryCartStorage, StorageError};
pub use store::CartStore;

use common::ProductId;
use thiserror::Error;

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The cart has no items.
    #[error("Cart is empty")]
    Empty,

    /// A checkout is in flight and the cart is locked against mutation.
    #[error("Checkout in progress, cart is locked")]
    CheckoutInProgress,

    /// The referenced product has no line in the cart.
    #[error("Item not found in cart: product {product_id}")]
    ItemNotFound { product_id: ProductId },

    /// The product has no stock, so no sellable line can be created.
    #[error("Product {product_id} is out of stock")]
    OutOfStock { product_id: ProductId },
}
