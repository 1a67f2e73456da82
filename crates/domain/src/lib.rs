//! Domain layer for the storefront core.
//!
//! This crate provides the client-side state the shop UI works against:
//! - Cart aggregate with centralized quantity clamping and price snapshots
//! - CartStore, a shared handle with change notifications and a checkout lock
//! - Cart persistence behind the CartStorage trait
//! - PricingEngine, the single source of truth for shipping and totals
//! - Integer and string codes the shop backend uses for orders and bills

pub mod cart;
pub mod codes;
pub mod money;
pub mod pricing;
pub mod product;

pub use cart::{
    Cart, CartError, CartEvent, CartItem, CartStorage, CartStore, FileCartStorage,
    MemoryCartStorage, StorageError,
};
pub use codes::{DeliveryMethod, OrderStatus, PaymentType};
pub use money::Money;
pub use pricing::{CartTotals, ConfigError, PricingConfig, PricingEngine};
pub use product::Product;
