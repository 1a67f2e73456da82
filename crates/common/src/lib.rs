//! Shared types for the storefront core.
//!
//! Every record the shop backend owns is keyed by an integer `id_key`.
//! This crate provides one newtype per entity so address, bill, order
//! and product identifiers cannot be mixed up at compile time.

pub mod types;

pub use types::{AddressId, BillId, ClientId, OrderDetailId, OrderId, ProductId};
