//! REST client for the shop backend.
//!
//! The backend owns addresses, bills, orders and order details, keyed
//! by integer `id_key` values. This crate provides:
//! - The wire types exactly as the backend speaks them
//! - The [`ShopApi`] trait, one method per endpoint the core consumes
//! - [`HttpShopApi`], the reqwest-backed implementation
//! - [`InMemoryShopApi`], a test double with failure switches
//!
//! Collection endpoints offer no query parameters, so every list call
//! fetches everything and filters client-side.

pub mod client;
pub mod error;
pub mod http;
pub mod memory;
pub mod types;

pub use client::ShopApi;
pub use error::{ApiError, Result};
pub use http::{ApiConfig, ConfigError, HttpShopApi};
pub use memory::InMemoryShopApi;
pub use types::{
    Address, Bill, NewAddress, NewBill, NewOrder, NewOrderDetail, Order, OrderDetail,
};
