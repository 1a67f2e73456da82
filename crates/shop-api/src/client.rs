//! The backend contract consumed by the checkout core.

use async_trait::async_trait;
use common::{AddressId, ClientId, OrderId};

use crate::error::Result;
use crate::types::{
    Address, Bill, NewAddress, NewBill, NewOrder, NewOrderDetail, Order, OrderDetail,
};

/// Operations the shop backend exposes.
///
/// List methods return records scoped to one client (or one order for
/// details); the HTTP implementation filters client-side because the
/// backend has no query parameters.
#[async_trait]
pub trait ShopApi: Send + Sync {
    /// Returns all addresses belonging to a client
    async fn list_addresses(&self, client_id: ClientId) -> Result<Vec<Address>>;

    /// Creates an address and returns it with its assigned id
    async fn create_address(&self, address: NewAddress) -> Result<Address>;

    /// Deletes an address by id
    async fn delete_address(&self, id: AddressId) -> Result<()>;

    /// Returns all bills belonging to a client
    async fn list_bills(&self, client_id: ClientId) -> Result<Vec<Bill>>;

    /// Creates a bill and returns it with its assigned id
    async fn create_bill(&self, bill: NewBill) -> Result<Bill>;

    /// Returns all orders belonging to a client
    async fn list_orders(&self, client_id: ClientId) -> Result<Vec<Order>>;

    /// Creates an order and returns it with its assigned id
    async fn create_order(&self, order: NewOrder) -> Result<Order>;

    /// Returns all lines belonging to an order
    async fn list_order_details(&self, order_id: OrderId) -> Result<Vec<OrderDetail>>;

    /// Creates one order line and returns it with its assigned id
    async fn create_order_detail(&self, detail: NewOrderDetail) -> Result<OrderDetail>;
}
