//! In-memory [`ShopApi`] implementation for testing.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::{AddressId, BillId, ClientId, OrderDetailId, OrderId};

use crate::client::ShopApi;
use crate::error::{ApiError, Result};
use crate::types::{
    Address, Bill, NewAddress, NewBill, NewOrder, NewOrderDetail, Order, OrderDetail,
};

#[derive(Debug, Default)]
struct InMemoryShopState {
    addresses: Vec<Address>,
    bills: Vec<Bill>,
    orders: Vec<Order>,
    order_details: Vec<OrderDetail>,
    next_id: i64,
    fail_on_create_address: bool,
    fail_on_create_bill: bool,
    fail_on_create_order: bool,
    fail_on_create_order_detail: bool,
    fail_on_order_detail_call: Option<usize>,
    create_order_detail_calls: usize,
}

/// In-memory shop backend for testing.
///
/// Hands out `id_key` values from one shared sequence, like the real
/// backend does. The `set_fail_on_*` switches make the corresponding
/// create call answer with a 500 so failure paths can be driven
/// deterministically.
#[derive(Debug, Clone, Default)]
pub struct InMemoryShopApi {
    state: Arc<RwLock<InMemoryShopState>>,
}

impl InMemoryShopApi {
    /// Creates a new in-memory shop backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures address creation to fail.
    pub fn set_fail_on_create_address(&self, fail: bool) {
        self.state.write().unwrap().fail_on_create_address = fail;
    }

    /// Configures bill creation to fail.
    pub fn set_fail_on_create_bill(&self, fail: bool) {
        self.state.write().unwrap().fail_on_create_bill = fail;
    }

    /// Configures order creation to fail.
    pub fn set_fail_on_create_order(&self, fail: bool) {
        self.state.write().unwrap().fail_on_create_order = fail;
    }

    /// Configures every order-detail creation to fail.
    pub fn set_fail_on_create_order_detail(&self, fail: bool) {
        self.state.write().unwrap().fail_on_create_order_detail = fail;
    }

    /// Configures the nth order-detail create call (zero-based, counted
    /// over the backend's lifetime) to fail. Later calls succeed, which
    /// models a transient mid-batch outage.
    pub fn set_fail_on_order_detail_call(&self, call: usize) {
        self.state.write().unwrap().fail_on_order_detail_call = Some(call);
    }

    /// Returns the number of stored addresses.
    pub fn address_count(&self) -> usize {
        self.state.read().unwrap().addresses.len()
    }

    /// Returns the number of stored bills.
    pub fn bill_count(&self) -> usize {
        self.state.read().unwrap().bills.len()
    }

    /// Returns the number of stored orders.
    pub fn order_count(&self) -> usize {
        self.state.read().unwrap().orders.len()
    }

    /// Returns the number of stored order lines.
    pub fn order_detail_count(&self) -> usize {
        self.state.read().unwrap().order_details.len()
    }

    /// Returns all stored orders.
    pub fn orders(&self) -> Vec<Order> {
        self.state.read().unwrap().orders.clone()
    }

    /// Returns all stored bills.
    pub fn bills(&self) -> Vec<Bill> {
        self.state.read().unwrap().bills.clone()
    }

    /// Returns all stored order lines.
    pub fn order_details(&self) -> Vec<OrderDetail> {
        self.state.read().unwrap().order_details.clone()
    }

    /// Stores an address directly, bypassing the failure switches.
    pub fn seed_address(&self, address: NewAddress) -> Address {
        let mut state = self.state.write().unwrap();
        state.next_id += 1;
        let record = Address {
            id: AddressId::new(state.next_id),
            street: address.street,
            number: address.number,
            city: address.city,
            client_id: address.client_id,
        };
        state.addresses.push(record.clone());
        record
    }

    fn unavailable(path: &str) -> ApiError {
        ApiError::Status {
            path: path.to_string(),
            status: 500,
        }
    }
}

#[async_trait]
impl ShopApi for InMemoryShopApi {
    async fn list_addresses(&self, client_id: ClientId) -> Result<Vec<Address>> {
        let state = self.state.read().unwrap();
        Ok(state
            .addresses
            .iter()
            .filter(|a| a.client_id == client_id)
            .cloned()
            .collect())
    }

    async fn create_address(&self, address: NewAddress) -> Result<Address> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_create_address {
            return Err(Self::unavailable("/addresses/"));
        }

        state.next_id += 1;
        let record = Address {
            id: AddressId::new(state.next_id),
            street: address.street,
            number: address.number,
            city: address.city,
            client_id: address.client_id,
        };
        state.addresses.push(record.clone());
        Ok(record)
    }

    async fn delete_address(&self, id: AddressId) -> Result<()> {
        let mut state = self.state.write().unwrap();
        let before = state.addresses.len();
        state.addresses.retain(|a| a.id != id);

        if state.addresses.len() == before {
            return Err(ApiError::Status {
                path: format!("/addresses/{id}"),
                status: 404,
            });
        }
        Ok(())
    }

    async fn list_bills(&self, client_id: ClientId) -> Result<Vec<Bill>> {
        let state = self.state.read().unwrap();
        Ok(state
            .bills
            .iter()
            .filter(|b| b.client_id == client_id)
            .cloned()
            .collect())
    }

    async fn create_bill(&self, bill: NewBill) -> Result<Bill> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_create_bill {
            return Err(Self::unavailable("/bills/"));
        }

        state.next_id += 1;
        let record = Bill {
            id: BillId::new(state.next_id),
            bill_number: bill.bill_number,
            date: bill.date,
            total: bill.total,
            payment_type: bill.payment_type,
            client_id: bill.client_id,
            discount: bill.discount,
        };
        state.bills.push(record.clone());
        Ok(record)
    }

    async fn list_orders(&self, client_id: ClientId) -> Result<Vec<Order>> {
        let state = self.state.read().unwrap();
        Ok(state
            .orders
            .iter()
            .filter(|o| o.client_id == client_id)
            .cloned()
            .collect())
    }

    async fn create_order(&self, order: NewOrder) -> Result<Order> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_create_order {
            return Err(Self::unavailable("/orders/"));
        }

        state.next_id += 1;
        let record = Order {
            id: OrderId::new(state.next_id),
            date: order.date,
            total: order.total,
            status: order.status,
            delivery_method: order.delivery_method,
            client_id: order.client_id,
            address_id: Some(order.address_id),
            bill_id: order.bill_id,
        };
        state.orders.push(record.clone());
        Ok(record)
    }

    async fn list_order_details(&self, order_id: OrderId) -> Result<Vec<OrderDetail>> {
        let state = self.state.read().unwrap();
        Ok(state
            .order_details
            .iter()
            .filter(|d| d.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn create_order_detail(&self, detail: NewOrderDetail) -> Result<OrderDetail> {
        let mut state = self.state.write().unwrap();

        let call = state.create_order_detail_calls;
        state.create_order_detail_calls += 1;

        if state.fail_on_create_order_detail || state.fail_on_order_detail_call == Some(call) {
            return Err(Self::unavailable("/order_details/"));
        }

        state.next_id += 1;
        let record = OrderDetail {
            id: OrderDetailId::new(state.next_id),
            order_id: detail.order_id,
            product_id: detail.product_id,
            quantity: detail.quantity,
            price: detail.price,
        };
        state.order_details.push(record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use common::ProductId;
    use domain::Money;

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_list_addresses() {
        let api = InMemoryShopApi::new();

        let created = api
            .create_address(NewAddress {
                street: "Calle 10".to_string(),
                number: "22-30".to_string(),
                city: "Medellin".to_string(),
                client_id: ClientId::new(3),
            })
            .await
            .unwrap();
        assert_eq!(created.id, AddressId::new(1));

        let mine = api.list_addresses(ClientId::new(3)).await.unwrap();
        let theirs = api.list_addresses(ClientId::new(4)).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert!(theirs.is_empty());
    }

    #[tokio::test]
    async fn test_delete_address() {
        let api = InMemoryShopApi::new();
        let created = api.seed_address(NewAddress {
            street: "Calle 10".to_string(),
            number: "22-30".to_string(),
            city: "Medellin".to_string(),
            client_id: ClientId::new(3),
        });

        api.delete_address(created.id).await.unwrap();
        assert_eq!(api.address_count(), 0);

        let result = api.delete_address(created.id).await;
        assert!(matches!(
            result,
            Err(ApiError::Status { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_ids_come_from_one_sequence() {
        let api = InMemoryShopApi::new();

        let address = api
            .create_address(NewAddress {
                street: "Calle 10".to_string(),
                number: "22-30".to_string(),
                city: "Medellin".to_string(),
                client_id: ClientId::new(3),
            })
            .await
            .unwrap();
        let bill = api
            .create_bill(NewBill::new(
                ClientId::new(3),
                "FAC-1".to_string(),
                test_date(),
                Money::from_dollars(100),
            ))
            .await
            .unwrap();

        assert_eq!(address.id.as_i64(), 1);
        assert_eq!(bill.id.as_i64(), 2);
    }

    #[tokio::test]
    async fn test_fail_on_create_bill() {
        let api = InMemoryShopApi::new();
        api.set_fail_on_create_bill(true);

        let result = api
            .create_bill(NewBill::new(
                ClientId::new(3),
                "FAC-1".to_string(),
                test_date(),
                Money::from_dollars(100),
            ))
            .await;

        assert!(matches!(
            result,
            Err(ApiError::Status { status: 500, .. })
        ));
        assert_eq!(api.bill_count(), 0);
    }

    #[tokio::test]
    async fn test_fail_on_single_order_detail_call() {
        let api = InMemoryShopApi::new();
        api.set_fail_on_order_detail_call(1);

        let order_id = OrderId::new(99);
        let first = api
            .create_order_detail(NewOrderDetail::new(
                order_id,
                ProductId::new(1),
                1,
                Money::from_dollars(10),
            ))
            .await;
        let second = api
            .create_order_detail(NewOrderDetail::new(
                order_id,
                ProductId::new(2),
                1,
                Money::from_dollars(20),
            ))
            .await;
        let third = api
            .create_order_detail(NewOrderDetail::new(
                order_id,
                ProductId::new(3),
                1,
                Money::from_dollars(30),
            ))
            .await;

        assert!(first.is_ok());
        assert!(second.is_err());
        assert!(third.is_ok());
        assert_eq!(api.order_detail_count(), 2);
    }

    #[tokio::test]
    async fn test_list_orders_filters_by_client() {
        let api = InMemoryShopApi::new();

        let mine = NewOrder::new(
            ClientId::new(3),
            test_date(),
            Money::from_dollars(275),
            AddressId::new(7),
            BillId::new(1),
        );
        let mut theirs = mine.clone();
        theirs.client_id = ClientId::new(4);
        api.create_order(mine).await.unwrap();
        api.create_order(theirs).await.unwrap();

        let orders = api.list_orders(ClientId::new(3)).await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].client_id, ClientId::new(3));
    }

    #[tokio::test]
    async fn test_list_order_details_filters_by_order() {
        let api = InMemoryShopApi::new();
        let order_id = OrderId::new(1);
        let other_id = OrderId::new(2);

        api.create_order_detail(NewOrderDetail::new(
            order_id,
            ProductId::new(1),
            2,
            Money::from_dollars(10),
        ))
        .await
        .unwrap();
        api.create_order_detail(NewOrderDetail::new(
            other_id,
            ProductId::new(1),
            1,
            Money::from_dollars(10),
        ))
        .await
        .unwrap();

        let details = api.list_order_details(order_id).await.unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].quantity, 2);
    }
}
