//! Wire types for the shop backend.
//!
//! The backend names every primary key `id_key`; the structs here
//! rename that to `id` and wrap it in the typed ids from `common`.
//! Money travels as decimal numbers of the currency's major unit, so
//! each record keeps the raw `f64` and offers a `*_amount` accessor
//! that bridges into [`Money`].

use chrono::NaiveDate;
use common::{AddressId, BillId, ClientId, OrderDetailId, OrderId, ProductId};
use domain::{DeliveryMethod, Money, OrderStatus, PaymentType};
use serde::{Deserialize, Serialize};

/// A shipping address stored on the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(rename = "id_key")]
    pub id: AddressId,
    pub street: String,
    pub number: String,
    pub city: String,
    pub client_id: ClientId,
}

/// Payload for creating an address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAddress {
    pub street: String,
    pub number: String,
    pub city: String,
    pub client_id: ClientId,
}

/// A bill stored on the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    #[serde(rename = "id_key")]
    pub id: BillId,
    pub bill_number: String,
    pub date: NaiveDate,
    pub total: f64,
    pub payment_type: PaymentType,
    pub client_id: ClientId,
    pub discount: f64,
}

impl Bill {
    pub fn total_amount(&self) -> Money {
        Money::from_major_units(self.total)
    }
}

/// Payload for creating a bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBill {
    pub bill_number: String,
    pub date: NaiveDate,
    pub total: f64,
    pub payment_type: PaymentType,
    pub client_id: ClientId,
    pub discount: f64,
}

impl NewBill {
    /// Builds a bill payload with the defaults the storefront always
    /// sends: credit card payment and no discount.
    pub fn new(client_id: ClientId, bill_number: String, date: NaiveDate, total: Money) -> Self {
        Self {
            bill_number,
            date,
            total: total.as_major_units(),
            payment_type: PaymentType::CreditCard,
            client_id,
            discount: 0.0,
        }
    }
}

/// An order stored on the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "id_key")]
    pub id: OrderId,
    pub date: NaiveDate,
    pub total: f64,
    pub status: OrderStatus,
    pub delivery_method: DeliveryMethod,
    pub client_id: ClientId,
    // Older records may predate the address link.
    #[serde(default)]
    pub address_id: Option<AddressId>,
    pub bill_id: Option<BillId>,
}

impl Order {
    pub fn total_amount(&self) -> Money {
        Money::from_major_units(self.total)
    }
}

/// Payload for creating an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    pub date: NaiveDate,
    pub total: f64,
    pub status: OrderStatus,
    pub delivery_method: DeliveryMethod,
    pub client_id: ClientId,
    pub address_id: AddressId,
    pub bill_id: Option<BillId>,
}

impl NewOrder {
    /// Builds an order payload with the statuses a fresh checkout
    /// uses: pending, standard delivery.
    pub fn new(
        client_id: ClientId,
        date: NaiveDate,
        total: Money,
        address_id: AddressId,
        bill_id: BillId,
    ) -> Self {
        Self {
            date,
            total: total.as_major_units(),
            status: OrderStatus::Pending,
            delivery_method: DeliveryMethod::Standard,
            client_id,
            address_id,
            bill_id: Some(bill_id),
        }
    }
}

/// One line of an order stored on the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(rename = "id_key")]
    pub id: OrderDetailId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: f64,
}

impl OrderDetail {
    pub fn price_amount(&self) -> Money {
        Money::from_major_units(self.price)
    }
}

/// Payload for creating an order line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrderDetail {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: f64,
}

impl NewOrderDetail {
    pub fn new(order_id: OrderId, product_id: ProductId, quantity: u32, price: Money) -> Self {
        Self {
            order_id,
            product_id,
            quantity,
            price: price.as_major_units(),
        }
    }
}
