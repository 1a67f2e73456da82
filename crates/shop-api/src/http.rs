//! HTTP implementation of [`ShopApi`] backed by reqwest.
//!
//! Collection endpoints end in a trailing slash (`/addresses/`,
//! `/bills/`, `/orders/`, `/order_details/`); the single-address
//! endpoint does not (`/addresses/{id}`). The backend is picky about
//! this, so the paths below spell it out per call.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::{AddressId, ClientId, OrderId};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::client::ShopApi;
use crate::error::{ApiError, Result};
use crate::types::{
    Address, Bill, NewAddress, NewBill, NewOrder, NewOrderDetail, Order, OrderDetail,
};

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration errors that can occur during loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid environment variable {name}: {reason}")]
    InvalidEnvVar { name: String, reason: String },
}

/// Connection settings for the shop backend.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL without a trailing slash, e.g. `http://localhost:8000`
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Loads settings from the environment.
    ///
    /// `SHOP_API_BASE_URL` is required. `SHOP_API_TIMEOUT_SECS` is
    /// optional and defaults to 10 seconds.
    pub fn from_env() -> std::result::Result<Self, ConfigError> {
        let base_url = std::env::var("SHOP_API_BASE_URL")
            .map_err(|_| ConfigError::MissingEnvVar("SHOP_API_BASE_URL".to_string()))?;

        let timeout_secs = match std::env::var("SHOP_API_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
                name: "SHOP_API_TIMEOUT_SECS".to_string(),
                reason: e.to_string(),
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// [`ShopApi`] implementation that talks to the real backend.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct HttpShopApi {
    inner: Arc<Inner>,
}

struct Inner {
    client: reqwest::Client,
    base_url: String,
}

impl HttpShopApi {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(Inner {
                client,
                base_url: config.base_url.trim_end_matches('/').to_string(),
            }),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.inner.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.inner.client.get(self.url(path)).send().await?;
        Self::read_json(path, response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .inner
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await?;
        Self::read_json(path, response).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let response = self.inner.client.delete(self.url(path)).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                path,
                status = status.as_u16(),
                body = %body.chars().take(200).collect::<String>(),
                "shop API returned non-success status"
            );
            return Err(ApiError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    /// Reads the body as text first so failures can be logged with
    /// the payload.
    async fn read_json<T: DeserializeOwned>(path: &str, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                path,
                status = status.as_u16(),
                body = %body.chars().take(200).collect::<String>(),
                "shop API returned non-success status"
            );
            return Err(ApiError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl ShopApi for HttpShopApi {
    async fn list_addresses(&self, client_id: ClientId) -> Result<Vec<Address>> {
        let addresses: Vec<Address> = self.get_json("/addresses/").await?;
        Ok(addresses
            .into_iter()
            .filter(|a| a.client_id == client_id)
            .collect())
    }

    async fn create_address(&self, address: NewAddress) -> Result<Address> {
        self.post_json("/addresses/", &address).await
    }

    async fn delete_address(&self, id: AddressId) -> Result<()> {
        self.delete(&format!("/addresses/{id}")).await
    }

    async fn list_bills(&self, client_id: ClientId) -> Result<Vec<Bill>> {
        let bills: Vec<Bill> = self.get_json("/bills/").await?;
        Ok(bills
            .into_iter()
            .filter(|b| b.client_id == client_id)
            .collect())
    }

    async fn create_bill(&self, bill: NewBill) -> Result<Bill> {
        self.post_json("/bills/", &bill).await
    }

    async fn list_orders(&self, client_id: ClientId) -> Result<Vec<Order>> {
        let orders: Vec<Order> = self.get_json("/orders/").await?;
        Ok(orders
            .into_iter()
            .filter(|o| o.client_id == client_id)
            .collect())
    }

    async fn create_order(&self, order: NewOrder) -> Result<Order> {
        self.post_json("/orders/", &order).await
    }

    async fn list_order_details(&self, order_id: OrderId) -> Result<Vec<OrderDetail>> {
        let details: Vec<OrderDetail> = self.get_json("/order_details/").await?;
        Ok(details
            .into_iter()
            .filter(|d| d.order_id == order_id)
            .collect())
    }

    async fn create_order_detail(&self, detail: NewOrderDetail) -> Result<OrderDetail> {
        self.post_json("/order_details/", &detail).await
    }
}
