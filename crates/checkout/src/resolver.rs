//! Address resolution for checkout.

use common::{AddressId, ClientId};
use serde::{Deserialize, Serialize};
use shop_api::{Address, NewAddress, ShopApi};

use crate::error::{CheckoutError, Result};
use crate::state::CheckoutState;

/// The address choice made on the checkout screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AddressSelection {
    /// Ship to an address the client already has.
    Existing(AddressId),
    /// Create a new address during checkout.
    New(NewAddressInput),
}

/// Fields entered for a new address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAddressInput {
    pub street: String,
    pub number: String,
    pub city: String,
}

/// Resolves a checkout address: reuses an existing one unchanged or
/// validates and creates a new one on demand.
///
/// Every failure here happens before any financial record exists, so
/// the orchestrator treats it as a hard stop with a clean retry.
#[derive(Debug, Clone)]
pub struct AddressResolver<A> {
    api: A,
}

impl<A: ShopApi> AddressResolver<A> {
    /// Creates a resolver over the given backend.
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// Returns the client's saved addresses, for the selection UI.
    pub async fn list_addresses(&self, client_id: ClientId) -> Result<Vec<Address>> {
        self.api
            .list_addresses(client_id)
            .await
            .map_err(Self::remote)
    }

    /// Resolves the selection to an address id.
    ///
    /// `Existing` passes the id through with zero remote calls. `New`
    /// validates that street and city are non-empty, then creates the
    /// address and returns its assigned id.
    pub async fn resolve(
        &self,
        client_id: ClientId,
        selection: &AddressSelection,
    ) -> Result<AddressId> {
        match selection {
            AddressSelection::Existing(id) => Ok(*id),
            AddressSelection::New(input) => {
                if input.street.trim().is_empty() {
                    return Err(CheckoutError::AddressField { field: "street" });
                }
                if input.city.trim().is_empty() {
                    return Err(CheckoutError::AddressField { field: "city" });
                }

                let created = self
                    .api
                    .create_address(NewAddress {
                        street: input.street.clone(),
                        number: input.number.clone(),
                        city: input.city.clone(),
                        client_id,
                    })
                    .await
                    .map_err(Self::remote)?;

                tracing::info!(address_id = %created.id, "created checkout address");
                Ok(created.id)
            }
        }
    }

    /// Deletes a saved address, for the address-book UI.
    pub async fn delete_address(&self, id: AddressId) -> Result<()> {
        self.api.delete_address(id).await.map_err(Self::remote)
    }

    fn remote(source: shop_api::ApiError) -> CheckoutError {
        CheckoutError::StepFailed {
            stage: CheckoutState::ResolvingAddress,
            source,
        }
    }
}
