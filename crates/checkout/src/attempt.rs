//! Checkout attempt record.
//!
//! One [`CheckoutAttempt`] is created per user-initiated checkout and
//! carries an idempotency key plus everything the saga has committed
//! so far. Re-running a failed attempt resumes from that record
//! instead of repeating remote writes.

use common::{AddressId, BillId, ClientId, OrderId};
use domain::{Cart, CartTotals};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CheckoutError, Result};
use crate::resolver::AddressSelection;
use crate::state::CheckoutState;

/// Summary of a completed checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutReceipt {
    pub key: Uuid,
    pub order_id: OrderId,
    pub bill_id: BillId,
    pub address_id: AddressId,
    pub totals: CartTotals,
    pub detail_count: usize,
}

/// The idempotency record of one checkout attempt.
///
/// The attempt is created once, before any remote call, and mutated
/// only by the orchestrator as steps commit. The bill number is
/// derived from the key, so one attempt can never mint two bills
/// under different numbers no matter how often it is retried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutAttempt {
    key: Uuid,
    client_id: ClientId,
    selection: AddressSelection,
    state: CheckoutState,
    snapshot: Option<Cart>,
    totals: Option<CartTotals>,
    address_id: Option<AddressId>,
    bill_id: Option<BillId>,
    order_id: Option<OrderId>,
    details_created: usize,
    failure: Option<String>,
    receipt: Option<CheckoutReceipt>,
}

impl CheckoutAttempt {
    /// Creates a fresh attempt for an authenticated client.
    ///
    /// Fails with [`CheckoutError::AuthRequired`] when no client id is
    /// available, before anything else happens.
    pub fn new(client: Option<ClientId>, selection: AddressSelection) -> Result<Self> {
        let client_id = client.ok_or(CheckoutError::AuthRequired)?;

        Ok(Self {
            key: Uuid::new_v4(),
            client_id,
            selection,
            state: CheckoutState::Idle,
            snapshot: None,
            totals: None,
            address_id: None,
            bill_id: None,
            order_id: None,
            details_created: 0,
            failure: None,
            receipt: None,
        })
    }

    /// The idempotency key, fixed at creation.
    pub fn key(&self) -> Uuid {
        self.key
    }

    /// The authenticated client this attempt belongs to.
    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    /// The address selection the attempt was created with.
    pub fn selection(&self) -> &AddressSelection {
        &self.selection
    }

    /// Current state of the attempt.
    pub fn state(&self) -> CheckoutState {
        self.state
    }

    /// The cart snapshot taken when validation first passed.
    pub fn snapshot(&self) -> Option<&Cart> {
        self.snapshot.as_ref()
    }

    /// The totals computed from the snapshot, fixed for the attempt.
    pub fn totals(&self) -> Option<CartTotals> {
        self.totals
    }

    /// The resolved or created address id.
    pub fn address_id(&self) -> Option<AddressId> {
        self.address_id
    }

    /// The created bill id.
    pub fn bill_id(&self) -> Option<BillId> {
        self.bill_id
    }

    /// The created order id.
    pub fn order_id(&self) -> Option<OrderId> {
        self.order_id
    }

    /// Number of order lines committed so far.
    pub fn details_created(&self) -> usize {
        self.details_created
    }

    /// The failure message from the last run, if it failed.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// The receipt, once the attempt completed.
    pub fn receipt(&self) -> Option<&CheckoutReceipt> {
        self.receipt.as_ref()
    }

    /// The bill number this attempt submits, stable across retries.
    pub fn bill_number(&self) -> String {
        format!("FAC-{}", self.key)
    }

    pub(crate) fn set_state(&mut self, state: CheckoutState) {
        self.state = state;
    }

    pub(crate) fn record_snapshot(&mut self, snapshot: Cart, totals: CartTotals) {
        self.snapshot = Some(snapshot);
        self.totals = Some(totals);
    }

    pub(crate) fn record_address(&mut self, id: AddressId) {
        self.address_id = Some(id);
    }

    pub(crate) fn record_bill(&mut self, id: BillId) {
        self.bill_id = Some(id);
    }

    pub(crate) fn record_order(&mut self, id: OrderId) {
        self.order_id = Some(id);
    }

    pub(crate) fn record_detail(&mut self) {
        self.details_created += 1;
    }

    pub(crate) fn record_failure(&mut self, error: &CheckoutError) {
        self.state = CheckoutState::Failed;
        self.failure = Some(error.to_string());
    }

    pub(crate) fn record_completed(&mut self, receipt: CheckoutReceipt) {
        self.state = CheckoutState::Completed;
        self.failure = None;
        self.receipt = Some(receipt);
    }
}
