//! Checkout orchestrator driving the saga.

use chrono::{NaiveDate, Utc};
use common::{AddressId, BillId, OrderId};
use domain::{Cart, CartError, CartStore, CartTotals, PricingEngine};
use shop_api::{ApiError, NewBill, NewOrder, NewOrderDetail, ShopApi};

use crate::attempt::{CheckoutAttempt, CheckoutReceipt};
use crate::cancel::CancelToken;
use crate::error::{CheckoutError, Result};
use crate::resolver::AddressResolver;
use crate::state::CheckoutState;

/// Orchestrates checkout: validate cart → resolve address → create
/// bill → create order → create order lines. Remote calls are awaited
/// strictly in sequence, so a failure maps to exactly one step.
///
/// There are no compensating deletes. Committed progress is recorded
/// on the [`CheckoutAttempt`], and re-running a failed attempt skips
/// it, so a retry cannot duplicate financial records.
pub struct CheckoutOrchestrator<A>
where
    A: ShopApi,
{
    api: A,
    resolver: AddressResolver<A>,
    store: CartStore,
    pricing: PricingEngine,
}

impl<A> CheckoutOrchestrator<A>
where
    A: ShopApi + Clone,
{
    /// Creates a new orchestrator over a backend, cart store, and
    /// pricing engine.
    ///
    /// The pricing engine here must be the one the cart-summary
    /// display uses, so the number shown is the number billed.
    pub fn new(api: A, store: CartStore, pricing: PricingEngine) -> Self {
        let resolver = AddressResolver::new(api.clone());
        Self {
            api,
            resolver,
            store,
            pricing,
        }
    }

    /// The address resolver, for the checkout screen's address book.
    pub fn resolver(&self) -> &AddressResolver<A> {
        &self.resolver
    }

    /// Runs the attempt to completion or to its first failure.
    ///
    /// A failed attempt can be passed back in to resume: recorded
    /// progress (address, bill, order, committed lines) is reused and
    /// only missing records are created. Resuming is refused with
    /// [`CheckoutError::CartChanged`] if the cart was edited since the
    /// attempt's snapshot. Running a completed attempt returns its
    /// receipt again without touching the backend.
    #[tracing::instrument(
        skip(self, attempt, cancel),
        fields(key = %attempt.key(), client_id = %attempt.client_id())
    )]
    pub async fn run(
        &self,
        attempt: &mut CheckoutAttempt,
        cancel: &CancelToken,
    ) -> Result<CheckoutReceipt> {
        metrics::counter!("checkout_attempts_total").increment(1);
        let start = std::time::Instant::now();

        let result = self.drive(attempt, cancel).await;
        let duration = start.elapsed().as_secs_f64();
        metrics::histogram!("checkout_duration_seconds").record(duration);

        match result {
            Ok(receipt) => {
                metrics::counter!("checkout_completed").increment(1);
                tracing::info!(
                    order_id = %receipt.order_id,
                    bill_id = %receipt.bill_id,
                    duration,
                    "checkout completed"
                );
                Ok(receipt)
            }
            Err(e) => {
                let stage = attempt.state();
                attempt.record_failure(&e);
                metrics::counter!("checkout_failed").increment(1);
                tracing::warn!(%stage, error = %e, "checkout failed");
                Err(e)
            }
        }
    }

    async fn drive(
        &self,
        attempt: &mut CheckoutAttempt,
        cancel: &CancelToken,
    ) -> Result<CheckoutReceipt> {
        if let Some(receipt) = attempt.receipt() {
            return Ok(receipt.clone());
        }

        let resuming = attempt.state().is_failed();
        if resuming {
            tracing::info!(
                details_created = attempt.details_created(),
                "resuming failed checkout attempt"
            );
        }

        check_cancelled(attempt, cancel)?;
        let (snapshot, totals) = self.validate_cart(attempt)?;

        let result = self
            .drive_remote(attempt, cancel, &snapshot, totals, resuming)
            .await;
        if result.is_err() {
            // The cart stays intact and editable for a retry.
            self.store.release_checkout();
        }
        result
    }

    /// Locks the cart and fixes the snapshot and totals the rest of
    /// the saga works from. No remote calls.
    fn validate_cart(&self, attempt: &mut CheckoutAttempt) -> Result<(Cart, CartTotals)> {
        attempt.set_state(CheckoutState::ValidatingCart);

        let live = self.store.begin_checkout().map_err(|e| match e {
            CartError::Empty => CheckoutError::EmptyCart,
            // begin_checkout only fails with Empty or CheckoutInProgress.
            _ => CheckoutError::CheckoutInProgress,
        })?;

        if let Some(snapshot) = attempt.snapshot() {
            if live != *snapshot {
                self.store.release_checkout();
                return Err(CheckoutError::CartChanged);
            }
        }

        let totals = match attempt.totals() {
            Some(totals) => totals,
            None => {
                let totals = self.pricing.totals_for(&live);
                attempt.record_snapshot(live.clone(), totals);
                totals
            }
        };

        Ok((live, totals))
    }

    async fn drive_remote(
        &self,
        attempt: &mut CheckoutAttempt,
        cancel: &CancelToken,
        snapshot: &Cart,
        totals: CartTotals,
        resuming: bool,
    ) -> Result<CheckoutReceipt> {
        check_cancelled(attempt, cancel)?;
        let address_id = self.resolve_address(attempt).await?;

        // Last boundary where aborting is clean: no financial record yet.
        check_cancelled(attempt, cancel)?;
        let bill_id = self.create_bill(attempt, totals, resuming).await?;
        let order_id = self
            .create_order(attempt, totals, address_id, bill_id, resuming)
            .await?;
        self.create_order_details(attempt, snapshot, order_id)
            .await?;

        Ok(self.complete(attempt, address_id, bill_id, order_id, totals))
    }

    async fn resolve_address(&self, attempt: &mut CheckoutAttempt) -> Result<AddressId> {
        if let Some(id) = attempt.address_id() {
            return Ok(id);
        }
        attempt.set_state(CheckoutState::ResolvingAddress);
        tracing::info!(step = %CheckoutState::ResolvingAddress, "checkout step started");

        let id = self
            .resolver
            .resolve(attempt.client_id(), attempt.selection())
            .await?;
        attempt.record_address(id);
        Ok(id)
    }

    /// Submits the bill with the final total, shipping included.
    async fn create_bill(
        &self,
        attempt: &mut CheckoutAttempt,
        totals: CartTotals,
        resuming: bool,
    ) -> Result<BillId> {
        if let Some(id) = attempt.bill_id() {
            return Ok(id);
        }
        attempt.set_state(CheckoutState::CreatingBill);
        tracing::info!(step = %CheckoutState::CreatingBill, "checkout step started");

        let bill_number = attempt.bill_number();

        if resuming {
            // A lost response can leave a bill this attempt never saw.
            let bills = self
                .api
                .list_bills(attempt.client_id())
                .await
                .map_err(|e| step_error(attempt, e))?;
            if let Some(bill) = bills.into_iter().find(|b| b.bill_number == bill_number) {
                tracing::info!(bill_id = %bill.id, %bill_number, "reusing bill from prior run");
                attempt.record_bill(bill.id);
                return Ok(bill.id);
            }
        }

        let bill = self
            .api
            .create_bill(NewBill::new(
                attempt.client_id(),
                bill_number,
                today(),
                totals.total,
            ))
            .await
            .map_err(|e| step_error(attempt, e))?;
        attempt.record_bill(bill.id);
        Ok(bill.id)
    }

    async fn create_order(
        &self,
        attempt: &mut CheckoutAttempt,
        totals: CartTotals,
        address_id: AddressId,
        bill_id: BillId,
        resuming: bool,
    ) -> Result<OrderId> {
        if let Some(id) = attempt.order_id() {
            return Ok(id);
        }
        attempt.set_state(CheckoutState::CreatingOrder);
        tracing::info!(step = %CheckoutState::CreatingOrder, "checkout step started");

        if resuming {
            // A lost response can leave an order this attempt never saw.
            let orders = self
                .api
                .list_orders(attempt.client_id())
                .await
                .map_err(|e| step_error(attempt, e))?;
            if let Some(order) = orders.into_iter().find(|o| o.bill_id == Some(bill_id)) {
                tracing::info!(order_id = %order.id, %bill_id, "reusing order from prior run");
                attempt.record_order(order.id);
                return Ok(order.id);
            }
        }

        let order = self
            .api
            .create_order(NewOrder::new(
                attempt.client_id(),
                today(),
                totals.total,
                address_id,
                bill_id,
            ))
            .await
            .map_err(|e| step_error(attempt, e))?;
        attempt.record_order(order.id);
        Ok(order.id)
    }

    /// Submits one order line per cart item, in cart order, with the
    /// unit price locked at add-time.
    async fn create_order_details(
        &self,
        attempt: &mut CheckoutAttempt,
        snapshot: &Cart,
        order_id: OrderId,
    ) -> Result<()> {
        attempt.set_state(CheckoutState::CreatingOrderDetails);
        tracing::info!(step = %CheckoutState::CreatingOrderDetails, "checkout step started");

        // Sequential on purpose: a failure names one line, and
        // `details_created` marks the resume point exactly.
        let items = snapshot.items();
        for (line, item) in items.iter().enumerate().skip(attempt.details_created()) {
            let detail =
                NewOrderDetail::new(order_id, item.product_id, item.quantity, item.unit_price);
            self.api.create_order_detail(detail).await.map_err(|e| {
                tracing::warn!(line, product_id = %item.product_id, "order line creation failed");
                step_error(attempt, e)
            })?;
            attempt.record_detail();
        }
        Ok(())
    }

    fn complete(
        &self,
        attempt: &mut CheckoutAttempt,
        address_id: AddressId,
        bill_id: BillId,
        order_id: OrderId,
        totals: CartTotals,
    ) -> CheckoutReceipt {
        self.store.complete_checkout();

        let receipt = CheckoutReceipt {
            key: attempt.key(),
            order_id,
            bill_id,
            address_id,
            totals,
            detail_count: attempt.details_created(),
        };
        attempt.record_completed(receipt.clone());
        receipt
    }
}

/// Cancellation is honored only while no financial record exists.
fn check_cancelled(attempt: &CheckoutAttempt, cancel: &CancelToken) -> Result<()> {
    if cancel.is_cancelled() && attempt.bill_id().is_none() {
        return Err(CheckoutError::Cancelled);
    }
    Ok(())
}

/// Wraps a remote failure with what the attempt has committed so far,
/// so an orphaned bill or short order is surfaced, never silent.
fn step_error(attempt: &CheckoutAttempt, source: ApiError) -> CheckoutError {
    match attempt.bill_id() {
        Some(bill_id) => {
            tracing::warn!(
                %bill_id,
                order_id = ?attempt.order_id(),
                details_created = attempt.details_created(),
                "remote records committed before this failure, resume the attempt to finish"
            );
            CheckoutError::PartialFailure {
                stage: attempt.state(),
                bill_id,
                order_id: attempt.order_id(),
                details_created: attempt.details_created(),
                source,
            }
        }
        None => CheckoutError::StepFailed {
            stage: attempt.state(),
            source,
        },
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
