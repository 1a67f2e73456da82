//! End-to-end checkout demo against the in-memory backend.
//!
//! Fills a cart, fails the first checkout at order creation, then
//! retries the same attempt to show the resume path creating no
//! duplicate records.
//!
//! Run with: `cargo run -p checkout --example run_checkout`

use checkout::{
    AddressSelection, CancelToken, CheckoutAttempt, CheckoutOrchestrator, NewAddressInput,
};
use common::ClientId;
use domain::{CartStore, Money, PricingEngine, Product};
use shop_api::InMemoryShopApi;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let api = InMemoryShopApi::new();
    let store = CartStore::default();
    let orchestrator =
        CheckoutOrchestrator::new(api.clone(), store.clone(), PricingEngine::default());

    // Fill the cart like a browsing session would.
    let helmet = Product::new(1, "Trail Helmet", Money::from_dollars(120), 8);
    let pump = Product::new(2, "Floor Pump", Money::from_dollars(45), 20);
    store.add_item(&helmet, 1).expect("add helmet");
    store.add_item(&pump, 2).expect("add pump");
    tracing::info!(items = store.len(), subtotal = %store.subtotal(), "cart ready");

    let selection = AddressSelection::New(NewAddressInput {
        street: "Calle 10".to_string(),
        number: "22-30".to_string(),
        city: "Medellin".to_string(),
    });
    let mut attempt =
        CheckoutAttempt::new(Some(ClientId::new(3)), selection).expect("client signed in");
    let cancel = CancelToken::new();

    // First run fails at order creation, leaving a recorded bill.
    api.set_fail_on_create_order(true);
    if let Err(e) = orchestrator.run(&mut attempt, &cancel).await {
        tracing::warn!(error = %e, "first run failed, retrying the same attempt");
    }

    // The retry resumes from the recorded bill instead of minting another.
    api.set_fail_on_create_order(false);
    let receipt = orchestrator
        .run(&mut attempt, &cancel)
        .await
        .expect("retry completes");

    tracing::info!(
        order_id = %receipt.order_id,
        bill_id = %receipt.bill_id,
        total = %receipt.totals.total,
        bills = api.bill_count(),
        orders = api.order_count(),
        details = api.order_detail_count(),
        "checkout complete with no duplicate records"
    );
}
