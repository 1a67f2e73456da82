//! Checkout saga for the storefront core.
//!
//! Turns a priced cart and a shipping address into persisted Bill,
//! Order, and OrderDetail records against a backend that offers no
//! multi-resource transactions. The saga runs these steps in strict
//! sequence:
//! 1. Validate and lock the cart
//! 2. Resolve or create the shipping address
//! 3. Create the bill (final total, shipping included)
//! 4. Create the order referencing bill and address
//! 5. Create one order line per cart item
//!
//! There are no compensating deletes: each attempt carries an
//! idempotency key and records committed progress, so re-running a
//! failed attempt resumes where it stopped instead of duplicating
//! financial records.

pub mod attempt;
pub mod cancel;
pub mod error;
pub mod orchestrator;
pub mod resolver;
pub mod state;

pub use attempt::{CheckoutAttempt, CheckoutReceipt};
pub use cancel::CancelToken;
pub use error::{CheckoutError, Result};
pub use orchestrator::CheckoutOrchestrator;
pub use resolver::{AddressResolver, AddressSelection, NewAddressInput};
pub use state::CheckoutState;
