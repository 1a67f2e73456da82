//! Shared cart handle with change notifications and a checkout lock.

use std::sync::{Arc, RwLock};

use common::ProductId;
use tokio::sync::broadcast;

use crate::money::Money;
use crate::product::Product;

use super::{Cart, CartError, CartEvent, CartItem, CartStorage, MemoryCartStorage};

/// Buffered cart events per subscriber before a slow one lags.
const EVENT_CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Default)]
struct CartStoreState {
    cart: Cart,
    checkout_locked: bool,
}

/// Shared handle to the session's cart.
///
/// Construct one at the application root and clone it into whatever
/// needs cart access; clones share state. Every successful mutation is
/// broadcast to subscribers and persisted best-effort through the
/// configured storage, with the in-memory cart staying authoritative
/// when persistence fails.
///
/// While a checkout is in flight the cart is locked: mutations fail
/// with [`CartError::CheckoutInProgress`] until the checkout either
/// completes (cart cleared) or releases the lock (cart untouched).
#[derive(Clone)]
pub struct CartStore {
    state: Arc<RwLock<CartStoreState>>,
    storage: Arc<dyn CartStorage>,
    events: broadcast::Sender<CartEvent>,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new(Arc::new(MemoryCartStorage::new()))
    }
}

impl CartStore {
    /// Creates a store with an empty cart.
    pub fn new(storage: Arc<dyn CartStorage>) -> Self {
        Self::with_cart(Cart::new(), storage)
    }

    /// Creates a store restoring whatever cart the storage holds.
    ///
    /// A persisted cart that cannot be read, or that violates the cart's
    /// line invariants, degrades to an empty one; session start never
    /// fails on storage problems.
    pub fn hydrate(storage: Arc<dyn CartStorage>) -> Self {
        let cart = match storage.load() {
            Ok(Some(cart)) if cart.is_well_formed() => cart,
            Ok(Some(_)) => {
                tracing::warn!("persisted cart violates line invariants, starting empty");
                Cart::new()
            }
            Ok(None) => Cart::new(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to restore persisted cart, starting empty");
                Cart::new()
            }
        };
        Self::with_cart(cart, storage)
    }

    fn with_cart(cart: Cart, storage: Arc<dyn CartStorage>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: Arc::new(RwLock::new(CartStoreState {
                cart,
                checkout_locked: false,
            })),
            storage,
            events,
        }
    }

    /// Subscribes to cart change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.events.subscribe()
    }

    /// Adds a product to the cart, merging with an existing line.
    ///
    /// Returns the resulting line quantity after clamping.
    pub fn add_item(&self, product: &Product, quantity: u32) -> Result<u32, CartError> {
        let resulting = {
            let mut state = self.state.write().unwrap();
            if state.checkout_locked {
                return Err(CartError::CheckoutInProgress);
            }
            let resulting = state.cart.add_item(product, quantity)?;
            self.persist(&state.cart);
            resulting
        };
        self.emit(CartEvent::ItemAdded {
            product_id: product.id,
            quantity: resulting,
        });
        Ok(resulting)
    }

    /// Sets the quantity of an existing line.
    ///
    /// Returns the resulting line quantity after clamping.
    pub fn update_quantity(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<u32, CartError> {
        let resulting = {
            let mut state = self.state.write().unwrap();
            if state.checkout_locked {
                return Err(CartError::CheckoutInProgress);
            }
            let resulting = state.cart.update_quantity(product_id, quantity)?;
            self.persist(&state.cart);
            resulting
        };
        self.emit(CartEvent::QuantityUpdated {
            product_id,
            quantity: resulting,
        });
        Ok(resulting)
    }

    /// Removes a line from the cart.
    pub fn remove_item(&self, product_id: ProductId) -> Result<(), CartError> {
        {
            let mut state = self.state.write().unwrap();
            if state.checkout_locked {
                return Err(CartError::CheckoutInProgress);
            }
            state.cart.remove_item(product_id)?;
            self.persist(&state.cart);
        }
        self.emit(CartEvent::ItemRemoved { product_id });
        Ok(())
    }

    /// Removes every line.
    pub fn clear(&self) -> Result<(), CartError> {
        {
            let mut state = self.state.write().unwrap();
            if state.checkout_locked {
                return Err(CartError::CheckoutInProgress);
            }
            state.cart.clear();
            self.persist(&state.cart);
        }
        self.emit(CartEvent::Cleared);
        Ok(())
    }

    /// Returns a detached copy of the current cart.
    pub fn snapshot(&self) -> Cart {
        self.state.read().unwrap().cart.clone()
    }

    /// Returns the lines in insertion order.
    pub fn items(&self) -> Vec<CartItem> {
        self.state.read().unwrap().cart.items().to_vec()
    }

    /// Returns the line for a product, if present.
    pub fn get_item(&self, product_id: ProductId) -> Option<CartItem> {
        self.state.read().unwrap().cart.get_item(product_id).cloned()
    }

    /// Returns the current subtotal.
    pub fn subtotal(&self) -> Money {
        self.state.read().unwrap().cart.subtotal()
    }

    /// Returns the number of lines.
    pub fn len(&self) -> usize {
        self.state.read().unwrap().cart.len()
    }

    /// Returns true if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.state.read().unwrap().cart.is_empty()
    }

    /// Returns the total unit count across all lines.
    pub fn total_quantity(&self) -> u32 {
        self.state.read().unwrap().cart.total_quantity()
    }

    /// Returns true if a checkout currently holds the lock.
    pub fn is_checkout_locked(&self) -> bool {
        self.state.read().unwrap().checkout_locked
    }

    /// Locks the cart for a checkout and returns the immutable snapshot
    /// the checkout must work from.
    ///
    /// Fails on an empty cart or when another checkout already holds
    /// the lock.
    pub fn begin_checkout(&self) -> Result<Cart, CartError> {
        let snapshot = {
            let mut state = self.state.write().unwrap();
            if state.checkout_locked {
                return Err(CartError::CheckoutInProgress);
            }
            if state.cart.is_empty() {
                return Err(CartError::Empty);
            }
            state.checkout_locked = true;
            state.cart.clone()
        };
        self.emit(CartEvent::CheckoutLocked);
        Ok(snapshot)
    }

    /// Releases the checkout lock leaving the cart untouched.
    ///
    /// Called on the failure path so the customer can retry without
    /// rebuilding the cart.
    pub fn release_checkout(&self) {
        let was_locked = {
            let mut state = self.state.write().unwrap();
            std::mem::replace(&mut state.checkout_locked, false)
        };
        if was_locked {
            self.emit(CartEvent::CheckoutReleased);
        }
    }

    /// Clears the cart and releases the lock after a successful
    /// checkout.
    pub fn complete_checkout(&self) {
        let was_locked = {
            let mut state = self.state.write().unwrap();
            state.cart.clear();
            self.persist(&state.cart);
            std::mem::replace(&mut state.checkout_locked, false)
        };
        self.emit(CartEvent::Cleared);
        if was_locked {
            self.emit(CartEvent::CheckoutReleased);
        }
    }

    /// Saves the cart, logging instead of propagating failures.
    fn persist(&self, cart: &Cart) {
        if let Err(e) = self.storage.save(cart) {
            tracing::warn!(error = %e, "failed to persist cart, keeping in-memory state");
        }
    }

    fn emit(&self, event: CartEvent) {
        // Nobody subscribed is fine.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pump() -> Product {
        Product::new(1, "Floor Pump", Money::from_cents(4500), 6)
    }

    fn helmet() -> Product {
        Product::new(2, "Helmet", Money::from_cents(12000), 3)
    }

    fn store_with_memory() -> (CartStore, Arc<MemoryCartStorage>) {
        let storage = Arc::new(MemoryCartStorage::new());
        (CartStore::new(storage.clone()), storage)
    }

    #[test]
    fn test_clones_share_state() {
        let (store, _) = store_with_memory();
        let clone = store.clone();

        store.add_item(&pump(), 2).unwrap();
        assert_eq!(clone.len(), 1);
        assert_eq!(clone.subtotal(), Money::from_cents(9000));
    }

    #[test]
    fn test_mutations_notify_subscribers() {
        let (store, _) = store_with_memory();
        let mut rx = store.subscribe();

        store.add_item(&pump(), 2).unwrap();
        store.update_quantity(ProductId::new(1), 3).unwrap();
        store.remove_item(ProductId::new(1)).unwrap();

        assert_eq!(
            rx.try_recv().unwrap(),
            CartEvent::ItemAdded {
                product_id: ProductId::new(1),
                quantity: 2
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            CartEvent::QuantityUpdated {
                product_id: ProductId::new(1),
                quantity: 3
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            CartEvent::ItemRemoved {
                product_id: ProductId::new(1)
            }
        );
    }

    #[test]
    fn test_every_mutation_persists() {
        let (store, storage) = store_with_memory();

        store.add_item(&pump(), 1).unwrap();
        store.update_quantity(ProductId::new(1), 2).unwrap();
        store.clear().unwrap();

        assert_eq!(storage.save_count(), 3);
        assert_eq!(storage.saved_cart().unwrap().len(), 0);
    }

    #[test]
    fn test_persistence_failure_keeps_memory_state() {
        let (store, storage) = store_with_memory();
        storage.set_fail_on_save(true);

        store.add_item(&pump(), 2).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(storage.save_count(), 0);
    }

    #[test]
    fn test_hydrate_restores_persisted_cart() {
        let storage = Arc::new(MemoryCartStorage::new());
        let mut cart = Cart::new();
        cart.add_item(&helmet(), 1).unwrap();
        storage.seed(cart);

        let store = CartStore::hydrate(storage);
        assert_eq!(store.len(), 1);
        assert_eq!(store.subtotal(), Money::from_cents(12000));
    }

    #[test]
    fn test_hydrate_degrades_to_empty_on_unreadable_state() {
        let storage = Arc::new(MemoryCartStorage::new());
        storage.set_fail_on_load(true);

        let store = CartStore::hydrate(storage);
        assert!(store.is_empty());
    }

    #[test]
    fn test_hydrate_degrades_to_empty_on_invalid_snapshot() {
        let storage = Arc::new(MemoryCartStorage::new());
        // A snapshot no mutation path can produce: a line with zero stock.
        let tampered: Cart = serde_json::from_str(
            r#"{"items":[{"product_id":1,"name":"Ghost","unit_price":{"cents":1000},"quantity":1,"stock_at_add":0}]}"#,
        )
        .unwrap();
        storage.seed(tampered);

        let store = CartStore::hydrate(storage);
        assert!(store.is_empty());

        // The session stays fully usable afterwards.
        store.add_item(&pump(), 2).unwrap();
        assert_eq!(store.update_quantity(ProductId::new(1), 4).unwrap(), 4);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_begin_checkout_on_empty_cart_fails() {
        let (store, _) = store_with_memory();
        assert!(matches!(store.begin_checkout(), Err(CartError::Empty)));
        assert!(!store.is_checkout_locked());
    }

    #[test]
    fn test_begin_checkout_locks_and_snapshots() {
        let (store, _) = store_with_memory();
        store.add_item(&pump(), 2).unwrap();

        let snapshot = store.begin_checkout().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert!(store.is_checkout_locked());

        // Second checkout cannot start while the first is in flight.
        assert!(matches!(
            store.begin_checkout(),
            Err(CartError::CheckoutInProgress)
        ));
    }

    #[test]
    fn test_mutations_rejected_while_locked() {
        let (store, _) = store_with_memory();
        store.add_item(&pump(), 2).unwrap();
        store.begin_checkout().unwrap();

        assert!(matches!(
            store.add_item(&helmet(), 1),
            Err(CartError::CheckoutInProgress)
        ));
        assert!(matches!(
            store.update_quantity(ProductId::new(1), 1),
            Err(CartError::CheckoutInProgress)
        ));
        assert!(matches!(
            store.remove_item(ProductId::new(1)),
            Err(CartError::CheckoutInProgress)
        ));
        assert!(matches!(store.clear(), Err(CartError::CheckoutInProgress)));

        // Snapshot unaffected by the rejected calls.
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_release_checkout_keeps_cart_for_retry() {
        let (store, _) = store_with_memory();
        store.add_item(&pump(), 2).unwrap();
        store.begin_checkout().unwrap();

        store.release_checkout();

        assert!(!store.is_checkout_locked());
        assert_eq!(store.len(), 1);
        store.add_item(&helmet(), 1).unwrap();
    }

    #[test]
    fn test_complete_checkout_clears_persists_and_unlocks() {
        let (store, storage) = store_with_memory();
        store.add_item(&pump(), 2).unwrap();
        store.begin_checkout().unwrap();

        store.complete_checkout();

        assert!(store.is_empty());
        assert!(!store.is_checkout_locked());
        assert_eq!(storage.saved_cart().unwrap().len(), 0);
    }

    #[test]
    fn test_checkout_lifecycle_events() {
        let (store, _) = store_with_memory();
        store.add_item(&pump(), 1).unwrap();
        let mut rx = store.subscribe();

        store.begin_checkout().unwrap();
        store.complete_checkout();

        assert_eq!(rx.try_recv().unwrap(), CartEvent::CheckoutLocked);
        assert_eq!(rx.try_recv().unwrap(), CartEvent::Cleared);
        assert_eq!(rx.try_recv().unwrap(), CartEvent::CheckoutReleased);
    }
}
