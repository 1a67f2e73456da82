//! Cart persistence.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use thiserror::Error;

use super::Cart;

/// Errors that can occur when persisting or restoring a cart.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored cart could not be serialized or parsed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The storage backend refused the operation.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Where the cart is persisted between sessions.
///
/// Persistence is best effort: the store logs failures and keeps its
/// in-memory state authoritative, so a broken backend degrades the
/// session instead of breaking it.
pub trait CartStorage: Send + Sync {
    /// Persists the full cart, replacing whatever was stored before.
    fn save(&self, cart: &Cart) -> Result<(), StorageError>;

    /// Restores the persisted cart, or `None` if nothing was stored.
    fn load(&self) -> Result<Option<Cart>, StorageError>;
}

#[derive(Debug, Default)]
struct MemoryCartStorageState {
    saved: Option<Cart>,
    save_count: usize,
    fail_on_save: bool,
    fail_on_load: bool,
}

/// In-memory cart storage for testing.
#[derive(Debug, Clone, Default)]
pub struct MemoryCartStorage {
    state: Arc<RwLock<MemoryCartStorageState>>,
}

impl MemoryCartStorage {
    /// Creates a new empty in-memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the storage to fail save calls.
    pub fn set_fail_on_save(&self, fail: bool) {
        self.state.write().unwrap().fail_on_save = fail;
    }

    /// Configures the storage to fail load calls.
    pub fn set_fail_on_load(&self, fail: bool) {
        self.state.write().unwrap().fail_on_load = fail;
    }

    /// Returns how many times a save succeeded.
    pub fn save_count(&self) -> usize {
        self.state.read().unwrap().save_count
    }

    /// Returns the most recently saved cart.
    pub fn saved_cart(&self) -> Option<Cart> {
        self.state.read().unwrap().saved.clone()
    }

    /// Seeds the storage with a cart, as if saved by an earlier session.
    pub fn seed(&self, cart: Cart) {
        self.state.write().unwrap().saved = Some(cart);
    }
}

impl CartStorage for MemoryCartStorage {
    fn save(&self, cart: &Cart) -> Result<(), StorageError> {
        let mut state = self.state.write().unwrap();
        if state.fail_on_save {
            return Err(StorageError::Unavailable("save disabled".to_string()));
        }
        state.saved = Some(cart.clone());
        state.save_count += 1;
        Ok(())
    }

    fn load(&self) -> Result<Option<Cart>, StorageError> {
        let state = self.state.read().unwrap();
        if state.fail_on_load {
            return Err(StorageError::Unavailable("load disabled".to_string()));
        }
        Ok(state.saved.clone())
    }
}

/// Cart storage backed by a single JSON file.
///
/// The whole cart is one small document, so every save rewrites the
/// file in full.
#[derive(Debug, Clone)]
pub struct FileCartStorage {
    path: PathBuf,
}

impl FileCartStorage {
    /// Creates a file storage at the given path.
    ///
    /// The file is created on first save; a missing file loads as an
    /// absent cart.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path the cart is stored at.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartStorage for FileCartStorage {
    fn save(&self, cart: &Cart) -> Result<(), StorageError> {
        let json = serde_json::to_string(cart)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    fn load(&self) -> Result<Option<Cart>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::product::Product;

    fn sample_cart() -> Cart {
        let mut cart = Cart::new();
        let product = Product::new(1, "Inner Tube", Money::from_cents(899), 12);
        cart.add_item(&product, 2).unwrap();
        cart
    }

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryCartStorage::new();
        assert!(storage.load().unwrap().is_none());

        let cart = sample_cart();
        storage.save(&cart).unwrap();

        assert_eq!(storage.save_count(), 1);
        assert_eq!(storage.load().unwrap(), Some(cart));
    }

    #[test]
    fn test_memory_storage_fail_switch() {
        let storage = MemoryCartStorage::new();
        storage.set_fail_on_save(true);

        let result = storage.save(&sample_cart());
        assert!(matches!(result, Err(StorageError::Unavailable(_))));
        assert_eq!(storage.save_count(), 0);
    }

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileCartStorage::new(dir.path().join("cart.json"));

        let cart = sample_cart();
        storage.save(&cart).unwrap();

        let loaded = storage.load().unwrap();
        assert_eq!(loaded, Some(cart));
    }

    #[test]
    fn test_file_storage_missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileCartStorage::new(dir.path().join("missing.json"));
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn test_file_storage_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");
        std::fs::write(&path, "not json at all").unwrap();

        let storage = FileCartStorage::new(path);
        let result = storage.load();
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }
}
