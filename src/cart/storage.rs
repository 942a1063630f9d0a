//! Cart persistence
//!
//! The cart is written to local storage after every mutation and read back
//! once when the store is opened. Stored data that cannot be read is treated
//! as an empty cart.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{Cart, CartState, NewCartItem, ScheduledDelivery};

/// Errors raised by cart storage backends.
#[derive(Debug, Error)]
pub enum CartStorageError {
    /// Reading or writing the backing store failed.
    #[error("cart storage i/o error")]
    Io(#[from] io::Error),

    /// Stored data could not be decoded.
    #[error("stored cart data is corrupt")]
    Corrupt(#[source] serde_json::Error),

    /// Cart state could not be encoded.
    #[error("failed to encode cart state")]
    Encode(#[source] serde_json::Error),
}

/// Durable storage for a single cart.
pub trait CartStorage {
    /// Load previously saved state. `Ok(None)` when nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored state cannot be read or decoded.
    fn load(&self) -> Result<Option<CartState>, CartStorageError>;

    /// Replace the saved state.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be encoded or written.
    fn save(&mut self, state: &CartState) -> Result<(), CartStorageError>;
}

/// Cart storage backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileCartStorage {
    path: PathBuf,
}

impl FileCartStorage {
    /// Store the cart at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartStorage for FileCartStorage {
    fn load(&self) -> Result<Option<CartState>, CartStorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        decode(&contents).map(Some)
    }

    fn save(&mut self, state: &CartState) -> Result<(), CartStorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.path, encode(state)?)?;

        Ok(())
    }
}

/// In-memory cart storage holding the encoded form.
#[derive(Debug, Clone, Default)]
pub struct MemoryCartStorage {
    contents: Option<String>,
}

impl MemoryCartStorage {
    /// Start with the given raw contents, as if previously saved.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Some(contents.into()),
        }
    }

    /// The raw saved contents.
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl CartStorage for MemoryCartStorage {
    fn load(&self) -> Result<Option<CartState>, CartStorageError> {
        self.contents.as_deref().map(decode).transpose()
    }

    fn save(&mut self, state: &CartState) -> Result<(), CartStorageError> {
        self.contents = Some(encode(state)?);

        Ok(())
    }
}

fn decode(contents: &str) -> Result<CartState, CartStorageError> {
    serde_json::from_str(contents).map_err(CartStorageError::Corrupt)
}

fn encode(state: &CartState) -> Result<String, CartStorageError> {
    serde_json::to_string(state).map_err(CartStorageError::Encode)
}

/// A cart bound to its storage.
///
/// Every mutation is persisted before it returns; the in-memory cart stays
/// authoritative if a write fails.
#[derive(Debug)]
pub struct CartStore<S> {
    cart: Cart,
    storage: S,
}

impl<S: CartStorage> CartStore<S> {
    /// Open the store, reloading any saved cart.
    pub fn open(storage: S, currency: &'static Currency) -> Self {
        let state = match storage.load() {
            Ok(Some(state)) => state,
            Ok(None) => CartState::default(),
            Err(error) => {
                warn!(%error, "discarding unreadable saved cart");

                CartState::default()
            }
        };

        Self {
            cart: Cart::from_state(state, currency),
            storage,
        }
    }

    /// The current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The backing storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Add one unit of a product.
    pub fn add_item(&mut self, item: NewCartItem) {
        self.mutate(|cart| cart.add_item(item));
    }

    /// Remove a line.
    pub fn remove_item(&mut self, product_id: Uuid, variant_id: Option<Uuid>) {
        self.mutate(|cart| cart.remove_item(product_id, variant_id));
    }

    /// Set the quantity of a line; zero or below removes it.
    pub fn update_quantity(&mut self, product_id: Uuid, quantity: i64, variant_id: Option<Uuid>) {
        self.mutate(|cart| cart.update_quantity(product_id, quantity, variant_id));
    }

    /// Set or clear the order note.
    pub fn set_note(&mut self, note: Option<String>) {
        self.mutate(|cart| cart.set_note(note));
    }

    /// Set or clear the scheduled delivery.
    pub fn set_scheduled_delivery(&mut self, delivery: Option<ScheduledDelivery>) {
        self.mutate(|cart| cart.set_scheduled_delivery(delivery));
    }

    /// Reset items, note and scheduled delivery together.
    pub fn clear(&mut self) {
        self.mutate(Cart::clear);
    }

    fn mutate(&mut self, f: impl FnOnce(&mut Cart)) {
        f(&mut self.cart);

        match self.storage.save(self.cart.state()) {
            Ok(()) => debug!(lines = self.cart.items().len(), "persisted cart"),
            Err(error) => warn!(%error, "failed to persist cart"),
        }
    }
}
