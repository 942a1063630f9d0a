//! Cart
//!
//! The device-local shopping cart. Lines are keyed by product and optional
//! variant; adding the same key twice bumps the quantity of the existing line.

use jiff::civil::Date;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::pricing::{self, PricingError};

mod storage;

pub use storage::{CartStorage, CartStorageError, CartStore, FileCartStorage, MemoryCartStorage};

/// Errors related to cart totals.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// Wrapped pricing error.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Identity of a cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineKey {
    /// Product the line is for.
    pub product_id: Uuid,

    /// Variant of the product, if the product has variants.
    pub variant_id: Option<Uuid>,
}

/// A product being added to the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartItem {
    /// Product identifier.
    pub product_id: Uuid,

    /// Variant identifier.
    pub variant_id: Option<Uuid>,

    /// Product display name.
    pub name: String,

    /// Variant display name.
    pub variant_name: Option<String>,

    /// Unit price in minor units.
    pub unit_price: u64,

    /// Image reference.
    pub image: Option<String>,
}

/// A line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product identifier.
    pub product_id: Uuid,

    /// Variant identifier.
    #[serde(default)]
    pub variant_id: Option<Uuid>,

    /// Product display name.
    pub name: String,

    /// Variant display name.
    #[serde(default)]
    pub variant_name: Option<String>,

    /// Unit price in minor units.
    pub unit_price: u64,

    /// Quantity, always at least one.
    pub quantity: u32,

    /// Image reference.
    #[serde(default)]
    pub image: Option<String>,
}

impl CartItem {
    /// The key this line is merged on.
    pub fn key(&self) -> LineKey {
        LineKey {
            product_id: self.product_id,
            variant_id: self.variant_id,
        }
    }

    /// Price of the whole line in minor units.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the line total overflows.
    pub fn line_total(&self) -> Result<u64, PricingError> {
        pricing::line_total(self.unit_price, self.quantity)
    }
}

impl From<NewCartItem> for CartItem {
    fn from(item: NewCartItem) -> Self {
        Self {
            product_id: item.product_id,
            variant_id: item.variant_id,
            name: item.name,
            variant_name: item.variant_name,
            unit_price: item.unit_price,
            quantity: 1,
            image: item.image,
        }
    }
}

/// A requested delivery date and time slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledDelivery {
    /// Delivery date.
    pub date: Date,

    /// Time slot label, e.g. `"09:00-12:00"`.
    pub slot: String,
}

/// The persisted portion of a cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    /// Cart lines in insertion order.
    #[serde(default)]
    pub items: Vec<CartItem>,

    /// Free-form note for the order.
    #[serde(default)]
    pub note: Option<String>,

    /// Requested delivery slot.
    #[serde(default)]
    pub scheduled_delivery: Option<ScheduledDelivery>,
}

/// Cart
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    state: CartState,
    currency: &'static Currency,
}

impl Cart {
    /// Create an empty cart.
    pub fn new(currency: &'static Currency) -> Self {
        Self::from_state(CartState::default(), currency)
    }

    /// Create a cart from previously persisted state.
    ///
    /// Lines with a zero quantity are dropped.
    pub fn from_state(mut state: CartState, currency: &'static Currency) -> Self {
        state.items.retain(|item| item.quantity > 0);

        Self { state, currency }
    }

    /// Add one unit of a product, merging into an existing line with the same key.
    pub fn add_item(&mut self, item: NewCartItem) {
        let key = LineKey {
            product_id: item.product_id,
            variant_id: item.variant_id,
        };

        if let Some(line) = self.line_mut(key) {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            self.state.items.push(item.into());
        }
    }

    /// Remove a line. Removing a line that does not exist is a no-op.
    pub fn remove_item(&mut self, product_id: Uuid, variant_id: Option<Uuid>) {
        let key = LineKey {
            product_id,
            variant_id,
        };

        self.state.items.retain(|item| item.key() != key);
    }

    /// Set the quantity of a line; zero or below removes it.
    pub fn update_quantity(&mut self, product_id: Uuid, quantity: i64, variant_id: Option<Uuid>) {
        if quantity <= 0 {
            self.remove_item(product_id, variant_id);

            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        if let Some(line) = self.line_mut(LineKey {
            product_id,
            variant_id,
        }) {
            line.quantity = quantity;
        }
    }

    /// Set or clear the order note.
    pub fn set_note(&mut self, note: Option<String>) {
        self.state.note = note.filter(|note| !note.trim().is_empty());
    }

    /// Set or clear the scheduled delivery.
    pub fn set_scheduled_delivery(&mut self, delivery: Option<ScheduledDelivery>) {
        self.state.scheduled_delivery = delivery;
    }

    /// Reset items, note and scheduled delivery together.
    pub fn clear(&mut self) {
        self.state = CartState::default();
    }

    /// Cart lines in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.state.items
    }

    /// Find a line by key.
    pub fn item(&self, product_id: Uuid, variant_id: Option<Uuid>) -> Option<&CartItem> {
        let key = LineKey {
            product_id,
            variant_id,
        };

        self.state.items.iter().find(|item| item.key() == key)
    }

    /// Order note.
    pub fn note(&self) -> Option<&str> {
        self.state.note.as_deref()
    }

    /// Requested delivery slot.
    pub fn scheduled_delivery(&self) -> Option<&ScheduledDelivery> {
        self.state.scheduled_delivery.as_ref()
    }

    /// Sum of quantities over all lines.
    pub fn total_items(&self) -> u64 {
        self.state
            .items
            .iter()
            .map(|item| u64::from(item.quantity))
            .sum()
    }

    /// Sum of price times quantity over all lines.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the total overflows.
    pub fn total_price(&self) -> Result<Money<'static, Currency>, CartError> {
        let totals = self
            .state
            .items
            .iter()
            .map(CartItem::line_total)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(pricing::total_price(totals, self.currency)?)
    }

    /// Check if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.state.items.is_empty()
    }

    /// The cart currency.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// The persisted portion of the cart.
    pub fn state(&self) -> &CartState {
        &self.state
    }

    fn line_mut(&mut self, key: LineKey) -> Option<&mut CartItem> {
        self.state.items.iter_mut().find(|item| item.key() == key)
    }
}
