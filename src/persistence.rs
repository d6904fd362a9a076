//! Persistence
//!
//! Mirrors the cart into a [`Storage`] backend as a JSON snapshot:
//!
//! ```json
//! {
//!   "lines": [
//!     {
//!       "id": "tee",
//!       "name": "Classic Tee",
//!       "unitPrice": "19.99",
//!       "imageRef": "/img/tee.png",
//!       "currencyCode": "USD",
//!       "quantity": 2
//!     }
//!   ],
//!   "subtotal": "39.98",
//!   "currencyCode": "USD"
//! }
//! ```

use std::num::NonZeroU32;

use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::{
    cart::{CartError, CartState},
    lines::{CartLine, NewCartLine, ProductId},
    pricing::{currency_from_code, from_exact_decimal, to_decimal},
    storage::{Storage, StorageError},
};

/// Storage key the snapshot is written under unless configured otherwise.
pub const STORAGE_KEY: &str = "satchel.cart";

/// Errors raised while reading or writing a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Storage backend failure.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Stored value is not a valid snapshot document.
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// Snapshot names a currency this crate does not support.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Snapshot holds an amount that cannot be represented.
    #[error("invalid amount: {0}")]
    InvalidAmount(Decimal),

    /// Snapshot lines do not form a valid cart.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Serialized form of a [`CartState`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Lines in cart order
    pub lines: Vec<SnapshotLine>,

    /// Subtotal at the time of writing
    pub subtotal: Decimal,

    /// ISO code of the cart currency
    pub currency_code: String,
}

/// Serialized form of a [`CartLine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotLine {
    /// Product id
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Unit price in major units
    pub unit_price: Decimal,

    /// Image reference
    pub image_ref: String,

    /// ISO code of the line currency
    pub currency_code: String,

    /// Quantity, at least one
    pub quantity: NonZeroU32,
}

impl From<&CartState> for Snapshot {
    fn from(state: &CartState) -> Self {
        Snapshot {
            lines: state.lines().iter().map(SnapshotLine::from).collect(),
            subtotal: to_decimal(&state.subtotal()),
            currency_code: state.currency().iso_alpha_code.to_string(),
        }
    }
}

impl From<&CartLine> for SnapshotLine {
    fn from(line: &CartLine) -> Self {
        SnapshotLine {
            id: line.id().clone(),
            name: line.name().to_string(),
            unit_price: to_decimal(line.unit_price()),
            image_ref: line.image().to_string(),
            currency_code: line.currency().iso_alpha_code.to_string(),
            quantity: line.non_zero_quantity(),
        }
    }
}

impl TryFrom<SnapshotLine> for CartLine {
    type Error = SnapshotError;

    fn try_from(line: SnapshotLine) -> Result<Self, Self::Error> {
        if line.unit_price.is_sign_negative() {
            return Err(SnapshotError::InvalidAmount(line.unit_price));
        }

        let currency = parse_currency(&line.currency_code)?;
        let unit_price = from_exact_decimal(line.unit_price, currency)
            .ok_or(SnapshotError::InvalidAmount(line.unit_price))?;

        Ok(CartLine::with_quantity(
            NewCartLine {
                id: line.id,
                name: line.name,
                unit_price,
                image: line.image_ref,
            },
            line.quantity,
        ))
    }
}

impl TryFrom<Snapshot> for CartState {
    type Error = SnapshotError;

    fn try_from(snapshot: Snapshot) -> Result<Self, Self::Error> {
        let currency = parse_currency(&snapshot.currency_code)?;

        let lines = snapshot
            .lines
            .into_iter()
            .map(CartLine::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let state = CartState::from_lines(lines, currency)?;

        // The stored subtotal is informational; the lines are authoritative.
        if to_decimal(&state.subtotal()) != snapshot.subtotal {
            debug!(
                stored = %snapshot.subtotal,
                computed = %state.subtotal(),
                "snapshot subtotal disagrees with its lines"
            );
        }

        Ok(state)
    }
}

fn parse_currency(code: &str) -> Result<&'static Currency, SnapshotError> {
    currency_from_code(code).ok_or_else(|| SnapshotError::UnknownCurrency(code.to_string()))
}

/// Reads and writes cart snapshots under a fixed key.
#[derive(Debug)]
pub struct CartPersistence<S> {
    storage: S,
    key: String,
    default_currency: &'static Currency,
}

impl<S: Storage> CartPersistence<S> {
    /// Persist to `storage` under [`STORAGE_KEY`]; empty carts use `default_currency`.
    pub fn new(storage: S, default_currency: &'static Currency) -> Self {
        Self {
            storage,
            key: STORAGE_KEY.to_string(),
            default_currency,
        }
    }

    /// Use a different storage key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// The storage key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Currency of an empty cart.
    pub fn default_currency(&self) -> &'static Currency {
        self.default_currency
    }

    /// The last saved cart, or an empty cart if there is none or it is unusable.
    ///
    /// Failures are logged and never returned.
    pub fn load(&self) -> CartState {
        match self.try_load() {
            Ok(Some(state)) => state,
            Ok(None) => CartState::empty(self.default_currency),
            Err(err) => {
                warn!(key = %self.key, "discarding stored cart: {err}");

                CartState::empty(self.default_currency)
            }
        }
    }

    /// The last saved cart, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] if the storage cannot be read or the stored
    /// value is not a valid cart.
    pub fn try_load(&self) -> Result<Option<CartState>, SnapshotError> {
        let Some(raw) = self.storage.get(&self.key)? else {
            return Ok(None);
        };

        let snapshot: Snapshot = serde_json::from_str(&raw)?;

        Ok(Some(CartState::try_from(snapshot)?))
    }

    /// Overwrite the stored snapshot with `state`.
    ///
    /// Failures are logged and never returned.
    pub fn save(&mut self, state: &CartState) {
        if let Err(err) = self.try_save(state) {
            error!(key = %self.key, "failed to save cart: {err}");
        }
    }

    /// Overwrite the stored snapshot with `state`.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] if the snapshot cannot be encoded or written.
    pub fn try_save(&mut self, state: &CartState) -> Result<(), SnapshotError> {
        let raw = serde_json::to_string(&Snapshot::from(state))?;

        self.storage.set(&self.key, &raw)?;

        Ok(())
    }
}
