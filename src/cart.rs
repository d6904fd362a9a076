//! Cart State
//!
//! [`CartState`] is an immutable value. Every mutation goes through
//! [`CartState::apply`], which either produces a whole new state with a freshly
//! folded subtotal or explains why the action was ignored.

use std::num::NonZeroU32;

use rustc_hash::FxHashSet;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    lines::{CartLine, NewCartLine, ProductId},
    pricing::{self, PricingError},
};

/// Errors raised when a set of lines cannot form a valid cart.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// The same product appears on more than one line.
    #[error("product {0} appears on more than one line")]
    DuplicateLine(ProductId),

    /// A line's currency differs from the cart currency.
    #[error("line {id} has currency {line}, but cart has currency {cart}")]
    CurrencyMismatch {
        /// Product on the offending line
        id: ProductId,

        /// Currency of the line
        line: &'static str,

        /// Currency of the cart
        cart: &'static str,
    },

    /// Subtotal could not be computed.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// A mutation requested by a cart consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    /// Add one unit of a product.
    Add(NewCartLine),

    /// Remove a product's line entirely.
    Remove(ProductId),

    /// Replace a line's quantity.
    UpdateQuantity {
        /// Product whose line is updated
        id: ProductId,

        /// Requested quantity, as entered
        quantity: i64,
    },

    /// Reset to an empty cart in the given currency.
    Clear(&'static Currency),
}

/// Why an action left the cart untouched.
#[derive(Debug, Error, PartialEq)]
pub enum Ignored {
    /// Quantities below one never remove the line.
    #[error("quantity {0} is below one")]
    QuantityBelowOne(i64),

    /// Quantity does not fit on a line.
    #[error("quantity {0} is out of range")]
    QuantityOutOfRange(i64),

    /// No line exists for the product.
    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),

    /// Product is priced in another currency than the cart.
    #[error("product {id} is priced in {line}, but the cart is in {cart}")]
    CurrencyMismatch {
        /// Product being added
        id: ProductId,

        /// Currency of the product
        line: &'static str,

        /// Currency of the cart
        cart: &'static str,
    },

    /// Product has a negative unit price.
    #[error("product {0} has a negative unit price")]
    NegativePrice(ProductId),

    /// The resulting lines would not form a valid cart.
    #[error(transparent)]
    Invalid(#[from] CartError),
}

/// Outcome of applying an action.
#[derive(Debug, PartialEq)]
#[must_use]
pub enum Transition {
    /// The action produced a new state.
    Changed(CartState),

    /// The action was a no-op.
    Ignored(Ignored),
}

/// The whole cart: ordered lines, one currency, and a derived subtotal.
#[derive(Debug, Clone, PartialEq)]
pub struct CartState {
    lines: Vec<CartLine>,
    subtotal: Money<'static, Currency>,
    currency: &'static Currency,
}

impl CartState {
    /// Create an empty cart in the given currency.
    #[must_use]
    pub fn empty(currency: &'static Currency) -> Self {
        CartState {
            lines: Vec::new(),
            subtotal: Money::from_minor(0, currency),
            currency,
        }
    }

    /// Build a cart from existing lines, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if a product appears twice, a line is in another
    /// currency, or the subtotal cannot be computed.
    pub fn from_lines(
        lines: Vec<CartLine>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let mut seen = FxHashSet::default();

        for line in &lines {
            if !seen.insert(line.id()) {
                return Err(CartError::DuplicateLine(line.id().clone()));
            }

            if line.currency() != currency {
                return Err(CartError::CurrencyMismatch {
                    id: line.id().clone(),
                    line: line.currency().iso_alpha_code,
                    cart: currency.iso_alpha_code,
                });
            }
        }

        let subtotal = pricing::subtotal(&lines, currency)?;

        Ok(CartState {
            lines,
            subtotal,
            currency,
        })
    }

    /// Apply an action, returning the next state or the reason it was ignored.
    pub fn apply(&self, action: &CartAction) -> Transition {
        let next = match action {
            CartAction::Add(line) => self.with_added(line),
            CartAction::Remove(id) => self.with_removed(id),
            CartAction::UpdateQuantity { id, quantity } => self.with_quantity(id, *quantity),
            CartAction::Clear(currency) => Ok(CartState::empty(*currency)),
        };

        match next {
            Ok(state) => Transition::Changed(state),
            Err(reason) => Transition::Ignored(reason),
        }
    }

    fn with_added(&self, new_line: &NewCartLine) -> Result<Self, Ignored> {
        if new_line.unit_price.to_minor_units() < 0 {
            return Err(Ignored::NegativePrice(new_line.id.clone()));
        }

        // An empty cart takes the currency of its first line.
        let currency = if self.lines.is_empty() {
            new_line.unit_price.currency()
        } else {
            self.currency
        };

        if new_line.unit_price.currency() != currency {
            return Err(Ignored::CurrencyMismatch {
                id: new_line.id.clone(),
                line: new_line.unit_price.currency().iso_alpha_code,
                cart: currency.iso_alpha_code,
            });
        }

        let mut lines = self.lines.clone();

        match lines.iter_mut().find(|line| line.id() == &new_line.id) {
            Some(existing) => {
                let quantity = existing
                    .quantity()
                    .checked_add(1)
                    .and_then(NonZeroU32::new)
                    .ok_or(Ignored::QuantityOutOfRange(
                        i64::from(existing.quantity()) + 1,
                    ))?;

                *existing = existing.with_replaced_quantity(quantity);
            }
            None => lines.push(CartLine::new(new_line.clone())),
        }

        Ok(CartState::from_lines(lines, currency)?)
    }

    fn with_removed(&self, id: &ProductId) -> Result<Self, Ignored> {
        let position = self
            .lines
            .iter()
            .position(|line| line.id() == id)
            .ok_or_else(|| Ignored::NotInCart(id.clone()))?;

        let mut lines = self.lines.clone();
        lines.remove(position);

        Ok(CartState::from_lines(lines, self.currency)?)
    }

    fn with_quantity(&self, id: &ProductId, quantity: i64) -> Result<Self, Ignored> {
        if quantity < 1 {
            return Err(Ignored::QuantityBelowOne(quantity));
        }

        let quantity_nz = u32::try_from(quantity)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or(Ignored::QuantityOutOfRange(quantity))?;

        if self.line(id).is_none() {
            return Err(Ignored::NotInCart(id.clone()));
        }

        let lines = self
            .lines
            .iter()
            .map(|line| {
                if line.id() == id {
                    line.with_replaced_quantity(quantity_nz)
                } else {
                    line.clone()
                }
            })
            .collect();

        Ok(CartState::from_lines(lines, self.currency)?)
    }

    /// Lines in the order they were first added.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Find the line for a product.
    pub fn line(&self, id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id() == id)
    }

    /// Total for a single product's line, if it is in the cart.
    pub fn line_total(&self, id: &ProductId) -> Option<Money<'static, Currency>> {
        self.line(id).and_then(|line| pricing::line_total(line).ok())
    }

    /// Sum of every line total.
    pub fn subtotal(&self) -> Money<'static, Currency> {
        self.subtotal
    }

    /// Currency of the whole cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity()))
            .sum()
    }
}
