//! Pricing

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money, MoneyError,
    iso::{Currency, EUR, GBP, USD},
};
use thiserror::Error;

use crate::lines::{CartLine, ProductId};

/// Decimal places of every supported currency.
const MINOR_UNIT_SCALE: u32 = 2;

/// Errors that can occur while pricing cart lines.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// Unit price multiplied by quantity does not fit in minor units.
    #[error("line total for {0} overflows")]
    Overflow(ProductId),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Looks up a supported currency by its ISO alpha code.
pub fn currency_from_code(code: &str) -> Option<&'static Currency> {
    match code {
        "GBP" => Some(GBP),
        "USD" => Some(USD),
        "EUR" => Some(EUR),
        _ => None,
    }
}

/// Converts money into an exact decimal amount in major units.
pub fn to_decimal(money: &Money<'_, Currency>) -> Decimal {
    Decimal::new(money.to_minor_units(), MINOR_UNIT_SCALE)
}

/// Converts a decimal amount in major units into money, rounding to the minor unit.
///
/// Returns `None` if the amount does not fit in minor units.
pub fn from_decimal(
    amount: Decimal,
    currency: &'static Currency,
) -> Option<Money<'static, Currency>> {
    amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .map(|minor_units| Money::from_minor(minor_units, currency))
}

/// Converts a decimal amount in major units into money without rounding.
///
/// Returns `None` if the amount has more decimal places than the currency's
/// minor unit, or does not fit in minor units.
pub fn from_exact_decimal(
    amount: Decimal,
    currency: &'static Currency,
) -> Option<Money<'static, Currency>> {
    if amount.normalize().scale() > MINOR_UNIT_SCALE {
        return None;
    }

    from_decimal(amount, currency)
}

/// Calculates the total of a single line (unit price × quantity).
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the total does not fit in minor units.
pub fn line_total(line: &CartLine) -> Result<Money<'static, Currency>, PricingError> {
    let minor_units = line
        .unit_price()
        .to_minor_units()
        .checked_mul(i64::from(line.quantity()))
        .ok_or_else(|| PricingError::Overflow(line.id().clone()))?;

    Ok(Money::from_minor(minor_units, line.currency()))
}

/// Calculates the subtotal of a list of lines by folding over every line.
///
/// An empty list totals zero in the given currency.
///
/// # Errors
///
/// - [`PricingError::Overflow`]: a line total does not fit in minor units.
/// - [`PricingError::Money`]: a line is in a different currency, or the sum overflows.
pub fn subtotal(
    lines: &[CartLine],
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    lines
        .iter()
        .try_fold(Money::from_minor(0, currency), |acc, line| {
            Ok(acc.add(line_total(line)?)?)
        })
}
