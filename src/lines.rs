//! Cart Lines

use std::{fmt, num::NonZeroU32};

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

/// Stable identifier of the product behind a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a product id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Payload for adding a product to the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartLine {
    /// Product id
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Price of a single unit, in the line's currency
    pub unit_price: Money<'static, Currency>,

    /// Image reference shown next to the line
    pub image: String,
}

/// One distinct product in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    id: ProductId,
    name: String,
    unit_price: Money<'static, Currency>,
    image: String,
    quantity: NonZeroU32,
}

impl CartLine {
    /// Creates a line with a quantity of one.
    #[must_use]
    pub fn new(line: NewCartLine) -> Self {
        Self::with_quantity(line, NonZeroU32::MIN)
    }

    /// Creates a line with the given quantity.
    #[must_use]
    pub fn with_quantity(line: NewCartLine, quantity: NonZeroU32) -> Self {
        let NewCartLine {
            id,
            name,
            unit_price,
            image,
        } = line;

        Self {
            id,
            name,
            unit_price,
            image,
            quantity,
        }
    }

    /// Returns the product id
    pub fn id(&self) -> &ProductId {
        &self.id
    }

    /// Returns the display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the unit price
    pub fn unit_price(&self) -> &Money<'static, Currency> {
        &self.unit_price
    }

    /// Returns the image reference
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Returns the line currency
    pub fn currency(&self) -> &'static Currency {
        self.unit_price.currency()
    }

    /// Returns the quantity
    pub fn quantity(&self) -> u32 {
        self.quantity.get()
    }

    pub(crate) fn non_zero_quantity(&self) -> NonZeroU32 {
        self.quantity
    }

    pub(crate) fn with_replaced_quantity(&self, quantity: NonZeroU32) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;

    use super::*;

    fn tee() -> NewCartLine {
        NewCartLine {
            id: ProductId::from("tee"),
            name: "Classic Tee".to_string(),
            unit_price: Money::from_minor(1999, GBP),
            image: "/img/tee.png".to_string(),
        }
    }

    #[test]
    fn new_line_starts_at_one() {
        let line = CartLine::new(tee());

        assert_eq!(line.quantity(), 1);
        assert_eq!(line.id().as_str(), "tee");
        assert_eq!(line.name(), "Classic Tee");
        assert_eq!(line.image(), "/img/tee.png");
        assert_eq!(line.currency(), GBP);
    }

    #[test]
    fn replacing_quantity_keeps_other_fields() -> testresult::TestResult {
        let line = CartLine::new(tee());
        let replaced = line.with_replaced_quantity(NonZeroU32::new(4).ok_or("zero")?);

        assert_eq!(replaced.quantity(), 4);
        assert_eq!(replaced.unit_price(), line.unit_price());
        assert_eq!(replaced.id(), line.id());

        Ok(())
    }

    #[test]
    fn product_id_displays_raw_value() {
        assert_eq!(ProductId::from("sku-42").to_string(), "sku-42");
    }
}
