//! Catalog
//!
//! Product data the storefront sells, loaded from YAML:
//!
//! ```yaml
//! products:
//!   classic-tee:
//!     name: Classic Tee
//!     price: 19.99 USD
//!     image: /images/classic-tee.png
//! ```

use std::{fs, io, path::Path};

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    lines::{NewCartLine, ProductId},
    pricing::{currency_from_code, from_decimal},
};

/// Catalog parsing errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading the catalog file
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),
}

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
struct CatalogFile {
    products: FxHashMap<String, ProductEntry>,
}

/// Product entry as written in YAML
#[derive(Debug, Deserialize)]
struct ProductEntry {
    name: String,
    price: String,
    #[serde(default)]
    image: String,
}

/// A product that can be added to the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Catalog key, used as the cart line id
    pub key: ProductId,

    /// Product name
    pub name: String,

    /// Product price
    pub price: Money<'static, Currency>,

    /// Image reference
    pub image: String,
}

impl Product {
    /// Build the payload for adding this product to the cart.
    pub fn to_cart_line(&self) -> NewCartLine {
        NewCartLine {
            id: self.key.clone(),
            name: self.name.clone(),
            unit_price: self.price,
            image: self.image.clone(),
        }
    }
}

/// Products indexed by key, all in one currency.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: FxHashMap<ProductId, Product>,
    currency: Option<&'static Currency>,
}

impl Catalog {
    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, a price is
    /// malformed, or products use more than one currency.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        Self::from_yaml(&fs::read_to_string(path)?)
    }

    /// Load a catalog from a YAML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be parsed, a price is
    /// malformed, or products use more than one currency.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_norway::from_str(yaml)?;

        let mut catalog = Catalog::default();

        for (key, entry) in file.products {
            let price = parse_price(&entry.price)?;

            match catalog.currency {
                Some(existing) if existing != price.currency() => {
                    return Err(CatalogError::CurrencyMismatch(
                        existing.iso_alpha_code.to_string(),
                        price.currency().iso_alpha_code.to_string(),
                    ));
                }
                Some(_) => {}
                None => catalog.currency = Some(price.currency()),
            }

            let key = ProductId::from(key);

            catalog.products.insert(
                key.clone(),
                Product {
                    key,
                    name: entry.name,
                    price,
                    image: entry.image,
                },
            );
        }

        Ok(catalog)
    }

    /// Look up a product by key.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ProductNotFound`] if there is no such product.
    pub fn product(&self, key: &str) -> Result<&Product, CatalogError> {
        self.products
            .get(&ProductId::from(key))
            .ok_or_else(|| CatalogError::ProductNotFound(key.to_string()))
    }

    /// All products, ordered by key.
    pub fn products(&self) -> Vec<&Product> {
        let mut products: Vec<&Product> = self.products.values().collect();

        products.sort_by(|a, b| a.key.cmp(&b.key));

        products
    }

    /// Currency shared by every product, if any are loaded.
    pub fn currency(&self) -> Option<&'static Currency> {
        self.currency
    }

    /// Number of products
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog has no products
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Parse price string (e.g., "2.99 GBP") into money
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a non-negative decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<Money<'static, Currency>, CatalogError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(currency_code), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(CatalogError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| CatalogError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() {
        return Err(CatalogError::InvalidPrice(s.to_string()));
    }

    let currency = currency_from_code(currency_code)
        .ok_or_else(|| CatalogError::UnknownCurrency(currency_code.to_string()))?;

    from_decimal(amount, currency).ok_or_else(|| CatalogError::InvalidPrice(s.to_string()))
}
