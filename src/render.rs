//! Render
//!
//! Terminal tables for the cart and the catalog.

use std::io;

use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::CartState,
    catalog::Catalog,
    pricing::{self, PricingError},
};

/// Errors that can occur while rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Output could not be written.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),

    /// A line total could not be computed.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Write the cart as a table followed by its totals.
///
/// # Errors
///
/// Returns a [`RenderError`] if the output cannot be written.
pub fn write_cart(mut out: impl io::Write, cart: &CartState) -> Result<(), RenderError> {
    if cart.is_empty() {
        writeln!(out, "Your cart is empty ({}).", cart.currency().iso_alpha_code)?;

        return Ok(());
    }

    let mut builder = Builder::default();

    builder.push_record(["", "Product", "Name", "Unit Price", "Qty", "Line Total"]);

    for (idx, line) in cart.lines().iter().enumerate() {
        let total = pricing::line_total(line)?;

        builder.push_record([
            (idx + 1).to_string(),
            line.id().to_string(),
            line.name().to_string(),
            line.unit_price().to_string(),
            line.quantity().to_string(),
            total.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(3..6), Alignment::right());

    writeln!(out, "{table}")?;
    writeln!(out, " Items:    {}", cart.item_count())?;
    writeln!(out, " Subtotal: {}", cart.subtotal())?;

    Ok(())
}

/// Write the catalog as a table.
///
/// # Errors
///
/// Returns a [`RenderError`] if the output cannot be written.
pub fn write_catalog(mut out: impl io::Write, catalog: &Catalog) -> Result<(), RenderError> {
    let mut builder = Builder::default();

    builder.push_record(["Product", "Name", "Price"]);

    for product in catalog.products() {
        builder.push_record([
            product.key.to_string(),
            product.name.clone(),
            product.price.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(2..3), Alignment::right());

    writeln!(out, "{table}")?;

    Ok(())
}
