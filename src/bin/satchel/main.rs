//! Satchel CLI
//!
//! Drives a cart stored on disk: browse the catalog, add and remove products,
//! change quantities, and show the cart.

use std::{io, process::ExitCode};

use thiserror::Error;
use tracing::{error, info};

use satchel::{pricing::currency_from_code, prelude::*};

use crate::config::{CliConfig, Command};

mod config;
mod logging;

/// Errors that end a CLI run.
#[derive(Debug, Error)]
enum CliError {
    /// Configured default currency is not supported.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Catalog could not be loaded or the product is missing.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Output could not be written.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Satchel CLI entry point
fn main() -> ExitCode {
    let config = match CliConfig::load() {
        Ok(config) => config,
        Err(err) => {
            if err.print().is_err() {
                return ExitCode::FAILURE;
            }

            return if err.use_stderr() {
                ExitCode::from(2)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(err) = logging::init_subscriber(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized, must use eprintln for logging errors"
        )]
        {
            eprintln!("Logging error: {err}");
        }

        return ExitCode::FAILURE;
    }

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");

            ExitCode::FAILURE
        }
    }
}

fn run(config: CliConfig) -> Result<(), CliError> {
    let currency = currency_from_code(&config.cart.currency)
        .ok_or_else(|| CliError::UnknownCurrency(config.cart.currency.clone()))?;

    let persistence = CartPersistence::new(FileStorage::new(&config.storage.data_dir), currency)
        .with_key(config.storage.storage_key.clone());

    let mut store = CartStore::open(persistence, TracingNotifier);

    let changed = match config.command {
        Command::Show => None,
        Command::Catalog => {
            let catalog = Catalog::from_path(&config.cart.catalog)?;

            write_catalog(io::stdout().lock(), &catalog)?;

            return Ok(());
        }
        Command::Add { product } => {
            let catalog = Catalog::from_path(&config.cart.catalog)?;

            Some(store.add_item(catalog.product(&product)?.to_cart_line()))
        }
        Command::Remove { product } => Some(store.remove_item(&ProductId::from(product))),
        Command::SetQuantity { product, quantity } => {
            Some(store.update_quantity(&ProductId::from(product), quantity))
        }
        Command::Clear => Some(store.clear()),
    };

    if changed == Some(false) {
        info!("cart unchanged");
    }

    write_cart(io::stdout().lock(), store.state())?;

    Ok(())
}
