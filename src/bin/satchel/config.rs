//! Satchel CLI configuration

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use satchel::persistence::STORAGE_KEY;

/// Satchel cart manager configuration
#[derive(Debug, Parser)]
#[command(name = "satchel", about = "Storefront cart manager", long_about = None)]
pub(crate) struct CliConfig {
    /// Snapshot storage settings.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Cart and catalog settings.
    #[command(flatten)]
    pub cart: CartConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub(crate) fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

/// Snapshot storage settings.
#[derive(Debug, Args)]
pub(crate) struct StorageConfig {
    /// Directory holding the stored cart
    #[arg(long, env = "SATCHEL_DATA_DIR", default_value = ".satchel")]
    pub data_dir: PathBuf,

    /// Key the cart snapshot is stored under
    #[arg(long, env = "SATCHEL_STORAGE_KEY", default_value = STORAGE_KEY)]
    pub storage_key: String,
}

/// Cart and catalog settings.
#[derive(Debug, Args)]
pub(crate) struct CartConfig {
    /// Currency of an empty cart (GBP, USD, EUR)
    #[arg(long, env = "SATCHEL_CURRENCY", default_value = "USD")]
    pub currency: String,

    /// Product catalog file
    #[arg(long, env = "SATCHEL_CATALOG", default_value = "catalog/storefront.yaml")]
    pub catalog: PathBuf,
}

/// Log output format.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Cart operations.
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Show the cart
    Show,

    /// List the products that can be added
    Catalog,

    /// Add one unit of a catalog product
    Add {
        /// Catalog product key
        product: String,
    },

    /// Remove a product's line
    Remove {
        /// Product id of the line
        product: String,
    },

    /// Replace a line's quantity; values below one are ignored
    SetQuantity {
        /// Product id of the line
        product: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Empty the cart
    Clear,
}
