//! Satchel
//!
//! Satchel keeps a storefront shopping cart: ordered product lines with a
//! derived subtotal, mirrored into durable storage so the cart survives
//! restarts, with notifications and subscriptions for the UI around it.

pub mod cart;
pub mod catalog;
pub mod lines;
pub mod notifications;
pub mod persistence;
pub mod prelude;
pub mod pricing;
pub mod render;
pub mod storage;
pub mod store;
