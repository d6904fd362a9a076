//! Satchel prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{CartAction, CartError, CartState, Ignored, Transition},
    catalog::{Catalog, CatalogError, Product},
    lines::{CartLine, NewCartLine, ProductId},
    notifications::{NoopNotifier, Notification, Notifier, RecordingNotifier, TracingNotifier},
    persistence::{CartPersistence, STORAGE_KEY, Snapshot, SnapshotError},
    pricing::PricingError,
    render::{RenderError, write_cart, write_catalog},
    storage::{FileStorage, MemoryStorage, Storage, StorageError},
    store::{CartStore, SubscriptionKey},
};
