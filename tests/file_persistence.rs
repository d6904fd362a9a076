//! Cart persistence against on-disk storage.

use std::fs;

use rusty_money::{
    Money,
    iso::{EUR, USD},
};
use testresult::TestResult;

use satchel::prelude::*;

fn open(dir: &std::path::Path) -> CartStore<FileStorage, NoopNotifier> {
    CartStore::open(CartPersistence::new(FileStorage::new(dir), USD), NoopNotifier)
}

#[test]
fn cart_survives_reopen() -> TestResult {
    let dir = tempfile::tempdir()?;
    let catalog = Catalog::from_path(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/catalog/storefront.yaml"
    ))?;

    let mut store = open(dir.path());

    store.add_item(catalog.product("classic-tee")?.to_cart_line());
    store.add_item(catalog.product("enamel-mug")?.to_cart_line());
    store.add_item(catalog.product("classic-tee")?.to_cart_line());

    let reopened = open(dir.path());

    assert_eq!(reopened.state(), store.state());
    assert_eq!(reopened.state().item_count(), 3);
    assert_eq!(reopened.state().subtotal(), Money::from_minor(5198, USD));

    Ok(())
}

#[test]
fn snapshot_file_is_written_under_the_storage_key() -> TestResult {
    let dir = tempfile::tempdir()?;
    let mut store = CartStore::open(
        CartPersistence::new(FileStorage::new(dir.path()), USD).with_key("guest.cart"),
        NoopNotifier,
    );

    store.add_item(NewCartLine {
        id: ProductId::from("tote"),
        name: "Canvas Tote".to_string(),
        unit_price: Money::from_minor(1550, USD),
        image: String::new(),
    });

    let raw = fs::read_to_string(dir.path().join("guest.cart.json"))?;
    let snapshot: Snapshot = serde_json::from_str(&raw)?;

    assert_eq!(snapshot.currency_code, "USD");
    assert_eq!(snapshot.lines.len(), 1);
    assert_eq!(snapshot.subtotal.to_string(), "15.50");

    Ok(())
}

#[test]
fn corrupt_snapshot_falls_back_to_empty_cart() -> TestResult {
    let dir = tempfile::tempdir()?;

    fs::write(dir.path().join(format!("{STORAGE_KEY}.json")), "\u{0}garbage")?;

    let mut store = open(dir.path());

    assert_eq!(store.state(), &CartState::empty(USD));

    store.add_item(NewCartLine {
        id: ProductId::from("mug"),
        name: "Enamel Mug".to_string(),
        unit_price: Money::from_minor(1200, USD),
        image: String::new(),
    });

    assert_eq!(open(dir.path()).state(), store.state());

    Ok(())
}

#[test]
fn empty_cart_uses_configured_currency() -> TestResult {
    let dir = tempfile::tempdir()?;

    let store = CartStore::open(
        CartPersistence::new(FileStorage::new(dir.path()), EUR),
        NoopNotifier,
    );

    assert_eq!(store.state().currency(), EUR);
    assert!(store.persistence().try_load()?.is_none());

    Ok(())
}
