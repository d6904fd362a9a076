//! Cart behaviour through the public store API.
//!
//! Scenario covered by `documented_scenario`:
//!
//! 1. Start empty
//! 2. Add A (£10.00), add A again, add B (£5.00)
//!    - Lines: [A × 2, B × 1], subtotal £25.00
//! 3. Set A's quantity to 0
//!    - Ignored, A stays at 2
//! 4. Remove B
//!    - Lines: [A × 2], subtotal £20.00

use rusty_money::{
    Money,
    iso::{Currency, GBP},
};
use satchel::prelude::*;

fn product(id: &str, minor_units: i64) -> NewCartLine {
    NewCartLine {
        id: ProductId::from(id),
        name: format!("Product {id}"),
        unit_price: Money::from_minor(minor_units, GBP),
        image: format!("/images/{id}.png"),
    }
}

fn open(storage: &MemoryStorage) -> CartStore<MemoryStorage, RecordingNotifier> {
    CartStore::open(
        CartPersistence::new(storage.clone(), GBP),
        RecordingNotifier::new(),
    )
}

fn lines(state: &CartState) -> Vec<(String, u32)> {
    state
        .lines()
        .iter()
        .map(|line| (line.id().to_string(), line.quantity()))
        .collect()
}

fn folded_subtotal(state: &CartState) -> Money<'static, Currency> {
    let minor_units = state
        .lines()
        .iter()
        .map(|line| line.unit_price().to_minor_units() * i64::from(line.quantity()))
        .sum();

    Money::from_minor(minor_units, state.currency())
}

#[test]
fn documented_scenario() {
    let storage = MemoryStorage::new();
    let mut store = open(&storage);

    store.add_item(product("A", 1000));
    store.add_item(product("A", 1000));
    store.add_item(product("B", 500));

    assert_eq!(
        lines(store.state()),
        vec![("A".to_string(), 2), ("B".to_string(), 1)]
    );
    assert_eq!(store.state().subtotal(), Money::from_minor(2500, GBP));

    let before = store.state().clone();

    assert!(!store.update_quantity(&ProductId::from("A"), 0));
    assert_eq!(store.state(), &before);

    assert!(store.remove_item(&ProductId::from("B")));

    assert_eq!(lines(store.state()), vec![("A".to_string(), 2)]);
    assert_eq!(store.state().subtotal(), Money::from_minor(2000, GBP));
}

#[test]
fn repeated_adds_collapse_into_one_line() {
    let storage = MemoryStorage::new();
    let mut store = open(&storage);

    for count in 1..=12_u32 {
        store.add_item(product("A", 199));

        assert_eq!(lines(store.state()), vec![("A".to_string(), count)]);
    }
}

#[test]
fn subtotal_always_matches_lines() {
    let storage = MemoryStorage::new();
    let mut store = open(&storage);

    let steps: [&dyn Fn(&mut CartStore<MemoryStorage, RecordingNotifier>); 8] = [
        &|s| {
            s.add_item(product("A", 333));
        },
        &|s| {
            s.add_item(product("B", 1));
        },
        &|s| {
            s.update_quantity(&ProductId::from("A"), 7);
        },
        &|s| {
            s.add_item(product("C", 9_999));
        },
        &|s| {
            s.update_quantity(&ProductId::from("B"), -3);
        },
        &|s| {
            s.remove_item(&ProductId::from("A"));
        },
        &|s| {
            s.add_item(product("B", 1));
        },
        &|s| {
            s.remove_item(&ProductId::from("missing"));
        },
    ];

    for step in steps {
        step(&mut store);

        assert_eq!(store.state().subtotal(), folded_subtotal(store.state()));
    }

    assert_eq!(
        lines(store.state()),
        vec![("B".to_string(), 2), ("C".to_string(), 1)]
    );
}

#[test]
fn sub_one_quantities_leave_cart_unchanged() {
    let storage = MemoryStorage::new();
    let mut store = open(&storage);

    store.add_item(product("A", 1000));
    let before = store.state().clone();

    assert!(!store.update_quantity(&ProductId::from("A"), 0));
    assert!(!store.update_quantity(&ProductId::from("A"), -1));

    assert_eq!(store.state(), &before);
}

#[test]
fn removing_absent_product_leaves_cart_unchanged() {
    let storage = MemoryStorage::new();
    let mut store = open(&storage);

    store.add_item(product("A", 1000));
    let before = store.state().clone();

    assert!(!store.remove_item(&ProductId::from("Z")));
    assert_eq!(store.state(), &before);
}

#[test]
fn clear_then_reload_is_empty() {
    let storage = MemoryStorage::new();
    let mut store = open(&storage);

    store.add_item(product("A", 1000));
    store.add_item(product("B", 500));
    store.clear();

    let reloaded = open(&storage);

    assert_eq!(reloaded.state(), &CartState::empty(GBP));
}

#[test]
fn reload_reproduces_lines_order_and_subtotal() {
    let storage = MemoryStorage::new();
    let mut store = open(&storage);

    store.add_item(product("B", 500));
    store.add_item(product("A", 1999));
    store.add_item(product("B", 500));
    store.update_quantity(&ProductId::from("A"), 3);

    let reloaded = open(&storage);

    assert_eq!(reloaded.state(), store.state());
    assert_eq!(
        lines(reloaded.state()),
        vec![("B".to_string(), 2), ("A".to_string(), 3)]
    );
    assert_eq!(
        reloaded.state().line_total(&ProductId::from("A")),
        Some(Money::from_minor(5997, GBP))
    );
}

#[test]
fn notifications_follow_the_toast_contract() {
    let storage = MemoryStorage::new();
    let notifier = RecordingNotifier::new();
    let mut store = CartStore::open(CartPersistence::new(storage, GBP), notifier.clone());

    store.add_item(product("A", 1000));
    store.update_quantity(&ProductId::from("A"), 2);
    store.update_quantity(&ProductId::from("A"), 0);
    store.remove_item(&ProductId::from("A"));
    store.clear();

    assert_eq!(
        notifier.received(),
        vec![
            Notification::Added {
                name: "Product A".to_string()
            },
            Notification::Removed {
                name: "Product A".to_string()
            },
            Notification::Cleared,
        ]
    );
}
