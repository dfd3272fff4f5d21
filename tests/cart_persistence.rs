//! Cart persistence across restarts, using the file-backed store.
//!
//! Each test opens a cart over a temporary data directory, mutates it, drops
//! it, and opens a second store over the same directory to stand in for a
//! process restart.

use std::fs;

use rust_decimal::{Decimal, dec};
use tempfile::TempDir;
use testresult::TestResult;

use storefront::prelude::*;

fn lawn_suit() -> TestResult<NewCartLine> {
    Ok(
        NewCartLine::new(ProductId::new("lawn-01")?, "Lawn suit", Price::new(dec!(10))?)
            .with_image("uploads/lawn.jpg")
            .with_variant(Variant::none().with_size("M")),
    )
}

fn dupatta() -> TestResult<NewCartLine> {
    Ok(NewCartLine::new(
        ProductId::new("dupatta-07")?,
        "Chiffon dupatta",
        Price::new(dec!(5))?,
    ))
}

#[test]
fn cart_survives_restart() -> TestResult {
    let dir = TempDir::new()?;
    let store = FileStore::new(dir.path());

    {
        let mut cart = CartStore::open(&store);

        cart.add_line(lawn_suit()?, Quantity::new(2).ok_or("quantity")?);
        cart.add_line(dupatta()?, Quantity::new(3).ok_or("quantity")?);
    }

    let cart = CartStore::open(FileStore::new(dir.path()));

    assert_eq!(cart.len(), 2);
    assert_eq!(cart.total(), dec!(35));
    assert_eq!(cart.item_count(), 5);

    Ok(())
}

#[test]
fn precise_and_huge_prices_survive_restart() -> TestResult {
    let dir = TempDir::new()?;
    let precise = Price::new(dec!(1234567890.123456789))?;
    let huge = Price::new(Decimal::MAX)?;

    {
        let mut cart = CartStore::open(FileStore::new(dir.path()));

        cart.add(NewCartLine::new(ProductId::new("gold-set")?, "Gold set", precise));
        cart.add(NewCartLine::new(ProductId::new("estate")?, "Estate", huge));
    }

    let cart = CartStore::open(FileStore::new(dir.path()));
    let prices: Vec<Price> = cart.lines().iter().map(CartLine::unit_price).collect();

    assert_eq!(prices, vec![precise, huge]);

    Ok(())
}

#[test]
fn clear_then_restart_is_empty() -> TestResult {
    let dir = TempDir::new()?;
    let store = FileStore::new(dir.path());

    let mut cart = CartStore::open(&store);
    cart.add(lawn_suit()?);
    cart.clear();

    assert!(!store.slot_path(CartStore::<FileStore>::DEFAULT_SLOT)?.exists());
    assert!(CartStore::open(&store).is_empty());

    Ok(())
}

#[test]
fn same_product_different_sizes_persist_as_two_lines() -> TestResult {
    let dir = TempDir::new()?;
    let store = FileStore::new(dir.path());

    let mut cart = CartStore::open(&store);
    cart.add(lawn_suit()?);
    cart.add(lawn_suit()?.with_variant(Variant::none().with_size("L")));
    cart.add(lawn_suit()?);
    drop(cart);

    let reopened = CartStore::open(&store);
    let medium = LineKey::new(ProductId::new("lawn-01")?, Variant::none().with_size("M"));
    let large = LineKey::new(ProductId::new("lawn-01")?, Variant::none().with_size("L"));

    assert_eq!(reopened.len(), 2);
    assert_eq!(reopened.get(&medium).map(|line| line.quantity().get()), Some(2));
    assert_eq!(reopened.get(&large).map(|line| line.quantity().get()), Some(1));

    Ok(())
}

#[test]
fn snapshot_file_is_a_json_array_of_lines() -> TestResult {
    let dir = TempDir::new()?;
    let store = FileStore::new(dir.path());

    let mut cart = CartStore::open(&store);
    cart.add(lawn_suit()?);

    let raw = fs::read_to_string(store.slot_path("cartItems")?)?;
    let value: serde_json::Value = serde_json::from_str(&raw)?;

    assert_eq!(
        value,
        serde_json::json!([{
            "productId": "lawn-01",
            "title": "Lawn suit",
            "unitPrice": 10,
            "imageRef": "uploads/lawn.jpg",
            "quantity": 1,
            "size": "M",
        }])
    );

    Ok(())
}

#[test]
fn corrupt_snapshot_file_opens_empty_and_is_replaced() -> TestResult {
    let dir = TempDir::new()?;
    let store = FileStore::new(dir.path());

    fs::write(store.slot_path("cartItems")?, "[{\"productId\":")?;

    let mut cart = CartStore::open(&store);

    assert!(cart.is_empty());

    cart.add(dupatta()?);

    assert_eq!(CartStore::open(&store).len(), 1);

    Ok(())
}

#[test]
fn legacy_snapshot_is_rehydrated_and_merged() -> TestResult {
    let dir = TempDir::new()?;
    let store = FileStore::new(dir.path());

    fs::write(
        store.slot_path("cartItems")?,
        r#"[
            {"id":"64f0","title":"Shawl","price":1500,"image":"uploads/shawl.jpg","quantity":1},
            {"id":"64f0","title":"Shawl","price":1500,"image":"uploads/shawl.jpg","quantity":2}
        ]"#,
    )?;

    let cart = CartStore::open(&store);

    assert_eq!(cart.len(), 1);
    assert_eq!(cart.item_count(), 3);
    assert_eq!(cart.total(), dec!(4500));

    Ok(())
}

#[test]
fn unwritable_data_dir_keeps_working_in_memory() -> TestResult {
    let dir = TempDir::new()?;
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "")?;

    let mut cart = CartStore::open(FileStore::new(&blocker));

    cart.add(dupatta()?);
    cart.set_quantity(&LineKey::product(ProductId::new("dupatta-07")?), 4);

    assert_eq!(cart.item_count(), 4);
    assert_eq!(cart.total(), dec!(20));

    Ok(())
}
