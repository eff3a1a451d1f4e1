//! Integration tests for the Postgres store.
//!
//! These exercise a real database. They connect via `DATABASE_URL` and skip
//! (pass without running) when it is unset, so the suite works in both
//! environments. Every test provisions its own inventories, which keeps
//! display-id sequences isolated between tests sharing one database.

use std::time::Duration;

use stockroom_core::{InventoryId, ItemId};
use stockroom_inventory::{NewInventory, NewItem, UpdateItem};

use crate::store::{PgStore, StoreConfig, StoreError};

async fn connect() -> Option<PgStore> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("skipping: DATABASE_URL not set");
            return None;
        }
    };

    let mut config = StoreConfig::new(url);
    // Generous deadline: the concurrency test funnels 50 transactions
    // through one advisory lock.
    config.op_timeout = Duration::from_secs(30);

    let store = PgStore::connect(&config).await.expect("connect");
    store.migrate().await.expect("migrate");
    Some(store)
}

async fn fresh_inventory(store: &PgStore, name: &str) -> InventoryId {
    store
        .create_inventory(NewInventory {
            name: name.to_string(),
        })
        .await
        .expect("create inventory")
        .id
}

fn new_item(name: &str, stock: i64, inventory_id: InventoryId) -> NewItem {
    NewItem {
        name: name.to_string(),
        stock,
        inventory_id,
    }
}

#[tokio::test]
async fn items_are_numbered_sequentially() {
    let Some(store) = connect().await else { return };
    let inv = fresh_inventory(&store, "numbering").await;

    for expected in 1..=5 {
        let item = store
            .create_item(new_item(&format!("item-{expected}"), expected, inv))
            .await
            .expect("create item");
        assert_eq!(item.display_id, expected);
        assert_eq!(item.inventory_id, inv);
    }
}

#[tokio::test]
async fn display_id_sequences_are_independent_per_inventory() {
    let Some(store) = connect().await else { return };
    let left = fresh_inventory(&store, "left").await;
    let right = fresh_inventory(&store, "right").await;

    for expected in 1..=3 {
        let a = store
            .create_item(new_item("a", 0, left))
            .await
            .expect("create in left");
        let b = store
            .create_item(new_item("b", 0, right))
            .await
            .expect("create in right");
        // Both inventories reach the same numbers without conflicting.
        assert_eq!(a.display_id, expected);
        assert_eq!(b.display_id, expected);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_creates_assign_distinct_gapless_ids() {
    let Some(store) = connect().await else { return };
    let inv = fresh_inventory(&store, "stress").await;

    const N: usize = 50;
    let mut handles = Vec::with_capacity(N);
    for i in 0..N {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.create_item(new_item(&format!("c-{i}"), 1, inv)).await
        }));
    }

    let mut display_ids = Vec::with_capacity(N);
    for handle in handles {
        let item = handle.await.expect("task").expect("create item");
        display_ids.push(item.display_id);
    }

    display_ids.sort_unstable();
    let expected: Vec<i64> = (1..=N as i64).collect();
    assert_eq!(display_ids, expected, "ids must be distinct and gapless");
}

#[tokio::test]
async fn update_changes_only_name_and_stock() {
    let Some(store) = connect().await else { return };
    let inv = fresh_inventory(&store, "update").await;

    let created = store
        .create_item(new_item("before", 1, inv))
        .await
        .expect("create item");

    let updated = store
        .update_item(
            created.id,
            UpdateItem {
                name: "after".to_string(),
                stock: 99,
            },
        )
        .await
        .expect("update item")
        .expect("row exists");

    assert_eq!(updated.name, "after");
    assert_eq!(updated.stock, 99);
    assert_eq!(updated.display_id, created.display_id);
    assert_eq!(updated.inventory_id, created.inventory_id);
    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn update_of_absent_item_is_a_noop() {
    let Some(store) = connect().await else { return };

    let result = store
        .update_item(
            ItemId::from_i64(i64::MAX),
            UpdateItem {
                name: "ghost".to_string(),
                stock: 0,
            },
        )
        .await
        .expect("update must not error");
    assert!(result.is_none());
}

#[tokio::test]
async fn deleted_item_is_excluded_everywhere() {
    let Some(store) = connect().await else { return };
    let inv = fresh_inventory(&store, "soft-delete").await;

    let keep = store
        .create_item(new_item("keep", 1, inv))
        .await
        .expect("create keep");
    let gone = store
        .create_item(new_item("gone", 1, inv))
        .await
        .expect("create gone");

    store.delete_item(gone.id).await.expect("delete item");

    let all = store.list_items().await.expect("list_items");
    assert!(all.iter().any(|i| i.id == keep.id));
    assert!(all.iter().all(|i| i.id != gone.id));

    let in_inventory = store
        .list_items_by_inventory(inv)
        .await
        .expect("list_items_by_inventory");
    assert_eq!(in_inventory.len(), 1);
    assert_eq!(in_inventory[0].id, keep.id);

    let miss = store
        .search_item_by_display_id(inv, gone.display_id)
        .await
        .unwrap_err();
    assert!(matches!(miss, StoreError::NotFound));
}

#[tokio::test]
async fn deleting_inventory_cascades_to_its_items_only() {
    let Some(store) = connect().await else { return };
    let doomed = fresh_inventory(&store, "doomed").await;
    let survivor = fresh_inventory(&store, "survivor").await;

    let doomed_item = store
        .create_item(new_item("x", 1, doomed))
        .await
        .expect("create in doomed");
    let survivor_item = store
        .create_item(new_item("y", 1, survivor))
        .await
        .expect("create in survivor");

    store.delete_inventory(doomed).await.expect("delete inventory");

    let inventories = store.list_inventories().await.expect("list_inventories");
    assert!(inventories.iter().all(|i| i.id != doomed));
    assert!(inventories.iter().any(|i| i.id == survivor));

    let all = store.list_items().await.expect("list_items");
    assert!(all.iter().all(|i| i.id != doomed_item.id));
    assert!(all.iter().any(|i| i.id == survivor_item.id));
}

#[tokio::test]
async fn deleting_absent_inventory_is_a_noop() {
    let Some(store) = connect().await else { return };

    store
        .delete_inventory(InventoryId::from_i64(i64::MAX))
        .await
        .expect("delete must not error");
}

#[tokio::test]
async fn creating_item_for_missing_inventory_is_not_found() {
    let Some(store) = connect().await else { return };

    let err = store
        .create_item(new_item("orphan", 1, InventoryId::from_i64(i64::MAX)))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound));
}

#[tokio::test]
async fn search_finds_exact_display_id_match() {
    let Some(store) = connect().await else { return };
    let inv = fresh_inventory(&store, "search").await;

    let bolt = store
        .create_item(new_item("Bolt", 10, inv))
        .await
        .expect("create bolt");
    store
        .create_item(new_item("Nut", 5, inv))
        .await
        .expect("create nut");

    let found = store
        .search_item_by_display_id(inv, 1)
        .await
        .expect("search hit");
    assert_eq!(found.id, bolt.id);
    assert_eq!(found.name, "Bolt");

    let miss = store.search_item_by_display_id(inv, 42).await.unwrap_err();
    assert!(matches!(miss, StoreError::NotFound));
}
