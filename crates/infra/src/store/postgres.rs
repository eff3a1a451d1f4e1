//! Postgres-backed store for inventories and items.
//!
//! ## Thread Safety
//!
//! Uses the SQLx connection pool which is thread-safe (Arc + Send + Sync).
//! `PgStore` is cheap to clone and share across request handlers.
//!
//! ## Soft Delete
//!
//! Rows are never physically removed by the accessors. Deletion stamps
//! `deleted_at`, and every read carries `deleted_at IS NULL`, so deleted
//! rows are logically absent everywhere.
//!
//! ## Display-Id Assignment
//!
//! `create_item` runs read-max-then-insert inside one transaction, behind a
//! transaction-scoped advisory lock keyed on the inventory. The partial
//! unique index on `(inventory_id, display_id) WHERE deleted_at IS NULL`
//! backs the invariant independently of the lock: if two transactions race
//! to the same number anyway, exactly one insert succeeds and the loser
//! retries with a fresh read. Correctness therefore does not depend on the
//! configured isolation level.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool, Row};
use tracing::instrument;

use stockroom_core::{InventoryId, ItemId};
use stockroom_inventory::{Inventory, Item, NewInventory, NewItem, UpdateItem};

use super::config::StoreConfig;
use super::error::{map_sqlx_error, StoreError};
use super::schema;

/// Attempts for the display-id insert before giving up with `Conflict`.
const CREATE_ITEM_ATTEMPTS: u32 = 3;

/// Postgres-backed persistence component.
///
/// Constructed once at startup ([`PgStore::connect`]), injected into the
/// HTTP layer, and closed on shutdown ([`PgStore::close`]).
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: Arc<PgPool>,
    op_timeout: Duration,
}

impl PgStore {
    /// Wrap an existing connection pool.
    pub fn new(pool: PgPool, op_timeout: Duration) -> Self {
        Self {
            pool: Arc::new(pool),
            op_timeout,
        }
    }

    /// Open a connection pool and wrap it.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        Ok(Self::new(pool, config.op_timeout))
    }

    /// Create or extend the schema. Idempotent; called once at startup.
    #[instrument(skip(self), err)]
    pub async fn migrate(&self) -> Result<(), StoreError> {
        self.with_deadline("migrate", schema::apply(&self.pool)).await
    }

    /// Close the underlying pool. Pending operations fail afterwards.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    // -------------------------
    // Inventory accessors
    // -------------------------

    /// All live inventories, oldest first.
    #[instrument(skip(self), err)]
    pub async fn list_inventories(&self) -> Result<Vec<Inventory>, StoreError> {
        self.with_deadline("list_inventories", async {
            let rows = sqlx::query(
                r#"
                SELECT id, name, created_at, updated_at
                FROM inventories
                WHERE deleted_at IS NULL
                ORDER BY id
                "#,
            )
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_inventories", e))?;

            let mut inventories = Vec::with_capacity(rows.len());
            for row in rows {
                let parsed = InventoryRow::from_row(&row)
                    .map_err(|e| map_sqlx_error("list_inventories", e))?;
                inventories.push(parsed.into());
            }
            Ok(inventories)
        })
        .await
    }

    /// Insert a new inventory and return the stored row. Empty names are
    /// allowed; there is no uniqueness constraint on `name`.
    #[instrument(skip(self, inventory), err)]
    pub async fn create_inventory(
        &self,
        inventory: NewInventory,
    ) -> Result<Inventory, StoreError> {
        self.with_deadline("create_inventory", async {
            let row = sqlx::query(
                r#"
                INSERT INTO inventories (name)
                VALUES ($1)
                RETURNING id, name, created_at, updated_at
                "#,
            )
            .bind(&inventory.name)
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("create_inventory", e))?;

            let created = InventoryRow::from_row(&row)
                .map_err(|e| map_sqlx_error("create_inventory", e))?;
            Ok(created.into())
        })
        .await
    }

    /// Soft-delete an inventory and cascade to its live items.
    ///
    /// Both updates run in one transaction: a crash cannot leave orphaned
    /// live items behind a deleted inventory. No-op when the inventory is
    /// already absent.
    #[instrument(skip(self), fields(inventory_id = %id), err)]
    pub async fn delete_inventory(&self, id: InventoryId) -> Result<(), StoreError> {
        self.with_deadline("delete_inventory", async {
            let mut tx = self
                .pool
                .begin()
                .await
                .map_err(|e| map_sqlx_error("begin_transaction", e))?;

            sqlx::query(
                r#"
                UPDATE inventories
                SET deleted_at = NOW()
                WHERE id = $1 AND deleted_at IS NULL
                "#,
            )
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("delete_inventory", e))?;

            sqlx::query(
                r#"
                UPDATE items
                SET deleted_at = NOW()
                WHERE inventory_id = $1 AND deleted_at IS NULL
                "#,
            )
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("delete_inventory_items", e))?;

            tx.commit()
                .await
                .map_err(|e| map_sqlx_error("commit_transaction", e))
        })
        .await
    }

    // -------------------------
    // Item accessors
    // -------------------------

    /// All live items across all inventories, oldest first.
    #[instrument(skip(self), err)]
    pub async fn list_items(&self) -> Result<Vec<Item>, StoreError> {
        self.with_deadline("list_items", async {
            let rows = sqlx::query(
                r#"
                SELECT id, display_id, name, stock, inventory_id, created_at, updated_at
                FROM items
                WHERE deleted_at IS NULL
                ORDER BY id
                "#,
            )
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_items", e))?;

            collect_items("list_items", rows)
        })
        .await
    }

    /// Live items of one inventory, oldest first.
    #[instrument(skip(self), fields(inventory_id = %inventory_id), err)]
    pub async fn list_items_by_inventory(
        &self,
        inventory_id: InventoryId,
    ) -> Result<Vec<Item>, StoreError> {
        self.with_deadline("list_items_by_inventory", async {
            let rows = sqlx::query(
                r#"
                SELECT id, display_id, name, stock, inventory_id, created_at, updated_at
                FROM items
                WHERE inventory_id = $1 AND deleted_at IS NULL
                ORDER BY id
                "#,
            )
            .bind(inventory_id.as_i64())
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_items_by_inventory", e))?;

            collect_items("list_items_by_inventory", rows)
        })
        .await
    }

    /// Insert an item, assigning the next display id of its inventory.
    ///
    /// The assignment and the insert share one transaction; a concurrent
    /// writer that takes the same number trips the unique index and the
    /// whole sequence is retried with a fresh max read, bounded by
    /// [`CREATE_ITEM_ATTEMPTS`]. Exhaustion surfaces `Conflict`; a missing
    /// inventory surfaces `NotFound` (foreign key).
    #[instrument(skip(self, item), fields(inventory_id = %item.inventory_id), err)]
    pub async fn create_item(&self, item: NewItem) -> Result<Item, StoreError> {
        self.with_deadline("create_item", async {
            let mut attempt = 1;
            loop {
                match self.try_create_item(&item).await {
                    Err(StoreError::Conflict(msg)) if attempt < CREATE_ITEM_ATTEMPTS => {
                        tracing::warn!(attempt, %msg, "display_id taken by concurrent insert, retrying");
                        attempt += 1;
                    }
                    other => return other,
                }
            }
        })
        .await
    }

    /// Update the mutable fields of an item.
    ///
    /// `display_id` and `inventory_id` never change, whatever the caller
    /// sends. Returns the stored row, or `None` when no live row matches
    /// (not an error).
    #[instrument(skip(self, update), fields(item_id = %id), err)]
    pub async fn update_item(
        &self,
        id: ItemId,
        update: UpdateItem,
    ) -> Result<Option<Item>, StoreError> {
        self.with_deadline("update_item", async {
            let row = sqlx::query(
                r#"
                UPDATE items
                SET name = $1, stock = $2, updated_at = NOW()
                WHERE id = $3 AND deleted_at IS NULL
                RETURNING id, display_id, name, stock, inventory_id, created_at, updated_at
                "#,
            )
            .bind(&update.name)
            .bind(update.stock)
            .bind(id.as_i64())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("update_item", e))?;

            match row {
                Some(row) => {
                    let updated =
                        ItemRow::from_row(&row).map_err(|e| map_sqlx_error("update_item", e))?;
                    Ok(Some(updated.into()))
                }
                None => Ok(None),
            }
        })
        .await
    }

    /// Exact-match lookup on `(inventory_id, display_id)` among live rows.
    ///
    /// The unique index makes more than one match impossible; the ordering
    /// clause pins the behavior anyway instead of leaving it to the planner.
    #[instrument(skip(self), fields(inventory_id = %inventory_id, display_id), err)]
    pub async fn search_item_by_display_id(
        &self,
        inventory_id: InventoryId,
        display_id: i64,
    ) -> Result<Item, StoreError> {
        self.with_deadline("search_item_by_display_id", async {
            let row = sqlx::query(
                r#"
                SELECT id, display_id, name, stock, inventory_id, created_at, updated_at
                FROM items
                WHERE inventory_id = $1 AND display_id = $2 AND deleted_at IS NULL
                ORDER BY id
                LIMIT 1
                "#,
            )
            .bind(inventory_id.as_i64())
            .bind(display_id)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("search_item_by_display_id", e))?;

            let row = row.ok_or(StoreError::NotFound)?;
            let item = ItemRow::from_row(&row)
                .map_err(|e| map_sqlx_error("search_item_by_display_id", e))?;
            Ok(item.into())
        })
        .await
    }

    /// Soft-delete an item by surrogate id. No-op when absent.
    #[instrument(skip(self), fields(item_id = %id), err)]
    pub async fn delete_item(&self, id: ItemId) -> Result<(), StoreError> {
        self.with_deadline("delete_item", async {
            sqlx::query(
                r#"
                UPDATE items
                SET deleted_at = NOW()
                WHERE id = $1 AND deleted_at IS NULL
                "#,
            )
            .bind(id.as_i64())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_item", e))?;
            Ok(())
        })
        .await
    }

    // -------------------------
    // Internals
    // -------------------------

    /// One read-max-then-insert transaction. Any failure drops the
    /// transaction, which rolls it back; no partial state becomes visible.
    async fn try_create_item(&self, item: &NewItem) -> Result<Item, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        // Serialize same-inventory assignment for the duration of the
        // transaction. The unique index stays the hard guarantee; the lock
        // keeps contending inserts fair instead of burning retry attempts.
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(item.inventory_id.as_i64())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("lock_inventory", e))?;

        let row = sqlx::query(
            r#"
            SELECT COALESCE(MAX(display_id), 0) AS max_display_id
            FROM items
            WHERE inventory_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(item.inventory_id.as_i64())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("max_display_id", e))?;

        let max_display_id: i64 = row
            .try_get("max_display_id")
            .map_err(|e| map_sqlx_error("max_display_id", e))?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO items (display_id, name, stock, inventory_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, display_id, name, stock, inventory_id, created_at, updated_at
            "#,
        )
        .bind(max_display_id + 1)
        .bind(&item.name)
        .bind(item.stock)
        .bind(item.inventory_id.as_i64())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("insert_item", e))?;

        let created = ItemRow::from_row(&inserted)
            .map_err(|e| map_sqlx_error("insert_item", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        Ok(created.into())
    }

    /// Run `fut` under the configured per-operation deadline.
    async fn with_deadline<T, F>(&self, op: &'static str, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout {
                op,
                after: self.op_timeout,
            }),
        }
    }
}

fn collect_items(
    operation: &str,
    rows: Vec<sqlx::postgres::PgRow>,
) -> Result<Vec<Item>, StoreError> {
    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        let parsed = ItemRow::from_row(&row).map_err(|e| map_sqlx_error(operation, e))?;
        items.push(parsed.into());
    }
    Ok(items)
}

// SQLx row types

#[derive(Debug)]
struct InventoryRow {
    id: i64,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, sqlx::postgres::PgRow> for InventoryRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(InventoryRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl From<InventoryRow> for Inventory {
    fn from(row: InventoryRow) -> Self {
        Inventory {
            id: InventoryId::from_i64(row.id),
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug)]
struct ItemRow {
    id: i64,
    display_id: i64,
    name: String,
    stock: i64,
    inventory_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, sqlx::postgres::PgRow> for ItemRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(ItemRow {
            id: row.try_get("id")?,
            display_id: row.try_get("display_id")?,
            name: row.try_get("name")?,
            stock: row.try_get("stock")?,
            inventory_id: row.try_get("inventory_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Item {
            id: ItemId::from_i64(row.id),
            display_id: row.display_id,
            name: row.name,
            stock: row.stock,
            inventory_id: InventoryId::from_i64(row.inventory_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
