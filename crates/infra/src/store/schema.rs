//! Startup schema migration.
//!
//! Additive only: every statement is idempotent (`IF NOT EXISTS`), and
//! schema evolution happens by appending statements to the list, never by
//! editing or reordering committed ones.

use sqlx::PgPool;

use super::error::{map_sqlx_error, StoreError};

/// The partial unique index is what makes the display-id invariant a store
/// guarantee: two live items of one inventory can never share a number,
/// whatever isolation level the insert transaction ran under.
const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS inventories (
        id          BIGSERIAL PRIMARY KEY,
        name        TEXT NOT NULL DEFAULT '',
        created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        deleted_at  TIMESTAMPTZ
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS items (
        id           BIGSERIAL PRIMARY KEY,
        display_id   BIGINT NOT NULL,
        name         TEXT NOT NULL DEFAULT '',
        stock        BIGINT NOT NULL DEFAULT 0,
        inventory_id BIGINT NOT NULL REFERENCES inventories (id),
        created_at   TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at   TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        deleted_at   TIMESTAMPTZ
    )
    "#,
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS items_inventory_display_id_live_uq
        ON items (inventory_id, display_id)
        WHERE deleted_at IS NULL
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS items_inventory_id_idx
        ON items (inventory_id)
    "#,
];

pub(crate) async fn apply(pool: &PgPool) -> Result<(), StoreError> {
    for statement in STATEMENTS {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| map_sqlx_error("migrate", e))?;
    }
    Ok(())
}
