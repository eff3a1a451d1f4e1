//! Infrastructure layer: Postgres persistence for inventories and items.

pub mod store;

pub use store::{PgStore, StoreConfig, StoreError};

#[cfg(test)]
mod integration_tests;
