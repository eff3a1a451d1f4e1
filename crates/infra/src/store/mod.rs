//! Persistence boundary for the inventory hierarchy.
//!
//! [`PgStore`] is the only component that talks to the database. It is
//! constructed once at startup and injected into request handlers; there is
//! no ambient global handle.

pub mod config;
pub mod error;
pub mod postgres;
mod schema;

pub use config::StoreConfig;
pub use error::StoreError;
pub use postgres::PgStore;
