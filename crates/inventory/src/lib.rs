//! `stockroom-inventory` — inventory domain records.
//!
//! Two-level hierarchy: named [`Inventory`] containers owning [`Item`] rows.
//! Write-side inputs live next to the records they produce; the persistence
//! layer in `stockroom-infra` is the only place they are turned into rows.

pub mod inventory;
pub mod item;

pub use inventory::{Inventory, NewInventory};
pub use item::{Item, NewItem, UpdateItem};
