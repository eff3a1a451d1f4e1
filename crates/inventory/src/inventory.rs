use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::InventoryId;

/// A named container of items.
///
/// Soft-deleted rows never surface here: the store filters them, so a value
/// of this type always describes a live inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    pub id: InventoryId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an inventory. An empty name is allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInventory {
    pub name: String,
}
