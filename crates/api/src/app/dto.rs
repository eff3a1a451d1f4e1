use serde::Deserialize;

use stockroom_core::InventoryId;

// -------------------------
// Request DTOs
// -------------------------
//
// Write bodies are lenient: absent name means empty, absent stock means
// zero. `inventoryId` has no sensible default and stays required.

#[derive(Debug, Deserialize)]
pub struct CreateInventoryRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub stock: i64,
    pub inventory_id: InventoryId,
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub stock: i64,
}
