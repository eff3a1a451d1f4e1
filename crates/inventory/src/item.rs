use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{InventoryId, ItemId};

/// A stocked item inside an inventory.
///
/// `display_id` is the user-facing number, unique among live items of the
/// owning inventory and assigned by the store on insert. It is NOT the
/// surrogate key; `id` is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub display_id: i64,
    pub name: String,
    pub stock: i64,
    pub inventory_id: InventoryId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an item. `display_id` is deliberately absent: the
/// store assigns it inside the insert transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub name: String,
    pub stock: i64,
    pub inventory_id: InventoryId,
}

/// Mutable fields of an item. `display_id` and `inventory_id` are immutable
/// after creation and have no representation here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateItem {
    pub name: String,
    pub stock: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_serializes_camel_case() {
        let item = Item {
            id: ItemId::from_i64(10),
            display_id: 3,
            name: "Bolt".to_string(),
            stock: 25,
            inventory_id: InventoryId::from_i64(1),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], 10);
        assert_eq!(json["displayId"], 3);
        assert_eq!(json["inventoryId"], 1);
        assert_eq!(json["stock"], 25);
        assert!(json.get("display_id").is_none());
    }

    #[test]
    fn new_item_deserializes_wire_shape() {
        let input: NewItem =
            serde_json::from_str(r#"{"name":"Bolt","stock":10,"inventoryId":1}"#).unwrap();
        assert_eq!(input.name, "Bolt");
        assert_eq!(input.stock, 10);
        assert_eq!(input.inventory_id, InventoryId::from_i64(1));
    }

    #[test]
    fn update_item_ignores_unknown_fields() {
        // A payload carrying displayId/inventoryId must not be able to touch
        // them; only name and stock are representable.
        let input: UpdateItem = serde_json::from_str(
            r#"{"name":"Nut","stock":5,"displayId":99,"inventoryId":42}"#,
        )
        .unwrap();
        assert_eq!(input.name, "Nut");
        assert_eq!(input.stock, 5);
    }
}
