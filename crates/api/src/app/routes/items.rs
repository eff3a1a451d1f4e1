use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};

use stockroom_core::{DomainError, InventoryId, ItemId};
use stockroom_infra::PgStore;
use stockroom_inventory::{NewItem, UpdateItem};

use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        // Item reads hang off the owning inventory; the param name must
        // match the one in the inventories router for the shared segment.
        .route("/inventories/:id/items", get(list_items_by_inventory))
        .route("/inventories/:id/search/:display_id", get(search_item))
        .route("/items", post(create_item))
        .route("/items/:id", put(update_item).delete(delete_item))
}

pub async fn list_items_by_inventory(
    Extension(store): Extension<Arc<PgStore>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let inventory_id: InventoryId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match store.list_items_by_inventory(inventory_id).await {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn search_item(
    Extension(store): Extension<Arc<PgStore>>,
    Path((inv_id, display_id)): Path<(String, String)>,
) -> axum::response::Response {
    let inventory_id: InventoryId = match inv_id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let display_id: i64 = match display_id.parse() {
        Ok(v) => v,
        Err(e) => {
            return errors::domain_error_to_response(DomainError::invalid_id(format!(
                "display_id: {e}"
            )))
        }
    };

    match store
        .search_item_by_display_id(inventory_id, display_id)
        .await
    {
        Ok(item) => (StatusCode::OK, Json(item)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_item(
    Extension(store): Extension<Arc<PgStore>>,
    Json(body): Json<dto::CreateItemRequest>,
) -> axum::response::Response {
    let item = NewItem {
        name: body.name,
        stock: body.stock,
        inventory_id: body.inventory_id,
    };

    match store.create_item(item).await {
        Ok(created) => (StatusCode::OK, Json(created)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_item(
    Extension(store): Extension<Arc<PgStore>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateItemRequest>,
) -> axum::response::Response {
    let item_id: ItemId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let update = UpdateItem {
        name: body.name,
        stock: body.stock,
    };

    match store.update_item(item_id, update).await {
        Ok(Some(updated)) => (StatusCode::OK, Json(updated)).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "item not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_item(
    Extension(store): Extension<Arc<PgStore>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let item_id: ItemId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match store.delete_item(item_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "result": "success" })),
        )
            .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
