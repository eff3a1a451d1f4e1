use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
    Json, Router,
};

use stockroom_core::InventoryId;
use stockroom_infra::PgStore;
use stockroom_inventory::NewInventory;

use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/inventories", get(list_inventories).post(create_inventory))
        .route("/inventories/:id", delete(delete_inventory))
}

pub async fn list_inventories(
    Extension(store): Extension<Arc<PgStore>>,
) -> axum::response::Response {
    match store.list_inventories().await {
        Ok(inventories) => (StatusCode::OK, Json(inventories)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_inventory(
    Extension(store): Extension<Arc<PgStore>>,
    Json(body): Json<dto::CreateInventoryRequest>,
) -> axum::response::Response {
    let inventory = NewInventory { name: body.name };

    match store.create_inventory(inventory).await {
        Ok(created) => (StatusCode::OK, Json(created)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_inventory(
    Extension(store): Extension<Arc<PgStore>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: InventoryId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match store.delete_inventory(id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "result": "success" })),
        )
            .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
