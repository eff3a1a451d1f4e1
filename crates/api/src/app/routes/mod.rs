use axum::Router;

pub mod inventories;
pub mod items;

/// Router for everything under `/api`.
pub fn router() -> Router {
    Router::new()
        .merge(inventories::router())
        .merge(items::router())
}
