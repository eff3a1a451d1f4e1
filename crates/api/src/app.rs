//! HTTP application assembly.
//!
//! The store is constructed by the caller and injected here; handlers pull
//! it back out of the request extensions. Nothing in this module owns
//! process-global state.

use std::sync::Arc;

use axum::extract::Extension;
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::CorsLayer;

use stockroom_infra::PgStore;

pub mod dto;
pub mod errors;
pub mod routes;

/// Build the full application router.
///
/// `allowed_origin` is the single origin the CORS layer accepts.
pub fn build_app(store: PgStore, allowed_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .nest("/api", routes::router())
        .layer(Extension(Arc::new(store)))
        .layer(cors)
}
