use std::sync::Arc;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    Router,
};
use catalog_core::config::ServerConfig;
use catalog_core::CatalogService;
use tower_http::catch_panic::CatchPanicLayer;

use crate::middleware::{self, CorsPolicy};
use crate::{api, health};

pub fn build(catalog: Arc<CatalogService>, server: &ServerConfig) -> Router {
    let routes = Router::new()
        .merge(api::router(Arc::clone(&catalog)))
        .merge(health::router(catalog));

    with_layers(routes, CorsPolicy::new(server.cors_allowed_origins.clone()))
}

/// Unmatched paths and methods answer 404; panics answer 500.
pub fn with_layers(routes: Router, cors: CorsPolicy) -> Router {
    routes
        .fallback(api::route_not_found)
        .method_not_allowed_fallback(api::route_not_found)
        .layer(CatchPanicLayer::custom(middleware::panic_response))
        .layer(from_fn_with_state(cors, middleware::cors))
        .layer(from_fn(middleware::log_requests))
}
