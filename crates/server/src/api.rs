//! Product REST routes.
//!
//! - `POST   /api/products`      — create a product (201)
//! - `GET    /api/products`      — list all products in insertion order
//! - `GET    /api/products/{id}` — fetch one product
//! - `PATCH  /api/products/{id}` — partial update
//! - `DELETE /api/products/{id}` — remove a product (204)

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use catalog_core::{
    ApplicationError, CatalogError, CatalogService, Product, ProductId, ProductInput,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::middleware::REQUEST_ID_HEADER;

#[derive(Clone)]
pub struct ApiState {
    catalog: Arc<CatalogService>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorBody>);
pub type ApiResult<T> = Result<T, ApiError>;

pub fn router(catalog: Arc<CatalogService>) -> Router {
    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route(
            "/api/products/{id}",
            get(get_product).patch(update_product).delete(delete_product),
        )
        .with_state(ApiState { catalog })
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorBody { error: message.into() }))
}

pub async fn route_not_found() -> ApiError {
    error_response(StatusCode::NOT_FOUND, "route not found")
}

async fn create_product(
    State(state): State<ApiState>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let correlation_id = correlation_id(&headers);
    let input = parse_input(payload, &correlation_id)?;

    let product =
        state.catalog.create(input).await.map_err(|error| reject(error, &correlation_id))?;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn list_products(State(state): State<ApiState>) -> Json<Vec<Product>> {
    Json(state.catalog.list().await)
}

async fn get_product(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    let product = state
        .catalog
        .get(&ProductId(id))
        .await
        .map_err(|error| reject(error, &correlation_id(&headers)))?;
    Ok(Json(product))
}

async fn update_product(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Product>> {
    let correlation_id = correlation_id(&headers);
    let product_id = ProductId(id);

    // An unknown id is a 404 even when the body is unusable.
    if let Err(error) = state.catalog.get(&product_id).await {
        return Err(reject(error, &correlation_id));
    }
    let input = parse_input(payload, &correlation_id)?;

    let product = state
        .catalog
        .update(&product_id, input)
        .await
        .map_err(|error| reject(error, &correlation_id))?;
    Ok(Json(product))
}

async fn delete_product(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .catalog
        .delete(&ProductId(id))
        .await
        .map_err(|error| reject(error, &correlation_id(&headers)))?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_input(
    payload: Result<Json<Value>, JsonRejection>,
    correlation_id: &str,
) -> ApiResult<ProductInput> {
    let Json(body) = payload.map_err(|rejection| {
        warn!(
            event_name = "api.request.malformed",
            correlation_id = %correlation_id,
            error = %rejection,
            "request body rejected"
        );
        error_response(StatusCode::BAD_REQUEST, rejection.body_text())
    })?;

    debug!(
        event_name = "api.request.payload",
        correlation_id = %correlation_id,
        payload = %body,
        "request payload received"
    );
    ProductInput::from_json(body).map_err(|error| reject(error, correlation_id))
}

fn reject(error: CatalogError, correlation_id: &str) -> ApiError {
    let interface = ApplicationError::from(error).into_interface(correlation_id);
    let status = StatusCode::from_u16(interface.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if status.is_server_error() {
        error!(
            event_name = "api.product.failed",
            correlation_id = %interface.correlation_id(),
            error = %interface,
            "catalog operation failed"
        );
        return error_response(status, interface.user_message());
    }

    warn!(
        event_name = "api.product.rejected",
        correlation_id = %interface.correlation_id(),
        status = status.as_u16(),
        error = %interface,
        "catalog operation rejected"
    );
    error_response(status, interface.message())
}

fn correlation_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or("unassigned")
        .to_string()
}
