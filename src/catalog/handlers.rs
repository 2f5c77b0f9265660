//! REST API handlers for browsing the catalog

use super::models::*;
use crate::cart::state::SharedState;
use crate::error::{AppError, Result};
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

/// Creates routes for catalog browsing
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/:id", get(get_product))
        .route("/shipping-options", get(list_shipping_options))
        .route("/payment-options", get(list_payment_options))
}

/// Endpoint: GET /products
async fn list_products(State(state): State<SharedState>) -> Json<Vec<Product>> {
    Json(state.catalog.products.clone())
}

/// Endpoint: GET /products/:id
async fn get_product(
    State(state): State<SharedState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    state
        .catalog
        .product(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// Endpoint: GET /shipping-options
async fn list_shipping_options(State(state): State<SharedState>) -> Json<Vec<ShippingOption>> {
    Json(state.catalog.shipping_options.clone())
}

/// Endpoint: GET /payment-options
async fn list_payment_options(State(state): State<SharedState>) -> Json<Vec<PaymentOption>> {
    Json(state.catalog.payment_options.clone())
}
