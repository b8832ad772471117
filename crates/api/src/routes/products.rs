//! Product catalog endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use domain::{Money, Product};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub price_cents: i64,
    pub available_amount: u32,
}

#[derive(Serialize)]
pub struct ProductResponse {
    pub name: String,
    pub price_cents: i64,
    pub available_amount: u32,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name().to_string(),
            price_cents: product.price().cents(),
            available_amount: product.available_amount(),
        }
    }
}

/// GET /products: list the catalog, sorted by name.
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<ProductResponse>> {
    let mut products: Vec<ProductResponse> = state
        .catalog
        .read()
        .await
        .values()
        .map(|p| ProductResponse::from(p.as_ref()))
        .collect();
    products.sort_by(|a, b| a.name.cmp(&b.name));
    Json(products)
}

/// POST /products: add a product with its initial stock.
#[tracing::instrument(skip(state, req), fields(name = %req.name))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let product = Product::new(
        req.name,
        Money::from_cents(req.price_cents),
        req.available_amount,
    )?;
    let response = ProductResponse::from(&product);

    if !state.add_product(product).await {
        return Err(ApiError::Conflict(format!(
            "Product {} already exists",
            response.name
        )));
    }

    tracing::info!(price_cents = response.price_cents, stock = response.available_amount, "product added");
    Ok((StatusCode::CREATED, Json(response)))
}
