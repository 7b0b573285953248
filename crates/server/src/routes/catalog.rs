//! json-server style read-only catalog, served from the fixture file.

use std::sync::Arc;

use axum::{extract::{Path, State}, http::StatusCode, Json};
use models::{CatalogProduct, ProductId, Stock};
use service::catalog::FileCatalog;

pub async fn list_products(State(catalog): State<Arc<FileCatalog>>) -> Json<Vec<CatalogProduct>> {
    Json(catalog.products().to_vec())
}

pub async fn get_product(
    State(catalog): State<Arc<FileCatalog>>,
    Path(id): Path<ProductId>,
) -> Result<Json<CatalogProduct>, StatusCode> {
    match catalog.product(id) {
        Some(p) => Ok(Json(p.clone())),
        None => Err(StatusCode::NOT_FOUND),
    }
}

pub async fn get_stock(
    State(catalog): State<Arc<FileCatalog>>,
    Path(id): Path<ProductId>,
) -> Result<Json<Stock>, StatusCode> {
    catalog.stock(id).map(Json).ok_or(StatusCode::NOT_FOUND)
}
