pub mod cart;
pub mod catalog;

use axum::{http::StatusCode, routing::{get, post}, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;

use common::types::Health;

use crate::state::AppState;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics() -> (StatusCode, String) {
    match service::metrics::gather_text() {
        Ok(text) => (StatusCode::OK, text),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

/// Build the application router: health, metrics, the cart API and, when
/// configured, the local catalog.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics));

    let cart_routes = Router::new()
        .route("/api/cart", get(cart::get_cart))
        .route(
            "/api/cart/items/:id",
            post(cart::add_item).put(cart::update_item).delete(cart::remove_item),
        )
        .with_state(state.cart.clone());

    let mut router = public.merge(cart_routes);
    if let Some(local) = state.local_catalog {
        let catalog_routes = Router::new()
            .route("/products", get(catalog::list_products))
            .route("/products/:id", get(catalog::get_product))
            .route("/stock/:id", get(catalog::get_stock))
            .with_state(local);
        router = router.merge(catalog_routes);
    }

    router
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::DEBUG),
                )
                // 响应返回时打点，包含状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
