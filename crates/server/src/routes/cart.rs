use std::sync::Arc;

use axum::{extract::{Path, State}, Json};
use models::{Cart, ProductId};
use serde::Deserialize;
use service::cart::{CartStore, UpdateProductAmount};

use crate::errors::JsonApiError;

#[derive(Debug, Deserialize)]
pub struct AmountBody {
    pub amount: i64,
}

/// 当前购物车内容
pub async fn get_cart(State(cart): State<Arc<CartStore>>) -> Json<Cart> {
    Json(cart.cart().await)
}

/// 添加一件商品
pub async fn add_item(
    State(cart): State<Arc<CartStore>>,
    Path(id): Path<ProductId>,
) -> Result<Json<Cart>, JsonApiError> {
    Ok(Json(cart.add_product(id).await?))
}

/// 修改商品数量
pub async fn update_item(
    State(cart): State<Arc<CartStore>>,
    Path(id): Path<ProductId>,
    Json(body): Json<AmountBody>,
) -> Result<Json<Cart>, JsonApiError> {
    let input = UpdateProductAmount { product_id: id, amount: body.amount };
    Ok(Json(cart.update_product_amount(input).await?))
}

/// 移除商品
pub async fn remove_item(
    State(cart): State<Arc<CartStore>>,
    Path(id): Path<ProductId>,
) -> Result<Json<Cart>, JsonApiError> {
    Ok(Json(cart.remove_product(id).await?))
}
