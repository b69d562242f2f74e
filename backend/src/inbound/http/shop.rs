//! Shop endpoints.
//!
//! ```text
//! GET  /api/shop/characters
//! GET  /api/shop/foods
//! GET  /api/shop/inventory
//! POST /api/shop/buy
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::catalog::ItemKind;
use crate::domain::Error;
use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::schemas::{
    money, CharacterBody, FoodBody, InventoryEntryBody, ShopItemBody,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_uuid;
use crate::inbound::http::ApiResult;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterListBody {
    pub characters: Vec<CharacterBody>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodListBody {
    pub foods: Vec<FoodBody>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryBody {
    pub inventory: Vec<InventoryEntryBody>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyRequest {
    pub item_id: String,
    pub item_type: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyResponseBody {
    pub success: bool,
    pub new_balance: f64,
    pub item: ShopItemBody,
}

#[get("/shop/characters")]
pub async fn list_characters(
    state: web::Data<HttpState>,
    _auth: AuthContext,
) -> ApiResult<web::Json<CharacterListBody>> {
    let characters = state.shop.list_characters().await?;
    Ok(web::Json(CharacterListBody {
        characters: characters.into_iter().map(CharacterBody::from).collect(),
    }))
}

#[get("/shop/foods")]
pub async fn list_foods(
    state: web::Data<HttpState>,
    _auth: AuthContext,
) -> ApiResult<web::Json<FoodListBody>> {
    let foods = state.shop.list_foods().await?;
    Ok(web::Json(FoodListBody {
        foods: foods.into_iter().map(FoodBody::from).collect(),
    }))
}

#[get("/shop/inventory")]
pub async fn inventory(
    state: web::Data<HttpState>,
    auth: AuthContext,
) -> ApiResult<web::Json<InventoryBody>> {
    let entries = state.shop.inventory(auth.user_id()).await?;
    Ok(web::Json(InventoryBody {
        inventory: entries.into_iter().map(InventoryEntryBody::from).collect(),
    }))
}

/// Buy one unit of an item; the debit and inventory grant are atomic.
#[post("/shop/buy")]
pub async fn buy(
    state: web::Data<HttpState>,
    auth: AuthContext,
    payload: web::Json<BuyRequest>,
) -> ApiResult<web::Json<BuyResponseBody>> {
    let item_id = parse_uuid(&payload.item_id, "itemId")?;
    let kind: ItemKind = payload
        .item_type
        .parse()
        .map_err(|err: crate::domain::catalog::UnknownItemKind| {
            Error::validation_field("itemType", err.to_string())
        })?;

    let receipt = state.shop.purchase(auth.user_id(), item_id, kind).await?;
    Ok(web::Json(BuyResponseBody {
        success: true,
        new_balance: money(receipt.new_balance),
        item: ShopItemBody::from(receipt.item),
    }))
}
