//! PostgreSQL-backed `ShopStore` implementation using Diesel.
//!
//! The purchase transaction reads the item's price, debits the wallet (with
//! its ledger row), and upserts the inventory entry; any failure rolls the
//! whole purchase back.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::catalog::{Character, Food, InventoryEntry, ItemKind, ShopItem};
use crate::domain::ports::{PurchaseReceipt, ShopStore, ShopStoreError};
use crate::domain::wallet::TransactionKind;

use super::diesel_profile_store::character_from_row;
use super::error_mapping::{classify_tx, TxError, TxErrorClass};
use super::inventory_ops;
use super::models::{CharacterRow, FoodRow, InventoryRow};
use super::pool::DbPool;
use super::schema::{characters, foods, user_inventory};
use super::wallet_ops;

#[derive(Clone)]
pub struct DieselShopStore {
    pool: DbPool,
}

impl DieselShopStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn run_purchase(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        kind: ItemKind,
    ) -> Result<PurchaseReceipt, TxError> {
        let mut conn = self.pool.get().await?;
        let now = Utc::now();
        conn.transaction(|conn| {
            async move {
                let item = load_item(conn, item_id, kind).await?;

                let wallet = wallet_ops::debit_in_tx(
                    conn,
                    user_id,
                    item.price(),
                    TransactionKind::ShopPurchase,
                    Some(format!("Purchased {}", item.name())),
                    now,
                )
                .await?;

                inventory_ops::add_item_in_tx(conn, user_id, kind, item_id, 1).await?;

                Ok(PurchaseReceipt {
                    item,
                    new_balance: wallet.balance,
                })
            }
            .scope_boxed()
        })
        .await
    }
}

async fn load_item(
    conn: &mut AsyncPgConnection,
    item_id: Uuid,
    kind: ItemKind,
) -> Result<ShopItem, TxError> {
    match kind {
        ItemKind::Character => {
            let row: Option<CharacterRow> = characters::table
                .filter(characters::id.eq(item_id))
                .select(CharacterRow::as_select())
                .first(conn)
                .await
                .optional()?;
            row.map(character_from_row)
                .map(ShopItem::Character)
                .ok_or(TxError::Missing("item"))
        }
        ItemKind::Food => {
            let row: Option<FoodRow> = foods::table
                .filter(foods::id.eq(item_id))
                .select(FoodRow::as_select())
                .first(conn)
                .await
                .optional()?;
            row.map(food_from_row)
                .map(ShopItem::Food)
                .ok_or(TxError::Missing("item"))
        }
    }
}

pub(crate) fn food_from_row(row: FoodRow) -> Food {
    Food {
        id: row.id,
        name: row.name,
        nutrition_value: row.nutrition_value,
        price: row.price,
        image_url: row.image_url,
    }
}

fn map_tx_error(error: TxError) -> ShopStoreError {
    match error {
        TxError::Missing("item") => ShopStoreError::item_not_found(),
        TxError::Missing("inventory entry") => ShopStoreError::not_in_inventory(),
        TxError::InsufficientFunds { .. } => ShopStoreError::insufficient_funds(error.to_string()),
        TxError::InsufficientQuantity { .. } => {
            ShopStoreError::insufficient_quantity(error.to_string())
        }
        other => match classify_tx(other) {
            TxErrorClass::Connection(message) => ShopStoreError::connection(message),
            TxErrorClass::Conflict(message) => ShopStoreError::conflict(message),
            TxErrorClass::Query(message) => ShopStoreError::query(message),
        },
    }
}

#[async_trait]
impl ShopStore for DieselShopStore {
    async fn list_characters(&self) -> Result<Vec<Character>, ShopStoreError> {
        let rows: Result<Vec<CharacterRow>, TxError> = async {
            let mut conn = self.pool.get().await?;
            Ok(characters::table
                .order((characters::price.asc(), characters::name.asc()))
                .select(CharacterRow::as_select())
                .load(&mut conn)
                .await?)
        }
        .await;
        Ok(rows
            .map_err(map_tx_error)?
            .into_iter()
            .map(character_from_row)
            .collect())
    }

    async fn list_starter_characters(&self) -> Result<Vec<Character>, ShopStoreError> {
        let rows: Result<Vec<CharacterRow>, TxError> = async {
            let mut conn = self.pool.get().await?;
            Ok(characters::table
                .filter(characters::is_starter.eq(true))
                .order(characters::name.asc())
                .select(CharacterRow::as_select())
                .load(&mut conn)
                .await?)
        }
        .await;
        Ok(rows
            .map_err(map_tx_error)?
            .into_iter()
            .map(character_from_row)
            .collect())
    }

    async fn list_foods(&self) -> Result<Vec<Food>, ShopStoreError> {
        let rows: Result<Vec<FoodRow>, TxError> = async {
            let mut conn = self.pool.get().await?;
            Ok(foods::table
                .order((foods::price.asc(), foods::name.asc()))
                .select(FoodRow::as_select())
                .load(&mut conn)
                .await?)
        }
        .await;
        Ok(rows
            .map_err(map_tx_error)?
            .into_iter()
            .map(food_from_row)
            .collect())
    }

    async fn inventory(&self, user_id: Uuid) -> Result<Vec<InventoryEntry>, ShopStoreError> {
        let rows: Result<Vec<InventoryRow>, TxError> = async {
            let mut conn = self.pool.get().await?;
            Ok(user_inventory::table
                .filter(user_inventory::user_id.eq(user_id))
                .order(user_inventory::acquired_at.desc())
                .select(InventoryRow::as_select())
                .load(&mut conn)
                .await?)
        }
        .await;

        rows.map_err(map_tx_error)?
            .into_iter()
            .map(|row| inventory_ops::inventory_from_row(row).map_err(map_tx_error))
            .collect()
    }

    async fn purchase(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        kind: ItemKind,
    ) -> Result<PurchaseReceipt, ShopStoreError> {
        let first = self.run_purchase(user_id, item_id, kind).await;
        match first {
            Err(error) if error.is_serialization_failure() => self
                .run_purchase(user_id, item_id, kind)
                .await
                .map_err(map_tx_error),
            other => other.map_err(map_tx_error),
        }
    }

    async fn owns(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        kind: ItemKind,
    ) -> Result<bool, ShopStoreError> {
        let row: Result<Option<InventoryRow>, TxError> = async {
            let mut conn = self.pool.get().await?;
            Ok(user_inventory::table
                .filter(
                    user_inventory::user_id
                        .eq(user_id)
                        .and(user_inventory::item_type.eq(kind.as_str()))
                        .and(user_inventory::item_id.eq(item_id)),
                )
                .select(InventoryRow::as_select())
                .first(&mut conn)
                .await
                .optional()?)
        }
        .await;
        Ok(row.map_err(map_tx_error)?.is_some())
    }

    async fn consume(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        kind: ItemKind,
        quantity: i32,
    ) -> Result<(), ShopStoreError> {
        let result: Result<(), TxError> = async {
            let mut conn = self.pool.get().await?;
            conn.transaction(|conn| {
                async move {
                    inventory_ops::consume_in_tx(conn, user_id, kind, item_id, quantity).await
                }
                .scope_boxed()
            })
            .await
        }
        .await;
        result.map_err(map_tx_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    fn missing_item_maps_to_item_not_found() {
        assert_eq!(
            map_tx_error(TxError::Missing("item")),
            ShopStoreError::item_not_found()
        );
    }

    #[rstest]
    fn missing_inventory_maps_to_not_in_inventory() {
        assert_eq!(
            map_tx_error(TxError::Missing("inventory entry")),
            ShopStoreError::not_in_inventory()
        );
    }

    #[rstest]
    fn short_stacks_map_to_insufficient_quantity() {
        let err = map_tx_error(TxError::InsufficientQuantity { have: 1, need: 2 });
        assert!(matches!(err, ShopStoreError::InsufficientQuantity { .. }));
    }

    #[rstest]
    fn failed_debits_map_to_insufficient_funds() {
        let err = map_tx_error(TxError::InsufficientFunds {
            balance: dec!(10),
            amount: dec!(15),
        });
        assert!(matches!(err, ShopStoreError::InsufficientFunds { .. }));
    }
}
