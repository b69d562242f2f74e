//! Shop engine service: catalog reads, inventory, purchase, consumption.

use std::sync::Arc;

use uuid::Uuid;

use super::catalog::{Character, Food, InventoryEntry, ItemKind};
use super::error::Error;
use super::ports::{PurchaseReceipt, ShopStore, ShopStoreError};

#[derive(Clone)]
pub struct ShopService {
    store: Arc<dyn ShopStore>,
}

impl ShopService {
    pub fn new(store: Arc<dyn ShopStore>) -> Self {
        Self { store }
    }

    pub async fn list_characters(&self) -> Result<Vec<Character>, Error> {
        self.store
            .list_characters()
            .await
            .map_err(map_shop_store_error)
    }

    pub async fn list_starter_characters(&self) -> Result<Vec<Character>, Error> {
        self.store
            .list_starter_characters()
            .await
            .map_err(map_shop_store_error)
    }

    pub async fn list_foods(&self) -> Result<Vec<Food>, Error> {
        self.store.list_foods().await.map_err(map_shop_store_error)
    }

    pub async fn inventory(&self, user_id: Uuid) -> Result<Vec<InventoryEntry>, Error> {
        self.store
            .inventory(user_id)
            .await
            .map_err(map_shop_store_error)
    }

    /// Buy one unit of an item. The debit, ledger append, and inventory
    /// upsert commit or roll back together in the store.
    pub async fn purchase(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        kind: ItemKind,
    ) -> Result<PurchaseReceipt, Error> {
        self.store
            .purchase(user_id, item_id, kind)
            .await
            .map_err(map_shop_store_error)
    }

    pub async fn owns(&self, user_id: Uuid, item_id: Uuid, kind: ItemKind) -> Result<bool, Error> {
        self.store
            .owns(user_id, item_id, kind)
            .await
            .map_err(map_shop_store_error)
    }

    pub async fn consume(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        kind: ItemKind,
        quantity: i32,
    ) -> Result<(), Error> {
        if quantity < 1 {
            return Err(Error::validation_field("quantity", "must be at least 1"));
        }
        self.store
            .consume(user_id, item_id, kind, quantity)
            .await
            .map_err(map_shop_store_error)
    }
}

fn map_shop_store_error(error: ShopStoreError) -> Error {
    match error {
        ShopStoreError::ItemNotFound => Error::not_found("item not found"),
        ShopStoreError::NotInInventory => Error::not_found("item is not in the inventory"),
        ShopStoreError::InsufficientFunds { message } => Error::insufficient_funds(message),
        ShopStoreError::InsufficientQuantity { message } => Error::insufficient_quantity(message),
        ShopStoreError::Conflict { message } => Error::conflict(message),
        ShopStoreError::Connection { message } => {
            Error::service_unavailable(format!("shop store unavailable: {message}"))
        }
        ShopStoreError::Query { message } => Error::internal(format!("shop store error: {message}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::ShopItem;
    use crate::domain::error::ErrorCode;
    use crate::domain::ports::fixtures::{
        FixtureShopStore, FIXTURE_FOOD_ID, FIXTURE_USER_ID,
    };
    use crate::domain::ports::shop_store::MockShopStore;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn service() -> ShopService {
        ShopService::new(Arc::new(FixtureShopStore))
    }

    #[rstest]
    #[tokio::test]
    async fn purchase_returns_item_and_new_balance() {
        let receipt = service()
            .purchase(FIXTURE_USER_ID, FIXTURE_FOOD_ID, ItemKind::Food)
            .await
            .expect("buys");
        assert_eq!(receipt.new_balance, dec!(45.00));
        assert!(matches!(receipt.item, ShopItem::Food(_)));
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_item_maps_to_not_found() {
        let err = service()
            .purchase(FIXTURE_USER_ID, Uuid::new_v4(), ItemKind::Food)
            .await
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn insufficient_quantity_keeps_its_kind() {
        let mut store = MockShopStore::new();
        store.expect_consume().returning(|_, _, _, _| {
            Err(ShopStoreError::insufficient_quantity(
                "only 1 unit in the inventory",
            ))
        });
        let service = ShopService::new(Arc::new(store));

        let err = service
            .consume(FIXTURE_USER_ID, FIXTURE_FOOD_ID, ItemKind::Food, 2)
            .await
            .expect_err("short");
        assert_eq!(err.code(), ErrorCode::InsufficientQuantity);
    }

    #[rstest]
    #[tokio::test]
    async fn consume_rejects_non_positive_quantities() {
        let err = service()
            .consume(FIXTURE_USER_ID, FIXTURE_FOOD_ID, ItemKind::Food, 0)
            .await
            .expect_err("invalid");
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }
}
