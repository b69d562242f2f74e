//! Port for catalog reads, inventory, and the purchase transaction.

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::catalog::{Character, Food, InventoryEntry, ItemKind, ShopItem};

use super::macros::port_error;

port_error! {
    /// Errors raised by shop store adapters.
    pub enum ShopStoreError {
        /// The item does not exist in the catalog.
        ItemNotFound => "item not found",
        /// No inventory entry for the item.
        NotInInventory => "item is not in the inventory",
        /// The balance does not cover the purchase.
        InsufficientFunds { message } => "{message}",
        /// The inventory does not hold enough of the item.
        InsufficientQuantity { message } => "{message}",
        /// A concurrent update won the race after the retry.
        Conflict { message } => "shop update conflicted: {message}",
        /// Repository connection could not be established.
        Connection { message } => "shop store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message } => "shop store query failed: {message}",
    }
}

/// Result of a successful purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseReceipt {
    pub item: ShopItem,
    pub new_balance: Decimal,
}

/// Port for the catalog, per-user inventory, and purchases.
///
/// `purchase` runs the debit, ledger append, and inventory upsert in one
/// transaction: food stacks increment, character ownership is binary.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShopStore: Send + Sync {
    /// Full character catalog, price ascending then name.
    async fn list_characters(&self) -> Result<Vec<Character>, ShopStoreError>;

    /// Characters eligible as the first tamagotchi.
    async fn list_starter_characters(&self) -> Result<Vec<Character>, ShopStoreError>;

    /// Full food catalog, price ascending then name.
    async fn list_foods(&self) -> Result<Vec<Food>, ShopStoreError>;

    /// The caller's inventory entries.
    async fn inventory(&self, user_id: Uuid) -> Result<Vec<InventoryEntry>, ShopStoreError>;

    /// Buy one unit of the item.
    async fn purchase(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        kind: ItemKind,
    ) -> Result<PurchaseReceipt, ShopStoreError>;

    /// Whether the user owns at least one unit of the item.
    async fn owns(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        kind: ItemKind,
    ) -> Result<bool, ShopStoreError>;

    /// Remove `quantity` units, deleting the entry when it reaches zero.
    async fn consume(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        kind: ItemKind,
        quantity: i32,
    ) -> Result<(), ShopStoreError>;
}
