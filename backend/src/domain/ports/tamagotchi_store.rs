//! Port for tamagotchi reads and the feed transaction.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::tamagotchi::{Tamagotchi, Vitals};

use super::macros::port_error;
use super::mission_store::MissionOutcome;

port_error! {
    /// Errors raised by tamagotchi store adapters.
    pub enum TamagotchiStoreError {
        /// The user has no tamagotchi yet.
        TamagotchiNotFound => "tamagotchi not found",
        /// The food does not exist in the catalog.
        FoodNotFound => "food not found",
        /// The food is not in the user's inventory.
        NotOwned => "food is not in the inventory",
        /// A concurrent update won the race after the retry.
        Conflict { message } => "tamagotchi update conflicted: {message}",
        /// Repository connection could not be established.
        Connection { message } => "tamagotchi store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message } => "tamagotchi store query failed: {message}",
    }
}

/// Result of one feed: the new stat triple plus any mission side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedOutcome {
    pub vitals: Vitals,
    pub mission: Option<MissionOutcome>,
}

/// Port for the pet row and the feed transaction.
///
/// `feed` loads the pet and food, checks ownership, applies the vitals
/// transition, consumes one unit of inventory, and advances any active
/// care mission, all in one transaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TamagotchiStore: Send + Sync {
    async fn find_by_user(&self, user_id: Uuid)
        -> Result<Option<Tamagotchi>, TamagotchiStoreError>;

    async fn feed(
        &self,
        user_id: Uuid,
        food_id: Uuid,
        day: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<FeedOutcome, TamagotchiStoreError>;

    async fn rename(
        &self,
        user_id: Uuid,
        name: String,
        now: DateTime<Utc>,
    ) -> Result<Tamagotchi, TamagotchiStoreError>;
}
