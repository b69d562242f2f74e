//! Tamagotchi engine service: state reads, feeding, renaming.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::error::Error;
use super::ports::{FeedOutcome, TamagotchiStore, TamagotchiStoreError};
use super::tamagotchi::{self, Tamagotchi};

#[derive(Clone)]
pub struct TamagotchiService {
    store: Arc<dyn TamagotchiStore>,
}

impl TamagotchiService {
    pub fn new(store: Arc<dyn TamagotchiStore>) -> Self {
        Self { store }
    }

    pub async fn get(&self, user_id: Uuid) -> Result<Tamagotchi, Error> {
        self.store
            .find_by_user(user_id)
            .await
            .map_err(map_tamagotchi_store_error)?
            .ok_or_else(|| Error::not_found("tamagotchi not found"))
    }

    /// Feed the pet one unit of the given food.
    ///
    /// The store consumes the inventory unit, applies the vitals transition,
    /// and advances any active care mission in one transaction.
    pub async fn feed(&self, user_id: Uuid, food_id: Uuid) -> Result<FeedOutcome, Error> {
        let now = Utc::now();
        self.store
            .feed(user_id, food_id, now.date_naive(), now)
            .await
            .map_err(map_tamagotchi_store_error)
    }

    pub async fn rename(&self, user_id: Uuid, name: &str) -> Result<Tamagotchi, Error> {
        let name = tamagotchi::validate_name(name)?;
        self.store
            .rename(user_id, name, Utc::now())
            .await
            .map_err(map_tamagotchi_store_error)
    }
}

fn map_tamagotchi_store_error(error: TamagotchiStoreError) -> Error {
    match error {
        TamagotchiStoreError::TamagotchiNotFound => Error::not_found("tamagotchi not found"),
        TamagotchiStoreError::FoodNotFound => Error::not_found("food not found"),
        TamagotchiStoreError::NotOwned => Error::forbidden("food is not in the inventory"),
        TamagotchiStoreError::Conflict { message } => Error::conflict(message),
        TamagotchiStoreError::Connection { message } => {
            Error::service_unavailable(format!("tamagotchi store unavailable: {message}"))
        }
        TamagotchiStoreError::Query { message } => {
            Error::internal(format!("tamagotchi store error: {message}"))
        }
    }
}
