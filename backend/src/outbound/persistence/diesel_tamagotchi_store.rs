//! PostgreSQL-backed `TamagotchiStore` implementation using Diesel.
//!
//! The feed transaction locks the pet row, verifies ownership by consuming
//! the inventory unit, applies the vitals transition, and advances any
//! active care mission; everything commits or rolls back together.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use uuid::Uuid;

use crate::domain::catalog::ItemKind;
use crate::domain::mission::MissionEvent;
use crate::domain::ports::{FeedOutcome, TamagotchiStore, TamagotchiStoreError};
use crate::domain::tamagotchi::{Tamagotchi, Vitals};

use super::diesel_profile_store::tamagotchi_from_row;
use super::error_mapping::{classify_tx, TxError, TxErrorClass};
use super::inventory_ops;
use super::mission_ops;
use super::models::{FoodRow, TamagotchiFeedUpdate, TamagotchiRow};
use super::pool::DbPool;
use super::schema::{foods, tamagotchis};

#[derive(Clone)]
pub struct DieselTamagotchiStore {
    pool: DbPool,
}

impl DieselTamagotchiStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn run_feed(
        &self,
        user_id: Uuid,
        food_id: Uuid,
        day: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<FeedOutcome, TxError> {
        let mut conn = self.pool.get().await?;
        conn.transaction(|conn| {
            async move {
                let pet: Option<TamagotchiRow> = tamagotchis::table
                    .filter(tamagotchis::user_id.eq(user_id))
                    .select(TamagotchiRow::as_select())
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                let pet = pet.ok_or(TxError::Missing("tamagotchi"))?;
                let vitals = Vitals::try_new(pet.hunger, pet.happiness, pet.health)
                    .map_err(|err| TxError::corrupt(format!("tamagotchi {}: {err}", pet.id)))?;

                let food: Option<FoodRow> = foods::table
                    .filter(foods::id.eq(food_id))
                    .select(FoodRow::as_select())
                    .first(conn)
                    .await
                    .optional()?;
                let food = food.ok_or(TxError::Missing("food"))?;

                // Ownership check and consumption are the same guarded
                // decrement; a missing entry means the food is not owned.
                inventory_ops::consume_in_tx(conn, user_id, ItemKind::Food, food_id, 1)
                    .await
                    .map_err(|err| match err {
                        TxError::Missing("inventory entry")
                        | TxError::InsufficientQuantity { .. } => TxError::NotOwned,
                        other => other,
                    })?;

                let fed = vitals.feed(food.nutrition_value);
                diesel::update(tamagotchis::table.filter(tamagotchis::id.eq(pet.id)))
                    .set(TamagotchiFeedUpdate {
                        hunger: fed.hunger(),
                        happiness: fed.happiness(),
                        health: fed.health(),
                        last_fed_at: now,
                        updated_at: now,
                    })
                    .execute(conn)
                    .await?;

                let mission = mission_ops::apply_mission_event_in_tx(
                    conn,
                    user_id,
                    MissionEvent::TamagotchiFed,
                    day,
                    now,
                )
                .await?;

                Ok(FeedOutcome {
                    vitals: fed,
                    mission,
                })
            }
            .scope_boxed()
        })
        .await
    }
}

fn map_tx_error(error: TxError) -> TamagotchiStoreError {
    match error {
        TxError::Missing("tamagotchi") => TamagotchiStoreError::tamagotchi_not_found(),
        TxError::Missing("food") => TamagotchiStoreError::food_not_found(),
        TxError::NotOwned => TamagotchiStoreError::not_owned(),
        other => match classify_tx(other) {
            TxErrorClass::Connection(message) => TamagotchiStoreError::connection(message),
            TxErrorClass::Conflict(message) => TamagotchiStoreError::conflict(message),
            TxErrorClass::Query(message) => TamagotchiStoreError::query(message),
        },
    }
}

#[async_trait]
impl TamagotchiStore for DieselTamagotchiStore {
    async fn find_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<Tamagotchi>, TamagotchiStoreError> {
        let result: Result<Option<Tamagotchi>, TxError> = async {
            let mut conn = self.pool.get().await?;
            let row: Option<TamagotchiRow> = tamagotchis::table
                .filter(tamagotchis::user_id.eq(user_id))
                .select(TamagotchiRow::as_select())
                .first(&mut conn)
                .await
                .optional()?;
            row.map(tamagotchi_from_row).transpose()
        }
        .await;
        result.map_err(map_tx_error)
    }

    async fn feed(
        &self,
        user_id: Uuid,
        food_id: Uuid,
        day: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<FeedOutcome, TamagotchiStoreError> {
        let first = self.run_feed(user_id, food_id, day, now).await;
        match first {
            Err(error) if error.is_serialization_failure() => self
                .run_feed(user_id, food_id, day, now)
                .await
                .map_err(map_tx_error),
            other => other.map_err(map_tx_error),
        }
    }

    async fn rename(
        &self,
        user_id: Uuid,
        name: String,
        now: DateTime<Utc>,
    ) -> Result<Tamagotchi, TamagotchiStoreError> {
        let result: Result<Tamagotchi, TxError> = async {
            let mut conn = self.pool.get().await?;
            let row: Option<TamagotchiRow> = diesel::update(
                tamagotchis::table.filter(tamagotchis::user_id.eq(user_id)),
            )
            .set((tamagotchis::name.eq(name), tamagotchis::updated_at.eq(now)))
            .returning(TamagotchiRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?;
            tamagotchi_from_row(row.ok_or(TxError::Missing("tamagotchi"))?)
        }
        .await;
        result.map_err(map_tx_error)
    }
}
