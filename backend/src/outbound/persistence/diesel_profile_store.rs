//! PostgreSQL-backed `ProfileStore` implementation using Diesel.
//!
//! The starter-selection transaction bootstraps the player: it creates the
//! tamagotchi, flips the onboarding flag, and seeds the starting inventory
//! as one atomic write.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use uuid::Uuid;

use crate::domain::catalog::{Character, ItemKind};
use crate::domain::ports::{
    OnboardingError, ProfileStore, ProfileStoreError, StarterSelection,
};
use crate::domain::profile::{Profile, ProfileDraft};
use crate::domain::tamagotchi::{Tamagotchi, Vitals};

use super::error_mapping::{classify_tx, map_diesel_error, map_pool_error, TxError, TxErrorClass};
use super::inventory_ops;
use super::models::{
    CharacterRow, FoodRow, NewProfileRow, NewTamagotchiRow, ProfileRow, TamagotchiRow,
};
use super::pool::DbPool;
use super::schema::{characters, foods, profiles, tamagotchis};

/// Units of the cheapest food granted when onboarding completes.
const STARTER_FOOD_QUANTITY: i32 = 10;

#[derive(Clone)]
pub struct DieselProfileStore {
    pool: DbPool,
}

impl DieselProfileStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn profile_from_row(row: ProfileRow) -> Profile {
    Profile {
        id: row.id,
        user_id: row.user_id,
        age: row.age,
        allowance: row.allowance,
        currency: row.currency,
        onboarding_completed: row.onboarding_completed,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

pub(crate) fn character_from_row(row: CharacterRow) -> Character {
    Character {
        id: row.id,
        name: row.name,
        image_url: row.image_url,
        is_starter: row.is_starter,
        price: row.price,
    }
}

pub(crate) fn tamagotchi_from_row(row: TamagotchiRow) -> Result<Tamagotchi, TxError> {
    let vitals = Vitals::try_new(row.hunger, row.happiness, row.health)
        .map_err(|err| TxError::corrupt(format!("tamagotchi {}: {err}", row.id)))?;
    Ok(Tamagotchi {
        id: row.id,
        user_id: row.user_id,
        character_id: row.character_id,
        name: row.name,
        vitals,
        last_fed_at: row.last_fed_at,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn map_onboarding_tx_error(error: TxError) -> OnboardingError {
    match error {
        TxError::Missing("character") => OnboardingError::character_not_found(),
        TxError::Missing("profile") => OnboardingError::profile_not_found(),
        TxError::NotStarter => OnboardingError::not_starter(),
        TxError::TamagotchiExists => OnboardingError::tamagotchi_exists(),
        other => match classify_tx(other) {
            TxErrorClass::Connection(message) => OnboardingError::connection(message),
            // A unique-violation race on the tamagotchi insert means another
            // request chose the starter first.
            TxErrorClass::Conflict(_) => OnboardingError::tamagotchi_exists(),
            TxErrorClass::Query(message) => OnboardingError::query(message),
        },
    }
}

#[async_trait]
impl ProfileStore for DieselProfileStore {
    async fn create_profile(
        &self,
        user_id: Uuid,
        draft: ProfileDraft,
    ) -> Result<Profile, ProfileStoreError> {
        use diesel::result::{DatabaseErrorKind, Error as DieselError};

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ProfileStoreError::connection))?;

        let row: ProfileRow = diesel::insert_into(profiles::table)
            .values(NewProfileRow {
                id: Uuid::new_v4(),
                user_id,
                age: draft.age,
                allowance: draft.allowance,
                currency: draft.currency,
                onboarding_completed: false,
            })
            .returning(ProfileRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| match err {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    ProfileStoreError::already_exists()
                }
                other => map_diesel_error(
                    other,
                    ProfileStoreError::query,
                    ProfileStoreError::connection,
                ),
            })?;
        Ok(profile_from_row(row))
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Profile>, ProfileStoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ProfileStoreError::connection))?;

        let row: Option<ProfileRow> = profiles::table
            .filter(profiles::user_id.eq(user_id))
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| {
                map_diesel_error(err, ProfileStoreError::query, ProfileStoreError::connection)
            })?;
        Ok(row.map(profile_from_row))
    }

    async fn choose_starter(
        &self,
        user_id: Uuid,
        character_id: Uuid,
    ) -> Result<StarterSelection, OnboardingError> {
        let result: Result<StarterSelection, TxError> = async {
            let mut conn = self.pool.get().await?;
            let now = Utc::now();
            conn.transaction(|conn| {
                async move {
                    let character: Option<CharacterRow> = characters::table
                        .filter(characters::id.eq(character_id))
                        .select(CharacterRow::as_select())
                        .first(conn)
                        .await
                        .optional()?;
                    let character =
                        character_from_row(character.ok_or(TxError::Missing("character"))?);
                    if !character.is_starter {
                        return Err(TxError::NotStarter);
                    }

                    let existing: Option<TamagotchiRow> = tamagotchis::table
                        .filter(tamagotchis::user_id.eq(user_id))
                        .select(TamagotchiRow::as_select())
                        .first(conn)
                        .await
                        .optional()?;
                    if existing.is_some() {
                        return Err(TxError::TamagotchiExists);
                    }

                    let flipped = diesel::update(
                        profiles::table.filter(profiles::user_id.eq(user_id)),
                    )
                    .set((
                        profiles::onboarding_completed.eq(true),
                        profiles::updated_at.eq(now),
                    ))
                    .execute(conn)
                    .await?;
                    if flipped == 0 {
                        return Err(TxError::Missing("profile"));
                    }

                    let vitals = Vitals::initial();
                    let pet: TamagotchiRow = diesel::insert_into(tamagotchis::table)
                        .values(NewTamagotchiRow {
                            id: Uuid::new_v4(),
                            user_id,
                            character_id,
                            name: character.name.clone(),
                            hunger: vitals.hunger(),
                            happiness: vitals.happiness(),
                            health: vitals.health(),
                        })
                        .returning(TamagotchiRow::as_returning())
                        .get_result(conn)
                        .await?;

                    // Seed the starting rations from the cheapest catalog food.
                    let starter_food: Option<FoodRow> = foods::table
                        .order((foods::price.asc(), foods::name.asc()))
                        .select(FoodRow::as_select())
                        .first(conn)
                        .await
                        .optional()?;
                    if let Some(food) = starter_food {
                        inventory_ops::add_item_in_tx(
                            conn,
                            user_id,
                            ItemKind::Food,
                            food.id,
                            STARTER_FOOD_QUANTITY,
                        )
                        .await?;
                    }

                    Ok(StarterSelection {
                        tamagotchi: tamagotchi_from_row(pet)?,
                        character,
                    })
                }
                .scope_boxed()
            })
            .await
        }
        .await;

        result.map_err(map_onboarding_tx_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn missing_character_maps_to_character_not_found() {
        assert_eq!(
            map_onboarding_tx_error(TxError::Missing("character")),
            OnboardingError::character_not_found()
        );
    }

    #[rstest]
    fn non_starter_maps_to_not_starter() {
        assert_eq!(
            map_onboarding_tx_error(TxError::NotStarter),
            OnboardingError::not_starter()
        );
    }

    #[rstest]
    fn tamagotchi_unique_race_maps_to_tamagotchi_exists() {
        let race = TxError::from(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            Box::new("tamagotchis_user_id_key".to_owned()),
        ));
        assert_eq!(
            map_onboarding_tx_error(race),
            OnboardingError::tamagotchi_exists()
        );
    }

    #[rstest]
    fn corrupt_rows_map_to_query_errors() {
        let err = map_onboarding_tx_error(TxError::corrupt("tamagotchi 1: hunger 400"));
        assert!(matches!(err, OnboardingError::Query { .. }));
    }
}
