//! Profile and onboarding service.

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use super::catalog::Character;
use super::error::Error;
use super::ports::{
    OnboardingError, ProfileStore, ShopStore, ShopStoreError, StarterSelection,
};
use super::profile::{Profile, ProfileDraft};
use super::wallet_service::map_profile_store_error;

#[derive(Clone)]
pub struct ProfileService {
    profiles: Arc<dyn ProfileStore>,
    shop: Arc<dyn ShopStore>,
}

impl ProfileService {
    pub fn new(profiles: Arc<dyn ProfileStore>, shop: Arc<dyn ShopStore>) -> Self {
        Self { profiles, shop }
    }

    /// Create the caller's profile. One per user.
    pub async fn create_profile(
        &self,
        user_id: Uuid,
        age: i32,
        allowance: Decimal,
        currency: Option<&str>,
    ) -> Result<Profile, Error> {
        let draft = ProfileDraft::new(age, allowance, currency)?;
        self.profiles
            .create_profile(user_id, draft)
            .await
            .map_err(map_profile_store_error)
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<Profile, Error> {
        self.profiles
            .find_by_user(user_id)
            .await
            .map_err(map_profile_store_error)?
            .ok_or_else(|| Error::not_found("profile not found"))
    }

    /// Starter characters eligible for onboarding.
    pub async fn list_starter_characters(&self) -> Result<Vec<Character>, Error> {
        self.shop
            .list_starter_characters()
            .await
            .map_err(map_catalog_error)
    }

    /// Pick the starter character: creates the tamagotchi, completes
    /// onboarding, and seeds the starting inventory in one transaction.
    pub async fn choose_starter(
        &self,
        user_id: Uuid,
        character_id: Uuid,
    ) -> Result<StarterSelection, Error> {
        self.profiles
            .choose_starter(user_id, character_id)
            .await
            .map_err(map_onboarding_error)
    }
}

fn map_catalog_error(error: ShopStoreError) -> Error {
    match error {
        ShopStoreError::Connection { message } => {
            Error::service_unavailable(format!("catalog unavailable: {message}"))
        }
        other => Error::internal(format!("catalog error: {other}")),
    }
}

fn map_onboarding_error(error: OnboardingError) -> Error {
    match error {
        OnboardingError::CharacterNotFound => Error::not_found("character not found"),
        OnboardingError::NotStarter => {
            Error::invalid_starter("character is not a starter character")
        }
        OnboardingError::TamagotchiExists => {
            Error::conflict("starter character was already chosen")
        }
        OnboardingError::ProfileNotFound => Error::not_found("profile not found"),
        OnboardingError::Connection { message } => {
            Error::service_unavailable(format!("onboarding store unavailable: {message}"))
        }
        OnboardingError::Query { message } => {
            Error::internal(format!("onboarding store error: {message}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorCode;
    use crate::domain::ports::fixtures::{
        FixtureProfileStore, FixtureShopStore, FIXTURE_CHARACTER_ID, FIXTURE_USER_ID,
    };
    use crate::domain::ports::profile_store::MockProfileStore;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn service() -> ProfileService {
        ProfileService::new(Arc::new(FixtureProfileStore), Arc::new(FixtureShopStore))
    }

    #[rstest]
    #[tokio::test]
    async fn create_profile_validates_then_persists() {
        let profile = service()
            .create_profile(FIXTURE_USER_ID, 10, dec!(70000), Some("IDR"))
            .await
            .expect("creates");
        assert_eq!(profile.age, 10);
        assert!(!profile.onboarding_completed);
    }

    #[rstest]
    #[tokio::test]
    async fn create_profile_rejects_invalid_age() {
        let err = service()
            .create_profile(FIXTURE_USER_ID, 42, dec!(70000), None)
            .await
            .expect_err("invalid");
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }

    #[rstest]
    #[tokio::test]
    async fn missing_profile_maps_to_not_found() {
        let err = service()
            .get_profile(Uuid::new_v4())
            .await
            .expect_err("absent");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn choose_starter_returns_pet_with_initial_vitals() {
        let selection = service()
            .choose_starter(FIXTURE_USER_ID, FIXTURE_CHARACTER_ID)
            .await
            .expect("chooses");
        let vitals = selection.tamagotchi.vitals;
        assert_eq!(
            (vitals.hunger(), vitals.happiness(), vitals.health()),
            (50, 50, 100)
        );
    }

    #[rstest]
    #[case(OnboardingError::not_starter(), ErrorCode::InvalidStarter)]
    #[case(OnboardingError::tamagotchi_exists(), ErrorCode::Conflict)]
    #[case(OnboardingError::character_not_found(), ErrorCode::NotFound)]
    #[tokio::test]
    async fn onboarding_failures_map_to_their_kinds(
        #[case] store_error: OnboardingError,
        #[case] expected: ErrorCode,
    ) {
        let mut profiles = MockProfileStore::new();
        let returned = store_error.clone();
        profiles
            .expect_choose_starter()
            .returning(move |_, _| Err(returned.clone()));
        let service = ProfileService::new(Arc::new(profiles), Arc::new(FixtureShopStore));

        let err = service
            .choose_starter(FIXTURE_USER_ID, FIXTURE_CHARACTER_ID)
            .await
            .expect_err("fails");
        assert_eq!(err.code(), expected);
    }
}
