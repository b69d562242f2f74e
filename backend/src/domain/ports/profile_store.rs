//! Ports for profile persistence and the starter-character onboarding step.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::catalog::Character;
use crate::domain::profile::{Profile, ProfileDraft};
use crate::domain::tamagotchi::Tamagotchi;

use super::macros::port_error;

port_error! {
    /// Errors raised by profile store adapters.
    pub enum ProfileStoreError {
        /// The user already has a profile.
        AlreadyExists => "profile already exists",
        /// Repository connection could not be established.
        Connection { message } => "profile store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message } => "profile store query failed: {message}",
    }
}

port_error! {
    /// Errors raised by the starter-selection transaction.
    pub enum OnboardingError {
        /// The chosen character does not exist.
        CharacterNotFound => "character not found",
        /// The chosen character is not a starter character.
        NotStarter => "character is not a starter character",
        /// The user already has a tamagotchi.
        TamagotchiExists => "starter character was already chosen",
        /// The user has no profile to complete onboarding on.
        ProfileNotFound => "profile not found",
        /// Repository connection could not be established.
        Connection { message } => "onboarding store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message } => "onboarding store query failed: {message}",
    }
}

/// Result of the starter-selection transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarterSelection {
    pub tamagotchi: Tamagotchi,
    pub character: Character,
}

/// Port for profile rows and the onboarding transaction.
///
/// `choose_starter` performs the whole bootstrap in one transaction:
/// tamagotchi creation, the onboarding flag flip, and the starting
/// inventory seed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn create_profile(
        &self,
        user_id: Uuid,
        draft: ProfileDraft,
    ) -> Result<Profile, ProfileStoreError>;

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Profile>, ProfileStoreError>;

    async fn choose_starter(
        &self,
        user_id: Uuid,
        character_id: Uuid,
    ) -> Result<StarterSelection, OnboardingError>;
}
