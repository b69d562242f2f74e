//! Driven ports: the traits adapters implement for the domain services.

pub(crate) mod macros;

pub mod adventure_source;
pub mod adventure_store;
pub mod fixtures;
pub mod goal_store;
pub mod mission_store;
pub mod password_hasher;
pub mod profile_store;
pub mod shop_store;
pub mod tamagotchi_store;
pub mod token_service;
pub mod user_repository;
pub mod wallet_store;

pub use adventure_source::{
    AdventureSource, AdventureSourceError, ChoiceEvaluation, EvaluationRequest, GeneratedScenario,
    ScenarioRequest,
};
pub use adventure_store::{AdventureStore, AdventureStoreError, NewAdventure};
pub use goal_store::{GoalFilter, GoalStore, GoalStoreError};
pub use mission_store::{
    ExpenseLogged, MissionOutcome, MissionStore, MissionStoreError, SavingLogged, TodaysMission,
};
pub use password_hasher::{PasswordHasher, PasswordHasherError};
pub use profile_store::{OnboardingError, ProfileStore, ProfileStoreError, StarterSelection};
pub use shop_store::{PurchaseReceipt, ShopStore, ShopStoreError};
pub use tamagotchi_store::{FeedOutcome, TamagotchiStore, TamagotchiStoreError};
pub use token_service::{TokenError, TokenService};
pub use user_repository::{NewUserRecord, UserRepository, UserRepositoryError};
pub use wallet_store::{WalletStore, WalletStoreError};
