//! Fixture port implementations for tests that do not exercise real I/O.
//!
//! Each fixture returns deterministic data rooted at the fixture ids below,
//! so handler tests can assert on concrete values without a database or AI
//! service.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::activity::{Expense, ExpenseDraft, Saving, SavingDraft};
use crate::domain::adventure::{Adventure, AdventureEvaluation, AdventureScores};
use crate::domain::catalog::{Character, Food, InventoryEntry, ItemKind, ShopItem};
use crate::domain::goal::{Goal, GoalDraft, GoalProgressOutcome};
use crate::domain::mission::{Mission, MissionKind, MissionProgress, UserMission};
use crate::domain::profile::{Profile, ProfileDraft};
use crate::domain::tamagotchi::{Tamagotchi, Vitals};
use crate::domain::user::User;
use crate::domain::wallet::{TransactionKind, Wallet, WalletTransaction};

use super::adventure_source::{
    AdventureSource, AdventureSourceError, ChoiceEvaluation, EvaluationRequest, GeneratedScenario,
    ScenarioRequest,
};
use super::adventure_store::{AdventureStore, AdventureStoreError, NewAdventure};
use super::goal_store::{GoalFilter, GoalStore, GoalStoreError};
use super::mission_store::{
    ExpenseLogged, MissionOutcome, MissionStore, MissionStoreError, SavingLogged, TodaysMission,
};
use super::password_hasher::{PasswordHasher, PasswordHasherError};
use super::profile_store::{
    OnboardingError, ProfileStore, ProfileStoreError, StarterSelection,
};
use super::shop_store::{PurchaseReceipt, ShopStore, ShopStoreError};
use super::tamagotchi_store::{FeedOutcome, TamagotchiStore, TamagotchiStoreError};
use super::token_service::{TokenError, TokenService};
use super::user_repository::{NewUserRecord, UserRepository, UserRepositoryError};
use super::wallet_store::{WalletStore, WalletStoreError};

pub const FIXTURE_USER_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0001);
pub const FIXTURE_CHARACTER_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0011);
pub const FIXTURE_FOOD_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0012);
pub const FIXTURE_MISSION_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0021);
pub const FIXTURE_GOAL_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0031);
pub const FIXTURE_ADVENTURE_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0041);

const FIXTURE_TOKEN_PREFIX: &str = "fixture-token-";

fn coins(units: i64) -> Decimal {
    Decimal::new(units * 100, 2)
}

/// Token fixture: credentials are `fixture-token-<uuid>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTokenService;

impl TokenService for FixtureTokenService {
    fn issue(&self, user_id: Uuid) -> Result<String, TokenError> {
        Ok(format!("{FIXTURE_TOKEN_PREFIX}{user_id}"))
    }

    fn resolve(&self, credential: &str) -> Result<Uuid, TokenError> {
        credential
            .strip_prefix(FIXTURE_TOKEN_PREFIX)
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .ok_or_else(TokenError::invalid_token)
    }
}

/// Hashing fixture: `hashed:<password>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePasswordHasher;

impl PasswordHasher for FixturePasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHasherError> {
        Ok(format!("hashed:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHasherError> {
        Ok(hash == format!("hashed:{password}"))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn create(&self, record: NewUserRecord) -> Result<User, UserRepositoryError> {
        Ok(User {
            id: record.id,
            username: record.username,
            email: record.email,
            password_hash: record.password_hash,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserRepositoryError> {
        if username == "kid" {
            Ok(Some(fixture_user()))
        } else {
            Ok(None)
        }
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, UserRepositoryError> {
        if user_id == FIXTURE_USER_ID {
            Ok(Some(fixture_user()))
        } else {
            Ok(None)
        }
    }
}

pub fn fixture_user() -> User {
    User {
        id: FIXTURE_USER_ID,
        username: "kid".to_owned(),
        email: "k@example.com".to_owned(),
        password_hash: "hashed:Secret123".to_owned(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn fixture_profile() -> Profile {
    Profile {
        id: Uuid::from_u128(0x02),
        user_id: FIXTURE_USER_ID,
        age: 10,
        allowance: coins(70_000),
        currency: "IDR".to_owned(),
        onboarding_completed: false,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn fixture_character() -> Character {
    Character {
        id: FIXTURE_CHARACTER_ID,
        name: "Foxy".to_owned(),
        image_url: Some("https://assets.example/foxy.png".to_owned()),
        is_starter: true,
        price: Decimal::ZERO,
    }
}

pub fn fixture_food() -> Food {
    Food {
        id: FIXTURE_FOOD_ID,
        name: "Apple".to_owned(),
        nutrition_value: 10,
        price: coins(5),
        image_url: None,
    }
}

pub fn fixture_tamagotchi() -> Tamagotchi {
    Tamagotchi {
        id: Uuid::from_u128(0x03),
        user_id: FIXTURE_USER_ID,
        character_id: FIXTURE_CHARACTER_ID,
        name: "Foxy".to_owned(),
        vitals: Vitals::initial(),
        last_fed_at: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn fixture_goal() -> Goal {
    Goal {
        id: FIXTURE_GOAL_ID,
        user_id: FIXTURE_USER_ID,
        title: "bike".to_owned(),
        description: None,
        target_amount: coins(1000),
        current_amount: coins(250),
        completed: false,
        completed_at: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn fixture_adventure() -> Adventure {
    Adventure {
        id: FIXTURE_ADVENTURE_ID,
        user_id: FIXTURE_USER_ID,
        scenario: "Kamu menemukan Rp 10.000".to_owned(),
        choices: vec!["Menabung".to_owned(), "Jajan".to_owned()],
        selected_choice_index: None,
        feedback: None,
        scores: None,
        generation_trace_id: "t1".to_owned(),
        evaluation_trace_id: None,
        created_at: Utc::now(),
        evaluated_at: None,
    }
}

pub fn fixture_scores() -> AdventureScores {
    AdventureScores::try_new(BTreeMap::from([
        ("age_appropriateness".to_owned(), 0.9),
        ("goal_alignment".to_owned(), 0.95),
        ("financial_reasoning".to_owned(), 0.85),
    ]))
    .expect("fixture scores are in range")
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProfileStore;

#[async_trait]
impl ProfileStore for FixtureProfileStore {
    async fn create_profile(
        &self,
        user_id: Uuid,
        draft: ProfileDraft,
    ) -> Result<Profile, ProfileStoreError> {
        Ok(Profile {
            id: Uuid::from_u128(0x02),
            user_id,
            age: draft.age,
            allowance: draft.allowance,
            currency: draft.currency,
            onboarding_completed: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Profile>, ProfileStoreError> {
        if user_id == FIXTURE_USER_ID {
            Ok(Some(fixture_profile()))
        } else {
            Ok(None)
        }
    }

    async fn choose_starter(
        &self,
        _user_id: Uuid,
        character_id: Uuid,
    ) -> Result<StarterSelection, OnboardingError> {
        if character_id != FIXTURE_CHARACTER_ID {
            return Err(OnboardingError::character_not_found());
        }
        Ok(StarterSelection {
            tamagotchi: fixture_tamagotchi(),
            character: fixture_character(),
        })
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureWalletStore;

#[async_trait]
impl WalletStore for FixtureWalletStore {
    async fn balance(&self, user_id: Uuid) -> Result<Wallet, WalletStoreError> {
        Ok(fixture_wallet(user_id, coins(50)))
    }

    async fn credit(
        &self,
        user_id: Uuid,
        amount: Decimal,
        _kind: TransactionKind,
        _description: Option<String>,
    ) -> Result<Wallet, WalletStoreError> {
        Ok(fixture_wallet(user_id, coins(50) + amount))
    }

    async fn debit(
        &self,
        user_id: Uuid,
        amount: Decimal,
        _kind: TransactionKind,
        _description: Option<String>,
    ) -> Result<Wallet, WalletStoreError> {
        let balance = coins(50);
        if amount > balance {
            return Err(WalletStoreError::insufficient_funds(format!(
                "balance {balance} cannot cover {amount}"
            )));
        }
        Ok(fixture_wallet(user_id, balance - amount))
    }

    async fn history(
        &self,
        _user_id: Uuid,
        _limit: i64,
    ) -> Result<Vec<WalletTransaction>, WalletStoreError> {
        let wallet_id = Uuid::from_u128(0x04);
        Ok(vec![
            WalletTransaction {
                id: Uuid::from_u128(0x42),
                wallet_id,
                amount: -coins(15),
                kind: TransactionKind::ShopPurchase,
                description: Some("Purchased Pizza".to_owned()),
                created_at: Utc::now(),
            },
            WalletTransaction {
                id: Uuid::from_u128(0x41),
                wallet_id,
                amount: coins(50),
                kind: TransactionKind::MissionReward,
                description: Some("Completed mission: Catat 3 pengeluaran".to_owned()),
                created_at: Utc::now(),
            },
        ])
    }
}

fn fixture_wallet(user_id: Uuid, balance: Decimal) -> Wallet {
    Wallet {
        id: Uuid::from_u128(0x04),
        user_id,
        balance,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureShopStore;

#[async_trait]
impl ShopStore for FixtureShopStore {
    async fn list_characters(&self) -> Result<Vec<Character>, ShopStoreError> {
        Ok(vec![fixture_character()])
    }

    async fn list_starter_characters(&self) -> Result<Vec<Character>, ShopStoreError> {
        Ok(vec![fixture_character()])
    }

    async fn list_foods(&self) -> Result<Vec<Food>, ShopStoreError> {
        Ok(vec![fixture_food()])
    }

    async fn inventory(&self, user_id: Uuid) -> Result<Vec<InventoryEntry>, ShopStoreError> {
        Ok(vec![InventoryEntry {
            id: Uuid::from_u128(0x05),
            user_id,
            item_kind: ItemKind::Food,
            item_id: FIXTURE_FOOD_ID,
            quantity: 10,
            acquired_at: Utc::now(),
        }])
    }

    async fn purchase(
        &self,
        _user_id: Uuid,
        item_id: Uuid,
        kind: ItemKind,
    ) -> Result<PurchaseReceipt, ShopStoreError> {
        match (kind, item_id) {
            (ItemKind::Food, id) if id == FIXTURE_FOOD_ID => Ok(PurchaseReceipt {
                item: ShopItem::Food(fixture_food()),
                new_balance: coins(45),
            }),
            (ItemKind::Character, id) if id == FIXTURE_CHARACTER_ID => Ok(PurchaseReceipt {
                item: ShopItem::Character(fixture_character()),
                new_balance: coins(50),
            }),
            _ => Err(ShopStoreError::item_not_found()),
        }
    }

    async fn owns(
        &self,
        _user_id: Uuid,
        item_id: Uuid,
        kind: ItemKind,
    ) -> Result<bool, ShopStoreError> {
        Ok(kind == ItemKind::Food && item_id == FIXTURE_FOOD_ID)
    }

    async fn consume(
        &self,
        _user_id: Uuid,
        item_id: Uuid,
        kind: ItemKind,
        _quantity: i32,
    ) -> Result<(), ShopStoreError> {
        if kind == ItemKind::Food && item_id == FIXTURE_FOOD_ID {
            Ok(())
        } else {
            Err(ShopStoreError::not_in_inventory())
        }
    }
}

pub fn fixture_mission(day: NaiveDate) -> Mission {
    Mission {
        id: FIXTURE_MISSION_ID,
        title: "Catat 3 pengeluaran".to_owned(),
        description: "Log three expenses today".to_owned(),
        kind: MissionKind::LogExpenses { expense_count: 3 },
        reward_coins: coins(10),
        active_date: day,
    }
}

fn fixture_user_mission(user_id: Uuid) -> UserMission {
    UserMission {
        id: Uuid::from_u128(0x06),
        user_id,
        mission_id: FIXTURE_MISSION_ID,
        progress: MissionProgress::default(),
        completed: false,
        completed_at: None,
        created_at: Utc::now(),
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMissionStore;

#[async_trait]
impl MissionStore for FixtureMissionStore {
    async fn todays_mission(
        &self,
        user_id: Uuid,
        day: NaiveDate,
    ) -> Result<Option<TodaysMission>, MissionStoreError> {
        Ok(Some(TodaysMission {
            mission: fixture_mission(day),
            record: fixture_user_mission(user_id),
            progress_pct: 0,
        }))
    }

    async fn log_expense(
        &self,
        user_id: Uuid,
        draft: ExpenseDraft,
        _day: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<ExpenseLogged, MissionStoreError> {
        Ok(ExpenseLogged {
            expense: Expense {
                id: Uuid::from_u128(0x07),
                user_id,
                amount: draft.amount,
                category: draft.category,
                description: draft.description,
                logged_at: now,
            },
            mission: Some(MissionOutcome {
                mission_id: FIXTURE_MISSION_ID,
                progress_pct: 33,
                completed: false,
                just_completed: false,
                reward_credited: None,
            }),
        })
    }

    async fn log_saving(
        &self,
        user_id: Uuid,
        draft: SavingDraft,
        _day: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<SavingLogged, MissionStoreError> {
        Ok(SavingLogged {
            saving: Saving {
                id: Uuid::from_u128(0x08),
                user_id,
                amount: draft.amount,
                source: draft.source,
                logged_at: now,
            },
            mission: None,
        })
    }

    async fn list_expenses(
        &self,
        _user_id: Uuid,
        _limit: i64,
    ) -> Result<Vec<Expense>, MissionStoreError> {
        Ok(Vec::new())
    }

    async fn list_savings(
        &self,
        _user_id: Uuid,
        _limit: i64,
    ) -> Result<Vec<Saving>, MissionStoreError> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTamagotchiStore;

#[async_trait]
impl TamagotchiStore for FixtureTamagotchiStore {
    async fn find_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<Tamagotchi>, TamagotchiStoreError> {
        if user_id == FIXTURE_USER_ID {
            Ok(Some(fixture_tamagotchi()))
        } else {
            Ok(None)
        }
    }

    async fn feed(
        &self,
        _user_id: Uuid,
        food_id: Uuid,
        _day: NaiveDate,
        _now: DateTime<Utc>,
    ) -> Result<FeedOutcome, TamagotchiStoreError> {
        if food_id != FIXTURE_FOOD_ID {
            return Err(TamagotchiStoreError::food_not_found());
        }
        Ok(FeedOutcome {
            vitals: Vitals::initial().feed(fixture_food().nutrition_value),
            mission: None,
        })
    }

    async fn rename(
        &self,
        _user_id: Uuid,
        name: String,
        now: DateTime<Utc>,
    ) -> Result<Tamagotchi, TamagotchiStoreError> {
        let mut pet = fixture_tamagotchi();
        pet.name = name;
        pet.updated_at = now;
        Ok(pet)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureGoalStore;

#[async_trait]
impl GoalStore for FixtureGoalStore {
    async fn create(
        &self,
        user_id: Uuid,
        draft: GoalDraft,
        now: DateTime<Utc>,
    ) -> Result<Goal, GoalStoreError> {
        Ok(Goal {
            id: FIXTURE_GOAL_ID,
            user_id,
            title: draft.title,
            description: draft.description,
            target_amount: draft.target_amount,
            current_amount: Decimal::ZERO,
            completed: false,
            completed_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    async fn list(&self, _user_id: Uuid, filter: GoalFilter) -> Result<Vec<Goal>, GoalStoreError> {
        match filter {
            GoalFilter::Completed => Ok(Vec::new()),
            GoalFilter::All | GoalFilter::Active => Ok(vec![fixture_goal()]),
        }
    }

    async fn add_progress(
        &self,
        goal_id: Uuid,
        _user_id: Uuid,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<GoalProgressOutcome, GoalStoreError> {
        if goal_id != FIXTURE_GOAL_ID {
            return Err(GoalStoreError::goal_not_found());
        }
        let mut goal = fixture_goal();
        Ok(crate::domain::goal::apply_progress(&mut goal, amount, now))
    }

    async fn delete(&self, goal_id: Uuid, _user_id: Uuid) -> Result<(), GoalStoreError> {
        if goal_id == FIXTURE_GOAL_ID {
            Ok(())
        } else {
            Err(GoalStoreError::goal_not_found())
        }
    }

    async fn recent_incomplete(
        &self,
        _user_id: Uuid,
        _limit: i64,
    ) -> Result<Vec<Goal>, GoalStoreError> {
        Ok(vec![fixture_goal()])
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAdventureStore;

#[async_trait]
impl AdventureStore for FixtureAdventureStore {
    async fn insert(
        &self,
        adventure: NewAdventure,
        now: DateTime<Utc>,
    ) -> Result<Adventure, AdventureStoreError> {
        Ok(Adventure {
            id: FIXTURE_ADVENTURE_ID,
            user_id: adventure.user_id,
            scenario: adventure.scenario,
            choices: adventure.choices,
            selected_choice_index: None,
            feedback: None,
            scores: None,
            generation_trace_id: adventure.generation_trace_id,
            evaluation_trace_id: None,
            created_at: now,
            evaluated_at: None,
        })
    }

    async fn find(
        &self,
        adventure_id: Uuid,
        _user_id: Uuid,
    ) -> Result<Option<Adventure>, AdventureStoreError> {
        if adventure_id == FIXTURE_ADVENTURE_ID {
            Ok(Some(fixture_adventure()))
        } else {
            Ok(None)
        }
    }

    async fn history(
        &self,
        _user_id: Uuid,
        _limit: i64,
    ) -> Result<Vec<Adventure>, AdventureStoreError> {
        Ok(vec![fixture_adventure()])
    }

    async fn record_evaluation(
        &self,
        adventure_id: Uuid,
        _user_id: Uuid,
        evaluation: AdventureEvaluation,
    ) -> Result<Adventure, AdventureStoreError> {
        if adventure_id != FIXTURE_ADVENTURE_ID {
            return Err(AdventureStoreError::adventure_not_found());
        }
        let mut adventure = fixture_adventure();
        adventure.selected_choice_index = Some(evaluation.choice_index);
        adventure.feedback = Some(evaluation.feedback);
        adventure.scores = Some(evaluation.scores);
        adventure.evaluation_trace_id = Some(evaluation.trace_id);
        adventure.evaluated_at = Some(evaluation.evaluated_at);
        Ok(adventure)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAdventureSource;

#[async_trait]
impl AdventureSource for FixtureAdventureSource {
    async fn generate(
        &self,
        _request: ScenarioRequest,
    ) -> Result<GeneratedScenario, AdventureSourceError> {
        Ok(GeneratedScenario {
            scenario: "Kamu menemukan Rp 10.000".to_owned(),
            choices: vec!["Menabung".to_owned(), "Jajan".to_owned()],
            trace_id: "t1".to_owned(),
        })
    }

    async fn evaluate(
        &self,
        _request: EvaluationRequest,
    ) -> Result<ChoiceEvaluation, AdventureSourceError> {
        Ok(ChoiceEvaluation {
            feedback: "Pilihan bagus".to_owned(),
            scores: fixture_scores(),
            trace_id: "t2".to_owned(),
        })
    }
}
