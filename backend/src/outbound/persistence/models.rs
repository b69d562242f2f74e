//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and are
//! never exposed to the domain. Repository implementations convert between
//! these rows and domain types, keeping Diesel confined to this adapter.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::schema::{
    adventures, characters, expenses, foods, goals, missions, profiles, savings, tamagotchis,
    user_inventory, user_missions, users, wallet_transactions, wallets,
};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProfileRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub age: i32,
    pub allowance: Decimal,
    pub currency: String,
    pub onboarding_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = profiles)]
pub(crate) struct NewProfileRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub age: i32,
    pub allowance: Decimal,
    pub currency: String,
    pub onboarding_completed: bool,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = characters)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CharacterRow {
    pub id: Uuid,
    pub name: String,
    pub image_url: Option<String>,
    pub is_starter: bool,
    pub price: Decimal,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = foods)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FoodRow {
    pub id: Uuid,
    pub name: String,
    pub nutrition_value: i32,
    pub price: Decimal,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tamagotchis)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TamagotchiRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub character_id: Uuid,
    pub name: String,
    pub hunger: i32,
    pub happiness: i32,
    pub health: i32,
    pub last_fed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tamagotchis)]
pub(crate) struct NewTamagotchiRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub character_id: Uuid,
    pub name: String,
    pub hunger: i32,
    pub happiness: i32,
    pub health: i32,
}

/// Changeset applied by the feed transaction.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tamagotchis)]
pub(crate) struct TamagotchiFeedUpdate {
    pub hunger: i32,
    pub happiness: i32,
    pub health: i32,
    pub last_fed_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = wallets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct WalletRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = wallets)]
pub(crate) struct NewWalletRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = wallet_transactions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct WalletTransactionRow {
    pub id: Uuid,
    pub wallet_id: Uuid,
    pub amount: Decimal,
    pub transaction_type: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = wallet_transactions)]
pub(crate) struct NewWalletTransactionRow {
    pub id: Uuid,
    pub wallet_id: Uuid,
    pub amount: Decimal,
    pub transaction_type: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_inventory)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct InventoryRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub item_type: String,
    pub item_id: Uuid,
    pub quantity: i32,
    pub acquired_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_inventory)]
pub(crate) struct NewInventoryRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub item_type: String,
    pub item_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = missions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MissionRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub mission_type: String,
    pub requirements: serde_json::Value,
    pub reward_coins: Decimal,
    pub active_date: NaiveDate,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_missions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserMissionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mission_id: Uuid,
    pub progress: serde_json::Value,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_missions)]
pub(crate) struct NewUserMissionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mission_id: Uuid,
    pub progress: serde_json::Value,
    pub completed: bool,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = expenses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ExpenseRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub category: String,
    pub description: Option<String>,
    pub logged_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = expenses)]
pub(crate) struct NewExpenseRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub category: String,
    pub description: Option<String>,
    pub logged_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = savings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SavingRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub source: Option<String>,
    pub logged_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = savings)]
pub(crate) struct NewSavingRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub source: Option<String>,
    pub logged_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = goals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GoalRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = goals)]
pub(crate) struct NewGoalRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub completed: bool,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = adventures)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AdventureRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub scenario: String,
    pub choices: serde_json::Value,
    pub selected_choice_index: Option<i32>,
    pub feedback: Option<String>,
    pub scores: Option<serde_json::Value>,
    pub generation_trace_id: String,
    pub evaluation_trace_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub evaluated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = adventures)]
pub(crate) struct NewAdventureRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub scenario: String,
    pub choices: serde_json::Value,
    pub generation_trace_id: String,
    pub created_at: DateTime<Utc>,
}

/// Changeset for the single unsubmitted-to-evaluated write.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = adventures)]
pub(crate) struct AdventureEvaluationUpdate {
    pub selected_choice_index: i32,
    pub feedback: String,
    pub scores: serde_json::Value,
    pub evaluation_trace_id: String,
    pub evaluated_at: DateTime<Utc>,
}
