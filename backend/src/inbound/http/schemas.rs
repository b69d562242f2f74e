//! Shared response DTOs for the REST surface.
//!
//! Responses use camelCase keys, RFC 3339 timestamps, and plain JSON
//! numbers for monetary values.

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::activity::{Expense, Saving};
use crate::domain::adventure::Adventure;
use crate::domain::catalog::{Character, Food, InventoryEntry, ShopItem};
use crate::domain::goal::Goal;
use crate::domain::mission::{Mission, MissionProgress};
use crate::domain::profile::Profile;
use crate::domain::tamagotchi::Tamagotchi;
use crate::domain::wallet::WalletTransaction;

/// Monetary decimals render as JSON numbers with two fractional digits.
pub(crate) fn money(value: Decimal) -> f64 {
    value.round_dp(2).to_f64().unwrap_or(0.0)
}

pub(crate) fn timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn optional_timestamp(value: Option<DateTime<Utc>>) -> Option<String> {
    value.map(timestamp)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileBody {
    pub id: String,
    pub user_id: String,
    pub age: i32,
    pub allowance: f64,
    pub currency: String,
    pub onboarding_completed: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Profile> for ProfileBody {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id.to_string(),
            user_id: profile.user_id.to_string(),
            age: profile.age,
            allowance: money(profile.allowance),
            currency: profile.currency,
            onboarding_completed: profile.onboarding_completed,
            created_at: timestamp(profile.created_at),
            updated_at: timestamp(profile.updated_at),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterBody {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
    pub is_starter: bool,
    pub price: f64,
}

impl From<Character> for CharacterBody {
    fn from(character: Character) -> Self {
        Self {
            id: character.id.to_string(),
            name: character.name,
            image_url: character.image_url,
            is_starter: character.is_starter,
            price: money(character.price),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodBody {
    pub id: String,
    pub name: String,
    pub nutrition_value: i32,
    pub price: f64,
    pub image_url: Option<String>,
}

impl From<Food> for FoodBody {
    fn from(food: Food) -> Self {
        Self {
            id: food.id.to_string(),
            name: food.name,
            nutrition_value: food.nutrition_value,
            price: money(food.price),
            image_url: food.image_url,
        }
    }
}

/// Either catalog item, tagged by `itemType`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ShopItemBody {
    Character(CharacterBody),
    Food(FoodBody),
}

impl From<ShopItem> for ShopItemBody {
    fn from(item: ShopItem) -> Self {
        match item {
            ShopItem::Character(character) => Self::Character(character.into()),
            ShopItem::Food(food) => Self::Food(food.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryEntryBody {
    pub id: String,
    pub item_type: &'static str,
    pub item_id: String,
    pub quantity: i32,
    pub acquired_at: String,
}

impl From<InventoryEntry> for InventoryEntryBody {
    fn from(entry: InventoryEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            item_type: entry.item_kind.as_str(),
            item_id: entry.item_id.to_string(),
            quantity: entry.quantity,
            acquired_at: timestamp(entry.acquired_at),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletTransactionBody {
    pub id: String,
    pub amount: f64,
    pub transaction_type: &'static str,
    pub description: Option<String>,
    pub created_at: String,
}

impl From<WalletTransaction> for WalletTransactionBody {
    fn from(entry: WalletTransaction) -> Self {
        Self {
            id: entry.id.to_string(),
            amount: money(entry.amount),
            transaction_type: entry.kind.as_str(),
            description: entry.description,
            created_at: timestamp(entry.created_at),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionBody {
    pub id: String,
    pub title: String,
    pub description: String,
    pub mission_type: &'static str,
    pub requirements: serde_json::Value,
    pub reward_coins: f64,
    pub active_date: String,
}

impl From<Mission> for MissionBody {
    fn from(mission: Mission) -> Self {
        Self {
            id: mission.id.to_string(),
            title: mission.title,
            description: mission.description,
            mission_type: mission.kind.tag(),
            requirements: mission.kind.requirements(),
            reward_coins: money(mission.reward_coins),
            active_date: mission.active_date.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionProgressBody {
    pub expense_count: u32,
    pub saving_count: u32,
    pub feed_count: u32,
}

impl From<MissionProgress> for MissionProgressBody {
    fn from(progress: MissionProgress) -> Self {
        Self {
            expense_count: progress.expense_count,
            saving_count: progress.saving_count,
            feed_count: progress.feed_count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseBody {
    pub id: String,
    pub amount: f64,
    pub category: String,
    pub description: Option<String>,
    pub logged_at: String,
}

impl From<Expense> for ExpenseBody {
    fn from(expense: Expense) -> Self {
        Self {
            id: expense.id.to_string(),
            amount: money(expense.amount),
            category: expense.category,
            description: expense.description,
            logged_at: timestamp(expense.logged_at),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingBody {
    pub id: String,
    pub amount: f64,
    pub source: Option<String>,
    pub logged_at: String,
}

impl From<Saving> for SavingBody {
    fn from(saving: Saving) -> Self {
        Self {
            id: saving.id.to_string(),
            amount: money(saving.amount),
            source: saving.source,
            logged_at: timestamp(saving.logged_at),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TamagotchiBody {
    pub id: String,
    pub character_id: String,
    pub name: String,
    pub hunger: i32,
    pub happiness: i32,
    pub health: i32,
    pub last_fed_at: Option<String>,
    pub created_at: String,
}

impl From<Tamagotchi> for TamagotchiBody {
    fn from(pet: Tamagotchi) -> Self {
        Self {
            id: pet.id.to_string(),
            character_id: pet.character_id.to_string(),
            name: pet.name,
            hunger: pet.vitals.hunger(),
            happiness: pet.vitals.happiness(),
            health: pet.vitals.health(),
            last_fed_at: optional_timestamp(pet.last_fed_at),
            created_at: timestamp(pet.created_at),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalBody {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub target_amount: f64,
    pub current_amount: f64,
    pub progress_pct: u8,
    pub completed: bool,
    pub completed_at: Option<String>,
    pub created_at: String,
}

impl From<Goal> for GoalBody {
    fn from(goal: Goal) -> Self {
        Self {
            id: goal.id.to_string(),
            title: goal.title.clone(),
            description: goal.description.clone(),
            target_amount: money(goal.target_amount),
            current_amount: money(goal.current_amount),
            progress_pct: goal.progress_pct(),
            completed: goal.completed,
            completed_at: optional_timestamp(goal.completed_at),
            created_at: timestamp(goal.created_at),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdventureBody {
    pub id: String,
    pub scenario: String,
    pub choices: Vec<String>,
    pub selected_choice_index: Option<i32>,
    pub feedback: Option<String>,
    pub scores: Option<serde_json::Value>,
    pub generation_trace_id: String,
    pub evaluation_trace_id: Option<String>,
    pub created_at: String,
    pub evaluated_at: Option<String>,
}

impl From<Adventure> for AdventureBody {
    fn from(adventure: Adventure) -> Self {
        let scores = adventure
            .scores
            .as_ref()
            .map(|scores| {
                scores
                    .iter()
                    .map(|(metric, value)| (metric.to_owned(), serde_json::json!(value)))
                    .collect::<serde_json::Map<_, _>>()
            })
            .map(serde_json::Value::Object);

        Self {
            id: adventure.id.to_string(),
            scenario: adventure.scenario,
            choices: adventure.choices,
            selected_choice_index: adventure.selected_choice_index,
            feedback: adventure.feedback,
            scores,
            generation_trace_id: adventure.generation_trace_id,
            evaluation_trace_id: adventure.evaluation_trace_id,
            created_at: timestamp(adventure.created_at),
            evaluated_at: optional_timestamp(adventure.evaluated_at),
        }
    }
}
