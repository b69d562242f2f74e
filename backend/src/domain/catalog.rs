//! Catalog entities (characters and foods) and per-user inventory.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Playable character from the catalog. Seeded externally, read-mostly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    pub id: Uuid,
    pub name: String,
    pub image_url: Option<String>,
    pub is_starter: bool,
    pub price: Decimal,
}

/// Food item from the catalog. `nutrition_value` drives the feed formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Food {
    pub id: Uuid,
    pub name: String,
    pub nutrition_value: i32,
    pub price: Decimal,
    pub image_url: Option<String>,
}

/// Discriminator for the two item families sharing the inventory table.
///
/// Character ownership is binary; food ownership is a stacked quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Character,
    Food,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Food => "food",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("item type must be \"character\" or \"food\", got {0:?}")]
pub struct UnknownItemKind(pub String);

impl FromStr for ItemKind {
    type Err = UnknownItemKind;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "character" => Ok(Self::Character),
            "food" => Ok(Self::Food),
            other => Err(UnknownItemKind(other.to_owned())),
        }
    }
}

/// Either kind of purchasable item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShopItem {
    Character(Character),
    Food(Food),
}

impl ShopItem {
    pub fn id(&self) -> Uuid {
        match self {
            Self::Character(c) => c.id,
            Self::Food(f) => f.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Character(c) => &c.name,
            Self::Food(f) => &f.name,
        }
    }

    pub fn price(&self) -> Decimal {
        match self {
            Self::Character(c) => c.price,
            Self::Food(f) => f.price,
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Character(_) => ItemKind::Character,
            Self::Food(_) => ItemKind::Food,
        }
    }
}

/// One owned item stack.
///
/// ## Invariants
/// - At most one entry per `(user_id, item_kind, item_id)`.
/// - `quantity >= 1`; a stack that reaches zero is deleted eagerly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub item_kind: ItemKind,
    pub item_id: Uuid,
    pub quantity: i32,
    pub acquired_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("character", ItemKind::Character)]
    #[case("food", ItemKind::Food)]
    fn item_kind_parses_known_tags(#[case] tag: &str, #[case] expected: ItemKind) {
        assert_eq!(tag.parse::<ItemKind>().expect("known"), expected);
        assert_eq!(expected.as_str(), tag);
    }

    #[rstest]
    #[case("pet")]
    #[case("Character")]
    #[case("")]
    fn item_kind_rejects_unknown_tags(#[case] tag: &str) {
        tag.parse::<ItemKind>().expect_err("unknown");
    }
}
