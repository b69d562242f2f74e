//! Wallet aggregate and its append-only transaction ledger.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-user coin wallet.
///
/// ## Invariants
/// - `balance >= 0`, enforced by the debit path and by a storage CHECK
///   constraint as the last line of defence.
/// - The signed sum of the wallet's ledger rows equals `balance`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wallet {
    pub id: Uuid,
    pub user_id: Uuid,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Ledger entry category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    MissionReward,
    ShopPurchase,
    GoalBonus,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissionReward => "mission_reward",
            Self::ShopPurchase => "shop_purchase",
            Self::GoalBonus => "goal_bonus",
        }
    }
}

/// Raised when a persisted tag no longer maps to a known kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transaction kind tag: {0}")]
pub struct UnknownTransactionKind(pub String);

impl FromStr for TransactionKind {
    type Err = UnknownTransactionKind;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "mission_reward" => Ok(Self::MissionReward),
            "shop_purchase" => Ok(Self::ShopPurchase),
            "goal_bonus" => Ok(Self::GoalBonus),
            other => Err(UnknownTransactionKind(other.to_owned())),
        }
    }
}

/// One row of the append-only wallet ledger.
///
/// `amount` is signed: positive for credits, negative for debits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletTransaction {
    pub id: Uuid,
    pub wallet_id: Uuid,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Balance read-out with the display currency from the profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletSnapshot {
    pub balance: Decimal,
    pub currency: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(TransactionKind::MissionReward, "mission_reward")]
    #[case(TransactionKind::ShopPurchase, "shop_purchase")]
    #[case(TransactionKind::GoalBonus, "goal_bonus")]
    fn kind_tags_round_trip(#[case] kind: TransactionKind, #[case] tag: &str) {
        assert_eq!(kind.as_str(), tag);
        assert_eq!(tag.parse::<TransactionKind>().expect("known tag"), kind);
    }

    #[rstest]
    fn unknown_tag_is_rejected() {
        let err = "interest".parse::<TransactionKind>().expect_err("unknown");
        assert!(err.to_string().contains("interest"));
    }
}
