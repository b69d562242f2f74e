//! Expense and saving activity ledgers.
//!
//! Both are append-only records of what the player logged; mission progress
//! derives from the act of logging, not from these rows.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::Error;
use super::money;

/// One logged expense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expense {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub category: String,
    pub description: Option<String>,
    pub logged_at: DateTime<Utc>,
}

/// One logged saving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Saving {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub source: Option<String>,
    pub logged_at: DateTime<Utc>,
}

/// Validated expense input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub amount: Decimal,
    pub category: String,
    pub description: Option<String>,
}

impl ExpenseDraft {
    pub fn new(amount: Decimal, category: &str, description: Option<&str>) -> Result<Self, Error> {
        let amount = money::require_positive("amount", amount)?;
        let category = category.trim();
        if category.is_empty() {
            return Err(Error::validation_field("category", "must not be empty"));
        }
        Ok(Self {
            amount,
            category: category.to_owned(),
            description: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_owned),
        })
    }
}

/// Validated saving input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavingDraft {
    pub amount: Decimal,
    pub source: Option<String>,
}

impl SavingDraft {
    pub fn new(amount: Decimal, source: Option<&str>) -> Result<Self, Error> {
        let amount = money::require_positive("amount", amount)?;
        Ok(Self {
            amount,
            source: source
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorCode;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    fn expense_draft_normalises_fields() {
        let draft = ExpenseDraft::new(dec!(2.5), " snack ", Some("  ")).expect("valid");
        assert_eq!(draft.category, "snack");
        assert!(draft.description.is_none());
    }

    #[rstest]
    fn expense_rejects_non_positive_amount() {
        let err = ExpenseDraft::new(dec!(0), "snack", None).expect_err("invalid");
        assert_eq!(err.code(), ErrorCode::InvalidAmount);
    }

    #[rstest]
    fn expense_rejects_blank_category() {
        let err = ExpenseDraft::new(dec!(1), "  ", None).expect_err("invalid");
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }

    #[rstest]
    fn saving_source_is_optional() {
        let draft = SavingDraft::new(dec!(10), None).expect("valid");
        assert!(draft.source.is_none());
        let draft = SavingDraft::new(dec!(10), Some("allowance")).expect("valid");
        assert_eq!(draft.source.as_deref(), Some("allowance"));
    }
}
