//! Savings goals and the completion bonus.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::{Error, FieldError};
use super::money;

/// Completion bonus rate: one tenth of the target, floored to whole coins.
const BONUS_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 1); // 0.1

/// A savings goal.
///
/// ## Invariants
/// - `target_amount > 0`, `current_amount >= 0`.
/// - `completed` is monotonic; `completed_at` is non-null iff `completed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goal {
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

impl Goal {
    /// Progress percentage clamped to 100.
    pub fn progress_pct(&self) -> u8 {
        if self.current_amount >= self.target_amount {
            return 100;
        }
        let pct = self.current_amount * Decimal::ONE_HUNDRED / self.target_amount;
        pct.trunc().to_u8().unwrap_or(100).min(100)
    }
}

/// Validated goal creation payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalDraft {
    pub title: String,
    pub description: Option<String>,
    pub target_amount: Decimal,
}

impl GoalDraft {
    pub fn new(
        title: &str,
        target_amount: Decimal,
        description: Option<&str>,
    ) -> Result<Self, Error> {
        let mut failures = Vec::new();
        let title = title.trim();
        if title.is_empty() {
            failures.push(FieldError::new("title", "must not be empty"));
        }
        let target_amount = match money::require_positive("targetAmount", target_amount) {
            Ok(normalised) => Some(normalised),
            Err(_) => {
                failures.push(FieldError::new("targetAmount", "must be greater than 0"));
                None
            }
        };
        match (failures.is_empty(), target_amount) {
            (true, Some(target_amount)) => Ok(Self {
                title: title.to_owned(),
                description: description
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .map(str::to_owned),
                target_amount,
            }),
            _ => Err(Error::validation(failures)),
        }
    }
}

/// Result of one progress contribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalProgressOutcome {
    pub current_amount: Decimal,
    pub progress_pct: u8,
    pub completed: bool,
    /// Present only on the single incomplete-to-complete transition.
    pub bonus_awarded: Option<Decimal>,
}

/// The bonus credited when a goal completes.
pub fn completion_bonus(target_amount: Decimal) -> Decimal {
    (target_amount * BONUS_RATE).floor()
}

/// Apply a progress contribution to an incomplete goal.
///
/// Callers must reject already-completed goals first; this function assumes
/// `goal.completed == false` and performs the flip when the target is met.
pub fn apply_progress(goal: &mut Goal, amount: Decimal, now: DateTime<Utc>) -> GoalProgressOutcome {
    goal.current_amount += amount;
    goal.updated_at = now;

    let bonus_awarded = if goal.current_amount >= goal.target_amount {
        goal.completed = true;
        goal.completed_at = Some(now);
        Some(completion_bonus(goal.target_amount))
    } else {
        None
    };

    GoalProgressOutcome {
        current_amount: goal.current_amount,
        progress_pct: goal.progress_pct(),
        completed: goal.completed,
        bonus_awarded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn goal(target: Decimal, current: Decimal) -> Goal {
        Goal {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "bike".to_owned(),
            description: None,
            target_amount: target,
            current_amount: current,
            completed: false,
            completed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[rstest]
    #[case(dec!(1000), dec!(100))]
    #[case(dec!(999), dec!(99))]
    #[case(dec!(15.50), dec!(1))]
    fn bonus_is_floored_tenth_of_target(#[case] target: Decimal, #[case] expected: Decimal) {
        assert_eq!(completion_bonus(target), expected);
    }

    #[rstest]
    fn partial_progress_reports_percentage_without_bonus() {
        let mut g = goal(dec!(1000), dec!(0));
        let outcome = apply_progress(&mut g, dec!(250), Utc::now());

        assert_eq!(outcome.current_amount, dec!(250));
        assert_eq!(outcome.progress_pct, 25);
        assert!(!outcome.completed);
        assert!(outcome.bonus_awarded.is_none());
    }

    #[rstest]
    fn exactly_meeting_the_target_completes_with_bonus() {
        let mut g = goal(dec!(1000), dec!(0));
        let outcome = apply_progress(&mut g, dec!(1000), Utc::now());

        assert!(outcome.completed);
        assert_eq!(outcome.progress_pct, 100);
        assert_eq!(outcome.bonus_awarded, Some(dec!(100)));
        assert!(g.completed_at.is_some());
    }

    #[rstest]
    fn overshooting_caps_percentage_at_100() {
        let mut g = goal(dec!(100), dec!(90));
        let outcome = apply_progress(&mut g, dec!(50), Utc::now());

        assert_eq!(outcome.current_amount, dec!(140));
        assert_eq!(outcome.progress_pct, 100);
        assert_eq!(outcome.bonus_awarded, Some(dec!(10)));
    }

    #[rstest]
    fn progress_pct_truncates_fractions() {
        let g = goal(dec!(3), dec!(1));
        assert_eq!(g.progress_pct(), 33);
    }

    #[rstest]
    fn draft_rejects_blank_title_and_bad_target() {
        let err = GoalDraft::new("  ", dec!(0), None).expect_err("invalid");
        let fields: Vec<_> = err
            .validation_errors()
            .iter()
            .map(|f| f.field.as_str())
            .collect();
        assert_eq!(fields, ["title", "targetAmount"]);
    }

    #[rstest]
    fn draft_drops_blank_descriptions() {
        let draft = GoalDraft::new("bike", dec!(10), Some("   ")).expect("valid");
        assert!(draft.description.is_none());
    }
}
