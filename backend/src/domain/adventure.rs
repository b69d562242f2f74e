//! Money-adventure records and their two-phase state machine.
//!
//! An adventure is generated unsubmitted, then transitions exactly once to
//! evaluated when the player submits a choice. Both phases carry an opaque
//! trace id from the AI subsystem for correlation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::Error;

pub const MIN_CHOICES: usize = 2;

/// Free-form map of named evaluation metrics, each within `[0, 1]`.
///
/// The AI emits at least `age_appropriateness`, `goal_alignment`, and
/// `financial_reasoning`; consumers must not assume a fixed set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct AdventureScores(BTreeMap<String, f64>);

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("score {metric:?} must be within [0, 1], got {value}")]
pub struct ScoreRangeError {
    pub metric: String,
    pub value: f64,
}

impl AdventureScores {
    pub fn try_new(scores: BTreeMap<String, f64>) -> Result<Self, ScoreRangeError> {
        for (metric, value) in &scores {
            if !(0.0..=1.0).contains(value) || !value.is_finite() {
                return Err(ScoreRangeError {
                    metric: metric.clone(),
                    value: *value,
                });
            }
        }
        Ok(Self(scores))
    }

    pub fn get(&self, metric: &str) -> Option<f64> {
        self.0.get(metric).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl TryFrom<BTreeMap<String, f64>> for AdventureScores {
    type Error = ScoreRangeError;

    fn try_from(scores: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        Self::try_new(scores)
    }
}

impl From<AdventureScores> for BTreeMap<String, f64> {
    fn from(scores: AdventureScores) -> Self {
        scores.0
    }
}

/// One scenario/choice cycle.
///
/// ## Invariants
/// - `choices.len() >= 2`.
/// - `selected_choice_index` is write-once; once non-null, `feedback`,
///   `scores`, `evaluation_trace_id`, and `evaluated_at` are all non-null.
#[derive(Debug, Clone, PartialEq)]
pub struct Adventure {
    pub id: Uuid,
    pub user_id: Uuid,
    pub scenario: String,
    pub choices: Vec<String>,
    pub selected_choice_index: Option<i32>,
    pub feedback: Option<String>,
    pub scores: Option<AdventureScores>,
    pub generation_trace_id: String,
    pub evaluation_trace_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub evaluated_at: Option<DateTime<Utc>>,
}

impl Adventure {
    pub fn is_submitted(&self) -> bool {
        self.selected_choice_index.is_some()
    }

    /// Guard a submission attempt: the adventure must be unsubmitted and
    /// the index must address an existing choice. Returns the choice text.
    pub fn check_submission(&self, choice_index: i32) -> Result<&str, Error> {
        if self.is_submitted() {
            return Err(Error::already_submitted(
                "a choice was already submitted for this adventure",
            ));
        }
        usize::try_from(choice_index)
            .ok()
            .and_then(|index| self.choices.get(index))
            .map(String::as_str)
            .ok_or_else(|| {
                Error::invalid_choice(format!(
                    "choice index {choice_index} is out of range for {} choices",
                    self.choices.len()
                ))
            })
    }
}

/// Evaluation payload applied on the unsubmitted-to-evaluated transition.
#[derive(Debug, Clone, PartialEq)]
pub struct AdventureEvaluation {
    pub choice_index: i32,
    pub feedback: String,
    pub scores: AdventureScores,
    pub trace_id: String,
    pub evaluated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorCode;
    use rstest::rstest;

    fn unsubmitted(choices: usize) -> Adventure {
        Adventure {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            scenario: "Kamu menemukan Rp 10.000".to_owned(),
            choices: (0..choices).map(|i| format!("choice {i}")).collect(),
            selected_choice_index: None,
            feedback: None,
            scores: None,
            generation_trace_id: "t1".to_owned(),
            evaluation_trace_id: None,
            created_at: Utc::now(),
            evaluated_at: None,
        }
    }

    #[rstest]
    fn scores_accept_values_in_unit_interval() {
        let scores = AdventureScores::try_new(BTreeMap::from([
            ("age_appropriateness".to_owned(), 0.9),
            ("goal_alignment".to_owned(), 0.0),
            ("financial_reasoning".to_owned(), 1.0),
        ]))
        .expect("valid");
        assert_eq!(scores.get("age_appropriateness"), Some(0.9));
    }

    #[rstest]
    #[case(-0.1)]
    #[case(1.01)]
    #[case(f64::NAN)]
    fn scores_reject_out_of_range_values(#[case] value: f64) {
        let err = AdventureScores::try_new(BTreeMap::from([("metric".to_owned(), value)]))
            .expect_err("out of range");
        assert_eq!(err.metric, "metric");
    }

    #[rstest]
    fn extra_metrics_are_preserved() {
        let scores = AdventureScores::try_new(BTreeMap::from([
            ("financial_wisdom".to_owned(), 0.7),
            ("responsibility".to_owned(), 0.8),
        ]))
        .expect("free-form map");
        assert_eq!(scores.iter().count(), 2);
    }

    #[rstest]
    fn submission_guard_returns_choice_text() {
        let adventure = unsubmitted(3);
        assert_eq!(adventure.check_submission(0).expect("valid"), "choice 0");
        assert_eq!(adventure.check_submission(2).expect("valid"), "choice 2");
    }

    #[rstest]
    #[case(3)]
    #[case(5)]
    #[case(-1)]
    fn out_of_range_indices_are_invalid_choices(#[case] index: i32) {
        let err = unsubmitted(3).check_submission(index).expect_err("invalid");
        assert_eq!(err.code(), ErrorCode::InvalidChoice);
    }

    #[rstest]
    fn submitted_adventures_reject_further_submissions() {
        let mut adventure = unsubmitted(2);
        adventure.selected_choice_index = Some(0);
        let err = adventure.check_submission(1).expect_err("already submitted");
        assert_eq!(err.code(), ErrorCode::AlreadySubmitted);
    }
}
