//! Daily missions, per-user progress, and the completion state machine.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Mission variant with its completion requirements.
///
/// The `requirements` column is a tag-specific counter map; parsing it
/// together with the `mission_type` tag yields one of these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionKind {
    LogExpenses { expense_count: u32 },
    LogSavings { saving_count: u32 },
    Combined { expense_count: u32, saving_count: u32 },
    TamagotchiCare { feed_count: u32 },
}

/// Raised when a mission row carries an unknown tag or unusable requirements.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MissionKindError {
    #[error("unknown mission type tag: {0}")]
    UnknownTag(String),
    #[error("mission requirements missing counter {0:?}")]
    MissingRequirement(&'static str),
}

fn requirement(map: &serde_json::Value, key: &'static str) -> Result<u32, MissionKindError> {
    map.get(key)
        .and_then(serde_json::Value::as_u64)
        .filter(|count| *count > 0)
        .map(|count| count as u32)
        .ok_or(MissionKindError::MissingRequirement(key))
}

impl MissionKind {
    /// Parse the persisted `(mission_type, requirements)` pair.
    ///
    /// `log_expenses`/`expense_tracking` and `log_savings`/`saving_tracking`
    /// are historical aliases for the same variants.
    pub fn parse(tag: &str, requirements: &serde_json::Value) -> Result<Self, MissionKindError> {
        match tag {
            "log_expenses" | "expense_tracking" => Ok(Self::LogExpenses {
                expense_count: requirement(requirements, "expenseCount")?,
            }),
            "log_savings" | "saving_tracking" => Ok(Self::LogSavings {
                saving_count: requirement(requirements, "savingCount")?,
            }),
            "combined" => Ok(Self::Combined {
                expense_count: requirement(requirements, "expenseCount")?,
                saving_count: requirement(requirements, "savingCount")?,
            }),
            "tamagotchi_care" => Ok(Self::TamagotchiCare {
                feed_count: requirement(requirements, "feedCount")?,
            }),
            other => Err(MissionKindError::UnknownTag(other.to_owned())),
        }
    }

    /// Canonical tag for the variant.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::LogExpenses { .. } => "log_expenses",
            Self::LogSavings { .. } => "log_savings",
            Self::Combined { .. } => "combined",
            Self::TamagotchiCare { .. } => "tamagotchi_care",
        }
    }

    /// Requirements counter map as persisted and surfaced to clients.
    pub fn requirements(&self) -> serde_json::Value {
        match *self {
            Self::LogExpenses { expense_count } => {
                serde_json::json!({ "expenseCount": expense_count })
            }
            Self::LogSavings { saving_count } => {
                serde_json::json!({ "savingCount": saving_count })
            }
            Self::Combined {
                expense_count,
                saving_count,
            } => serde_json::json!({
                "expenseCount": expense_count,
                "savingCount": saving_count,
            }),
            Self::TamagotchiCare { feed_count } => {
                serde_json::json!({ "feedCount": feed_count })
            }
        }
    }

    /// Progress percentage for the given counters, clamped to 100.
    pub fn progress_pct(&self, progress: &MissionProgress) -> u8 {
        fn ratio(count: u32, required: u32) -> u32 {
            (count.saturating_mul(100) / required).min(100)
        }

        let pct = match *self {
            Self::LogExpenses { expense_count } => ratio(progress.expense_count, expense_count),
            Self::LogSavings { saving_count } => ratio(progress.saving_count, saving_count),
            Self::Combined {
                expense_count,
                saving_count,
            } => {
                (ratio(progress.expense_count, expense_count)
                    + ratio(progress.saving_count, saving_count))
                    / 2
            }
            Self::TamagotchiCare { feed_count } => ratio(progress.feed_count, feed_count),
        };
        pct as u8
    }
}

/// Tag-keyed progress counters stored on the user-mission row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MissionProgress {
    pub expense_count: u32,
    pub saving_count: u32,
    pub feed_count: u32,
}

/// Domain event that advances mission progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionEvent {
    ExpenseLogged,
    SavingLogged,
    TamagotchiFed,
}

impl MissionProgress {
    pub fn record(&mut self, event: MissionEvent) {
        match event {
            MissionEvent::ExpenseLogged => self.expense_count += 1,
            MissionEvent::SavingLogged => self.saving_count += 1,
            MissionEvent::TamagotchiFed => self.feed_count += 1,
        }
    }
}

/// Catalog mission active on exactly one UTC day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mission {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub kind: MissionKind,
    pub reward_coins: Decimal,
    pub active_date: NaiveDate,
}

/// Per-user mission record, created lazily on first fetch.
///
/// ## Invariants
/// - Unique per `(user_id, mission_id)`.
/// - `completed` is monotonic; `completed_at` is non-null iff `completed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMission {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mission_id: Uuid,
    pub progress: MissionProgress,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Result of applying one progress event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub progress_pct: u8,
    pub completed: bool,
    /// True only on the single incomplete-to-complete transition; the
    /// reward credit fires exactly when this is set.
    pub just_completed: bool,
}

/// Advance a user mission by one event.
///
/// Once completed, repeat events leave the record untouched and report no
/// transition, which keeps the reward credit exactly-once.
pub fn apply_event(
    kind: &MissionKind,
    record: &mut UserMission,
    event: MissionEvent,
    now: DateTime<Utc>,
) -> ProgressUpdate {
    if record.completed {
        return ProgressUpdate {
            progress_pct: 100,
            completed: true,
            just_completed: false,
        };
    }

    record.progress.record(event);
    let progress_pct = kind.progress_pct(&record.progress);
    let just_completed = progress_pct >= 100;
    if just_completed {
        record.completed = true;
        record.completed_at = Some(now);
    }
    ProgressUpdate {
        progress_pct,
        completed: record.completed,
        just_completed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn record(progress: MissionProgress, completed: bool) -> UserMission {
        UserMission {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            mission_id: Uuid::new_v4(),
            progress,
            completed,
            completed_at: completed.then(Utc::now),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    #[case("log_expenses", json!({"expenseCount": 3}))]
    #[case("expense_tracking", json!({"expenseCount": 3}))]
    fn expense_tags_parse_to_the_same_kind(#[case] tag: &str, #[case] reqs: serde_json::Value) {
        let kind = MissionKind::parse(tag, &reqs).expect("parses");
        assert_eq!(kind, MissionKind::LogExpenses { expense_count: 3 });
    }

    #[rstest]
    fn combined_requires_both_counters() {
        let err = MissionKind::parse("combined", &json!({"expenseCount": 2})).expect_err("partial");
        assert!(matches!(err, MissionKindError::MissingRequirement("savingCount")));
    }

    #[rstest]
    fn zero_requirement_is_rejected() {
        MissionKind::parse("log_savings", &json!({"savingCount": 0})).expect_err("zero");
    }

    #[rstest]
    fn unknown_tag_is_rejected() {
        let err = MissionKind::parse("meditate", &json!({})).expect_err("unknown");
        assert!(matches!(err, MissionKindError::UnknownTag(_)));
    }

    #[rstest]
    #[case(MissionKind::LogExpenses { expense_count: 3 }, MissionProgress { expense_count: 1, ..Default::default() }, 33)]
    #[case(MissionKind::LogExpenses { expense_count: 3 }, MissionProgress { expense_count: 3, ..Default::default() }, 100)]
    #[case(MissionKind::LogExpenses { expense_count: 3 }, MissionProgress { expense_count: 5, ..Default::default() }, 100)]
    #[case(MissionKind::Combined { expense_count: 2, saving_count: 2 }, MissionProgress { expense_count: 2, ..Default::default() }, 50)]
    #[case(MissionKind::Combined { expense_count: 2, saving_count: 2 }, MissionProgress { expense_count: 4, saving_count: 1, ..Default::default() }, 75)]
    #[case(MissionKind::TamagotchiCare { feed_count: 2 }, MissionProgress { feed_count: 1, ..Default::default() }, 50)]
    fn progress_percentages(
        #[case] kind: MissionKind,
        #[case] progress: MissionProgress,
        #[case] expected: u8,
    ) {
        assert_eq!(kind.progress_pct(&progress), expected);
    }

    #[rstest]
    fn third_expense_completes_and_reports_transition() {
        let kind = MissionKind::LogExpenses { expense_count: 3 };
        let mut rec = record(
            MissionProgress {
                expense_count: 2,
                ..Default::default()
            },
            false,
        );

        let update = apply_event(&kind, &mut rec, MissionEvent::ExpenseLogged, Utc::now());

        assert_eq!(update.progress_pct, 100);
        assert!(update.completed);
        assert!(update.just_completed);
        assert!(rec.completed);
        assert!(rec.completed_at.is_some());
    }

    #[rstest]
    fn events_after_completion_do_not_transition_again() {
        let kind = MissionKind::LogExpenses { expense_count: 3 };
        let mut rec = record(
            MissionProgress {
                expense_count: 3,
                ..Default::default()
            },
            true,
        );
        let before = rec.clone();

        let update = apply_event(&kind, &mut rec, MissionEvent::ExpenseLogged, Utc::now());

        assert!(update.completed);
        assert!(!update.just_completed);
        assert_eq!(rec, before, "completed record must not change");
    }

    #[rstest]
    fn unrelated_events_do_not_complete_a_care_mission() {
        let kind = MissionKind::TamagotchiCare { feed_count: 1 };
        let mut rec = record(MissionProgress::default(), false);

        let update = apply_event(&kind, &mut rec, MissionEvent::ExpenseLogged, Utc::now());

        assert_eq!(update.progress_pct, 0);
        assert!(!update.completed);
    }

    #[rstest]
    fn progress_serde_round_trips_camel_case() {
        let progress = MissionProgress {
            expense_count: 2,
            saving_count: 1,
            feed_count: 0,
        };
        let value = serde_json::to_value(progress).expect("serialise");
        assert_eq!(value, json!({"expenseCount": 2, "savingCount": 1, "feedCount": 0}));
        let back: MissionProgress = serde_json::from_value(json!({"expenseCount": 2, "savingCount": 1}))
            .expect("missing counters default");
        assert_eq!(back.expense_count, 2);
        assert_eq!(back.feed_count, 0);
    }
}
