//! Behaviour coverage for the adventure orchestrator.

use std::sync::Arc;

use chrono::Utc;
use rstest::rstest;
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::*;
use crate::domain::error::ErrorCode;
use crate::domain::ports::adventure_source::MockAdventureSource;
use crate::domain::ports::adventure_store::MockAdventureStore;
use crate::domain::ports::fixtures::{
    fixture_adventure, fixture_goal, fixture_scores, FixtureAdventureSource,
    FixtureAdventureStore, FixtureGoalStore, FixtureProfileStore, FIXTURE_ADVENTURE_ID,
    FIXTURE_USER_ID,
};
use crate::domain::ports::{ChoiceEvaluation, GeneratedScenario};

fn service() -> AdventureService {
    AdventureService::new(
        Arc::new(FixtureAdventureStore),
        Arc::new(FixtureProfileStore),
        Arc::new(FixtureGoalStore),
        Arc::new(FixtureAdventureSource),
    )
}

fn service_with(
    adventures: MockAdventureStore,
    source: MockAdventureSource,
) -> AdventureService {
    AdventureService::new(
        Arc::new(adventures),
        Arc::new(FixtureProfileStore),
        Arc::new(FixtureGoalStore),
        Arc::new(source),
    )
}

#[rstest]
#[tokio::test]
async fn generate_persists_scenario_and_trace_id() {
    let adventure = service()
        .generate(FIXTURE_USER_ID, None)
        .await
        .expect("generates");

    assert_eq!(adventure.scenario, "Kamu menemukan Rp 10.000");
    assert_eq!(adventure.choices.len(), 2);
    assert_eq!(adventure.generation_trace_id, "t1");
    assert!(adventure.selected_choice_index.is_none());
}

#[rstest]
#[tokio::test]
async fn generate_without_profile_is_not_found() {
    let err = service()
        .generate(Uuid::new_v4(), None)
        .await
        .expect_err("no profile");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn generate_sends_age_allowance_and_goal_context() {
    let mut source = MockAdventureSource::new();
    source
        .expect_generate()
        .withf(|request| {
            request.user_age == 10
                && request.allowance == dec!(70000.00)
                && request
                    .goal_context
                    .as_deref()
                    .is_some_and(|ctx| ctx.contains("bike (250/1000)"))
        })
        .returning(|_| {
            Ok(GeneratedScenario {
                scenario: "s".to_owned(),
                choices: vec!["a".to_owned(), "b".to_owned()],
                trace_id: "t1".to_owned(),
            })
        });

    service_with(fixture_store(), source)
        .generate(FIXTURE_USER_ID, None)
        .await
        .expect("generates");
}

#[rstest]
#[tokio::test]
async fn generate_appends_caller_context_after_goals() {
    let mut source = MockAdventureSource::new();
    source
        .expect_generate()
        .withf(|request| {
            request.goal_context.as_deref() == Some("bike (250/1000). liburan sekolah")
        })
        .returning(|_| {
            Ok(GeneratedScenario {
                scenario: "s".to_owned(),
                choices: vec!["a".to_owned(), "b".to_owned()],
                trace_id: "t1".to_owned(),
            })
        });

    service_with(fixture_store(), source)
        .generate(FIXTURE_USER_ID, Some("liburan sekolah"))
        .await
        .expect("generates");
}

#[rstest]
#[tokio::test]
async fn exhausted_ai_surfaces_service_unavailable_and_persists_nothing() {
    let mut source = MockAdventureSource::new();
    source
        .expect_generate()
        .returning(|_| Err(AdventureSourceError::unavailable("3 attempts failed")));
    let mut adventures = MockAdventureStore::new();
    adventures.expect_insert().never();

    let err = service_with(adventures, source)
        .generate(FIXTURE_USER_ID, None)
        .await
        .expect_err("unavailable");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn submit_choice_records_evaluation_with_trace_id() {
    let adventure = service()
        .submit_choice(FIXTURE_USER_ID, FIXTURE_ADVENTURE_ID, 0)
        .await
        .expect("submits");

    assert_eq!(adventure.selected_choice_index, Some(0));
    assert_eq!(adventure.feedback.as_deref(), Some("Pilihan bagus"));
    assert_eq!(adventure.evaluation_trace_id.as_deref(), Some("t2"));
    assert!(adventure.evaluated_at.is_some());
    let scores = adventure.scores.expect("scores persisted");
    assert_eq!(scores.get("goal_alignment"), Some(0.95));
}

#[rstest]
#[tokio::test]
async fn submit_choice_sends_the_selected_choice_text() {
    let mut source = MockAdventureSource::new();
    source
        .expect_evaluate()
        .withf(|request| {
            request.choice_index == 1 && request.choice_text == "Jajan" && request.user_age == 10
        })
        .returning(|_| {
            Ok(ChoiceEvaluation {
                feedback: "ok".to_owned(),
                scores: fixture_scores(),
                trace_id: "t2".to_owned(),
            })
        });

    service_with(fixture_store(), source)
        .submit_choice(FIXTURE_USER_ID, FIXTURE_ADVENTURE_ID, 1)
        .await
        .expect("submits");
}

#[rstest]
#[case(2)]
#[case(5)]
#[case(-1)]
#[tokio::test]
async fn out_of_range_choice_is_rejected_without_an_ai_call(#[case] index: i32) {
    let mut source = MockAdventureSource::new();
    source.expect_evaluate().never();

    let err = service_with(fixture_store(), source)
        .submit_choice(FIXTURE_USER_ID, FIXTURE_ADVENTURE_ID, index)
        .await
        .expect_err("invalid");
    assert_eq!(err.code(), ErrorCode::InvalidChoice);
}

#[rstest]
#[tokio::test]
async fn resubmission_is_rejected_without_an_ai_call() {
    let mut adventures = MockAdventureStore::new();
    adventures.expect_find().returning(|_, _| {
        let mut adventure = fixture_adventure();
        adventure.selected_choice_index = Some(0);
        Ok(Some(adventure))
    });
    let mut source = MockAdventureSource::new();
    source.expect_evaluate().never();

    let err = service_with(adventures, source)
        .submit_choice(FIXTURE_USER_ID, FIXTURE_ADVENTURE_ID, 0)
        .await
        .expect_err("already submitted");
    assert_eq!(err.code(), ErrorCode::AlreadySubmitted);
}

#[rstest]
#[tokio::test]
async fn racing_submission_loses_at_the_store() {
    let mut adventures = MockAdventureStore::new();
    adventures
        .expect_find()
        .returning(|_, _| Ok(Some(fixture_adventure())));
    adventures
        .expect_record_evaluation()
        .returning(|_, _, _| Err(AdventureStoreError::already_submitted()));

    let mut source = MockAdventureSource::new();
    source.expect_evaluate().returning(|_| {
        Ok(ChoiceEvaluation {
            feedback: "ok".to_owned(),
            scores: fixture_scores(),
            trace_id: "t2".to_owned(),
        })
    });

    let err = service_with(adventures, source)
        .submit_choice(FIXTURE_USER_ID, FIXTURE_ADVENTURE_ID, 0)
        .await
        .expect_err("raced");
    assert_eq!(err.code(), ErrorCode::AlreadySubmitted);
}

#[rstest]
#[tokio::test]
async fn unknown_adventure_is_not_found() {
    let err = service()
        .submit_choice(FIXTURE_USER_ID, Uuid::new_v4(), 0)
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
fn goal_context_is_empty_without_goals_or_context() {
    assert_eq!(build_goal_context(&[], None), None);
}

#[rstest]
fn goal_context_uses_caller_context_alone() {
    assert_eq!(
        build_goal_context(&[], Some(" beli sepatu ")),
        Some("beli sepatu".to_owned())
    );
}

#[rstest]
fn goal_context_joins_goals_with_semicolons() {
    let mut second = fixture_goal();
    second.title = "sepatu".to_owned();
    second.current_amount = dec!(0);
    second.target_amount = dec!(500);

    let context = build_goal_context(&[fixture_goal(), second], None).expect("built");
    assert_eq!(context, "bike (250/1000); sepatu (0/500)");
}

fn fixture_store() -> MockAdventureStore {
    let mut adventures = MockAdventureStore::new();
    adventures
        .expect_find()
        .returning(|_, _| Ok(Some(fixture_adventure())));
    adventures.expect_insert().returning(|new, now| {
        Ok(Adventure {
            id: FIXTURE_ADVENTURE_ID,
            user_id: new.user_id,
            scenario: new.scenario,
            choices: new.choices,
            selected_choice_index: None,
            feedback: None,
            scores: None,
            generation_trace_id: new.generation_trace_id,
            evaluation_trace_id: None,
            created_at: now,
            evaluated_at: None,
        })
    });
    adventures.expect_record_evaluation().returning(
        |_, _, evaluation| {
            let mut adventure = fixture_adventure();
            adventure.selected_choice_index = Some(evaluation.choice_index);
            adventure.feedback = Some(evaluation.feedback);
            adventure.scores = Some(evaluation.scores);
            adventure.evaluation_trace_id = Some(evaluation.trace_id);
            adventure.evaluated_at = Some(Utc::now());
            Ok(adventure)
        },
    );
    adventures
}
