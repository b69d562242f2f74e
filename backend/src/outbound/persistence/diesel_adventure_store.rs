//! PostgreSQL-backed `AdventureStore` implementation using Diesel.
//!
//! The evaluation write is an idempotent UPDATE guarded on
//! `selected_choice_index IS NULL`: the first submission wins, a racing
//! duplicate updates zero rows and surfaces `AlreadySubmitted`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::adventure::{Adventure, AdventureEvaluation, AdventureScores};
use crate::domain::ports::{AdventureStore, AdventureStoreError, NewAdventure};

use super::error_mapping::{classify_tx, TxError, TxErrorClass};
use super::models::{AdventureEvaluationUpdate, AdventureRow, NewAdventureRow};
use super::pool::DbPool;
use super::schema::adventures;

#[derive(Clone)]
pub struct DieselAdventureStore {
    pool: DbPool,
}

impl DieselAdventureStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn adventure_from_row(row: AdventureRow) -> Result<Adventure, TxError> {
    let choices: Vec<String> = serde_json::from_value(row.choices)
        .map_err(|err| TxError::corrupt(format!("adventure {} choices: {err}", row.id)))?;
    let scores = row
        .scores
        .map(|value| {
            let raw: BTreeMap<String, f64> = serde_json::from_value(value)
                .map_err(|err| TxError::corrupt(format!("adventure {} scores: {err}", row.id)))?;
            AdventureScores::try_new(raw)
                .map_err(|err| TxError::corrupt(format!("adventure {} scores: {err}", row.id)))
        })
        .transpose()?;

    Ok(Adventure {
        id: row.id,
        user_id: row.user_id,
        scenario: row.scenario,
        choices,
        selected_choice_index: row.selected_choice_index,
        feedback: row.feedback,
        scores,
        generation_trace_id: row.generation_trace_id,
        evaluation_trace_id: row.evaluation_trace_id,
        created_at: row.created_at,
        evaluated_at: row.evaluated_at,
    })
}

fn map_tx_error(error: TxError) -> AdventureStoreError {
    match classify_tx(error) {
        TxErrorClass::Connection(message) => AdventureStoreError::connection(message),
        TxErrorClass::Conflict(message) | TxErrorClass::Query(message) => {
            AdventureStoreError::query(message)
        }
    }
}

#[async_trait]
impl AdventureStore for DieselAdventureStore {
    async fn insert(
        &self,
        adventure: NewAdventure,
        now: DateTime<Utc>,
    ) -> Result<Adventure, AdventureStoreError> {
        let result: Result<Adventure, TxError> = async {
            let mut conn = self.pool.get().await?;
            let choices = serde_json::to_value(&adventure.choices)
                .map_err(|err| TxError::corrupt(format!("adventure choices: {err}")))?;
            let row: AdventureRow = diesel::insert_into(adventures::table)
                .values(NewAdventureRow {
                    id: Uuid::new_v4(),
                    user_id: adventure.user_id,
                    scenario: adventure.scenario,
                    choices,
                    generation_trace_id: adventure.generation_trace_id,
                    created_at: now,
                })
                .returning(AdventureRow::as_returning())
                .get_result(&mut conn)
                .await?;
            adventure_from_row(row)
        }
        .await;
        result.map_err(map_tx_error)
    }

    async fn find(
        &self,
        adventure_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Adventure>, AdventureStoreError> {
        let result: Result<Option<Adventure>, TxError> = async {
            let mut conn = self.pool.get().await?;
            let row: Option<AdventureRow> = adventures::table
                .filter(
                    adventures::id
                        .eq(adventure_id)
                        .and(adventures::user_id.eq(user_id)),
                )
                .select(AdventureRow::as_select())
                .first(&mut conn)
                .await
                .optional()?;
            row.map(adventure_from_row).transpose()
        }
        .await;
        result.map_err(map_tx_error)
    }

    async fn history(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Adventure>, AdventureStoreError> {
        let rows: Result<Vec<AdventureRow>, TxError> = async {
            let mut conn = self.pool.get().await?;
            Ok(adventures::table
                .filter(adventures::user_id.eq(user_id))
                .order((adventures::created_at.desc(), adventures::id.desc()))
                .limit(limit)
                .select(AdventureRow::as_select())
                .load(&mut conn)
                .await?)
        }
        .await;

        rows.map_err(map_tx_error)?
            .into_iter()
            .map(|row| adventure_from_row(row).map_err(map_tx_error))
            .collect()
    }

    async fn record_evaluation(
        &self,
        adventure_id: Uuid,
        user_id: Uuid,
        evaluation: AdventureEvaluation,
    ) -> Result<Adventure, AdventureStoreError> {
        let result: Result<Option<Adventure>, TxError> = async {
            let mut conn = self.pool.get().await?;
            let scores_map: BTreeMap<String, f64> = evaluation.scores.clone().into();
            let scores = serde_json::to_value(scores_map)
                .map_err(|err| TxError::corrupt(format!("adventure scores: {err}")))?;

            let row: Option<AdventureRow> = diesel::update(
                adventures::table.filter(
                    adventures::id
                        .eq(adventure_id)
                        .and(adventures::user_id.eq(user_id))
                        .and(adventures::selected_choice_index.is_null()),
                ),
            )
            .set(AdventureEvaluationUpdate {
                selected_choice_index: evaluation.choice_index,
                feedback: evaluation.feedback,
                scores,
                evaluation_trace_id: evaluation.trace_id,
                evaluated_at: evaluation.evaluated_at,
            })
            .returning(AdventureRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?;
            row.map(adventure_from_row).transpose()
        }
        .await;

        match result.map_err(map_tx_error)? {
            Some(adventure) => Ok(adventure),
            // Zero rows: either the adventure is gone or another request
            // already submitted. Disambiguate with a scoped read.
            None => match self.find(adventure_id, user_id).await? {
                Some(_) => Err(AdventureStoreError::already_submitted()),
                None => Err(AdventureStoreError::adventure_not_found()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn row(choices: serde_json::Value, scores: Option<serde_json::Value>) -> AdventureRow {
        AdventureRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            scenario: "Kamu menemukan Rp 10.000".to_owned(),
            choices,
            selected_choice_index: None,
            feedback: None,
            scores,
            generation_trace_id: "t1".to_owned(),
            evaluation_trace_id: None,
            created_at: Utc::now(),
            evaluated_at: None,
        }
    }

    #[rstest]
    fn rows_convert_with_choice_arrays_and_score_maps() {
        let adventure = adventure_from_row(row(
            json!(["Menabung", "Jajan"]),
            Some(json!({"goal_alignment": 0.95})),
        ))
        .expect("converts");
        assert_eq!(adventure.choices.len(), 2);
        assert_eq!(
            adventure.scores.expect("scores").get("goal_alignment"),
            Some(0.95)
        );
    }

    #[rstest]
    fn malformed_choice_json_is_corrupt() {
        let err = adventure_from_row(row(json!({"not": "an array"}), None)).expect_err("corrupt");
        assert!(matches!(err, TxError::Corrupt(_)));
    }

    #[rstest]
    fn out_of_range_persisted_scores_are_corrupt() {
        let err = adventure_from_row(row(
            json!(["a", "b"]),
            Some(json!({"goal_alignment": 1.5})),
        ))
        .expect_err("corrupt");
        assert!(matches!(err, TxError::Corrupt(_)));
    }
}
