//! AI adventure orchestrator.
//!
//! Bridges the HTTP surface to the external AI subsystem across the
//! two-phase adventure cycle. Each phase persists the AI's correlation
//! trace id so operators can tie a player-visible event to an external
//! trace.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::adventure::{Adventure, AdventureEvaluation};
use super::error::Error;
use super::goal::Goal;
use super::ports::{
    AdventureSource, AdventureSourceError, AdventureStore, AdventureStoreError, EvaluationRequest,
    GoalStore, NewAdventure, ProfileStore, ScenarioRequest,
};
use super::profile::Profile;
use super::wallet_service::{clamp_limit, map_profile_store_error};

/// How many incomplete goals flow into the generation context.
const GOAL_CONTEXT_LIMIT: i64 = 3;

#[derive(Clone)]
pub struct AdventureService {
    adventures: Arc<dyn AdventureStore>,
    profiles: Arc<dyn ProfileStore>,
    goals: Arc<dyn GoalStore>,
    source: Arc<dyn AdventureSource>,
}

impl AdventureService {
    pub fn new(
        adventures: Arc<dyn AdventureStore>,
        profiles: Arc<dyn ProfileStore>,
        goals: Arc<dyn GoalStore>,
        source: Arc<dyn AdventureSource>,
    ) -> Self {
        Self {
            adventures,
            profiles,
            goals,
            source,
        }
    }

    /// Generate a new adventure. Not idempotent: every call produces a new
    /// unsubmitted adventure row.
    pub async fn generate(
        &self,
        user_id: Uuid,
        context: Option<&str>,
    ) -> Result<Adventure, Error> {
        let profile = self.require_profile(user_id).await?;
        let goals = self
            .goals
            .recent_incomplete(user_id, GOAL_CONTEXT_LIMIT)
            .await
            .map_err(|err| Error::internal(format!("goal context load failed: {err}")))?;

        let generated = self
            .source
            .generate(ScenarioRequest {
                user_age: profile.age,
                allowance: profile.allowance,
                goal_context: build_goal_context(&goals, context),
                recent_activities: Vec::new(),
            })
            .await
            .map_err(map_source_error)?;

        self.adventures
            .insert(
                NewAdventure {
                    user_id,
                    scenario: generated.scenario,
                    choices: generated.choices,
                    generation_trace_id: generated.trace_id,
                },
                Utc::now(),
            )
            .await
            .map_err(map_store_error)
    }

    /// One-shot transition from unsubmitted to evaluated.
    ///
    /// If the AI call fails the adventure stays unsubmitted and the caller
    /// may retry with the same choice. A racing duplicate submission loses
    /// at the store with `AlreadySubmitted`.
    pub async fn submit_choice(
        &self,
        user_id: Uuid,
        adventure_id: Uuid,
        choice_index: i32,
    ) -> Result<Adventure, Error> {
        let adventure = self.require_adventure(adventure_id, user_id).await?;
        let choice_text = adventure.check_submission(choice_index)?.to_owned();
        let profile = self.require_profile(user_id).await?;

        let evaluation = self
            .source
            .evaluate(EvaluationRequest {
                scenario: adventure.scenario.clone(),
                choice_index,
                choice_text,
                user_age: profile.age,
            })
            .await
            .map_err(map_source_error)?;

        self.adventures
            .record_evaluation(
                adventure_id,
                user_id,
                AdventureEvaluation {
                    choice_index,
                    feedback: evaluation.feedback,
                    scores: evaluation.scores,
                    trace_id: evaluation.trace_id,
                    evaluated_at: Utc::now(),
                },
            )
            .await
            .map_err(map_store_error)
    }

    pub async fn get(&self, user_id: Uuid, adventure_id: Uuid) -> Result<Adventure, Error> {
        self.require_adventure(adventure_id, user_id).await
    }

    pub async fn history(
        &self,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<Adventure>, Error> {
        self.adventures
            .history(user_id, clamp_limit(limit))
            .await
            .map_err(map_store_error)
    }

    async fn require_profile(&self, user_id: Uuid) -> Result<Profile, Error> {
        self.profiles
            .find_by_user(user_id)
            .await
            .map_err(map_profile_store_error)?
            .ok_or_else(|| Error::not_found("profile not found"))
    }

    async fn require_adventure(
        &self,
        adventure_id: Uuid,
        user_id: Uuid,
    ) -> Result<Adventure, Error> {
        self.adventures
            .find(adventure_id, user_id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found("adventure not found"))
    }
}

/// Build the generation goal context: up to three incomplete goals as
/// `title (current/target)` fragments, followed by any caller context.
fn build_goal_context(goals: &[Goal], extra: Option<&str>) -> Option<String> {
    let fragments: Vec<String> = goals
        .iter()
        .map(|goal| {
            format!(
                "{} ({}/{})",
                goal.title,
                goal.current_amount.normalize(),
                goal.target_amount.normalize()
            )
        })
        .collect();

    let extra = extra.map(str::trim).filter(|s| !s.is_empty());
    match (fragments.is_empty(), extra) {
        (true, None) => None,
        (true, Some(extra)) => Some(extra.to_owned()),
        (false, None) => Some(fragments.join("; ")),
        (false, Some(extra)) => Some(format!("{}. {extra}", fragments.join("; "))),
    }
}

fn map_source_error(error: AdventureSourceError) -> Error {
    match error {
        AdventureSourceError::Timeout { message }
        | AdventureSourceError::Transport { message }
        | AdventureSourceError::Unavailable { message } => Error::service_unavailable(message),
        AdventureSourceError::Rejected { message } | AdventureSourceError::Decode { message } => {
            Error::internal(message)
        }
    }
}

fn map_store_error(error: AdventureStoreError) -> Error {
    match error {
        AdventureStoreError::AdventureNotFound => Error::not_found("adventure not found"),
        AdventureStoreError::AlreadySubmitted => {
            Error::already_submitted("a choice was already submitted for this adventure")
        }
        AdventureStoreError::Connection { message } => {
            Error::service_unavailable(format!("adventure store unavailable: {message}"))
        }
        AdventureStoreError::Query { message } => {
            Error::internal(format!("adventure store error: {message}"))
        }
    }
}

#[cfg(test)]
#[path = "adventure_service_tests.rs"]
mod tests;
