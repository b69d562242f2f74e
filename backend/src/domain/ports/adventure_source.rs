//! Port for the external AI adventure subsystem.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::adventure::AdventureScores;

use super::macros::port_error;

port_error! {
    /// Errors raised by AI source adapters.
    ///
    /// Retryable failures (timeouts, transport errors, 5xx, 429) are retried
    /// inside the adapter; what surfaces here is the post-retry outcome.
    pub enum AdventureSourceError {
        /// The request or its retries ran out of time.
        Timeout { message } => "AI request timed out: {message}",
        /// The connection failed below the HTTP layer.
        Transport { message } => "AI transport failed: {message}",
        /// Retries were exhausted against a failing service.
        Unavailable { message } => "AI service unavailable: {message}",
        /// The service rejected the request with a non-retryable status.
        Rejected { message } => "AI service rejected the request: {message}",
        /// The response body did not match the protocol.
        Decode { message } => "AI response could not be decoded: {message}",
    }
}

/// Generation request payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioRequest {
    pub user_age: i32,
    pub allowance: Decimal,
    pub goal_context: Option<String>,
    pub recent_activities: Vec<String>,
}

/// Generated scenario with its correlation trace id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedScenario {
    pub scenario: String,
    pub choices: Vec<String>,
    pub trace_id: String,
}

/// Evaluation request payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationRequest {
    pub scenario: String,
    pub choice_index: i32,
    pub choice_text: String,
    pub user_age: i32,
}

/// Evaluation feedback with scores and its correlation trace id.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceEvaluation {
    pub feedback: String,
    pub scores: AdventureScores,
    pub trace_id: String,
}

/// Port for the two AI calls of the adventure cycle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdventureSource: Send + Sync {
    async fn generate(
        &self,
        request: ScenarioRequest,
    ) -> Result<GeneratedScenario, AdventureSourceError>;

    async fn evaluate(
        &self,
        request: EvaluationRequest,
    ) -> Result<ChoiceEvaluation, AdventureSourceError>;
}
