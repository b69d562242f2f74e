//! Port for adventure persistence and the write-once evaluation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::adventure::{Adventure, AdventureEvaluation};

use super::macros::port_error;

port_error! {
    /// Errors raised by adventure store adapters.
    pub enum AdventureStoreError {
        /// No adventure with that id belongs to the user.
        AdventureNotFound => "adventure not found",
        /// A choice was already recorded (possibly by a racing request).
        AlreadySubmitted => "a choice was already submitted for this adventure",
        /// Repository connection could not be established.
        Connection { message } => "adventure store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message } => "adventure store query failed: {message}",
    }
}

/// Insert payload for a freshly generated adventure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAdventure {
    pub user_id: Uuid,
    pub scenario: String,
    pub choices: Vec<String>,
    pub generation_trace_id: String,
}

/// Port for adventure rows.
///
/// `record_evaluation` performs the single unsubmitted-to-evaluated write;
/// it is guarded on the unsubmitted state so a racing duplicate loses with
/// `AlreadySubmitted` instead of overwriting.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdventureStore: Send + Sync {
    async fn insert(
        &self,
        adventure: NewAdventure,
        now: DateTime<Utc>,
    ) -> Result<Adventure, AdventureStoreError>;

    async fn find(
        &self,
        adventure_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Adventure>, AdventureStoreError>;

    /// Newest-first adventures, at most `limit`.
    async fn history(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Adventure>, AdventureStoreError>;

    async fn record_evaluation(
        &self,
        adventure_id: Uuid,
        user_id: Uuid,
        evaluation: AdventureEvaluation,
    ) -> Result<Adventure, AdventureStoreError>;
}
