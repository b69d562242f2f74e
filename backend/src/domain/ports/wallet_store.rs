//! Port for the wallet balance and its transaction ledger.

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::wallet::{TransactionKind, Wallet, WalletTransaction};

use super::macros::port_error;

port_error! {
    /// Errors raised by wallet store adapters.
    pub enum WalletStoreError {
        /// The balance does not cover the requested debit.
        InsufficientFunds { message } => "{message}",
        /// A concurrent update won the race after the retry.
        Conflict { message } => "wallet update conflicted: {message}",
        /// Repository connection could not be established.
        Connection { message } => "wallet store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message } => "wallet store query failed: {message}",
    }
}

/// Port for atomic balance changes with ledger appends.
///
/// Implementations must apply the balance change and its ledger row in one
/// transaction so the signed ledger sum always equals the balance.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletStore: Send + Sync {
    /// Read the wallet, creating it with a zero balance if absent.
    async fn balance(&self, user_id: Uuid) -> Result<Wallet, WalletStoreError>;

    /// Add a positive amount and append a `+amount` ledger row.
    async fn credit(
        &self,
        user_id: Uuid,
        amount: Decimal,
        kind: TransactionKind,
        description: Option<String>,
    ) -> Result<Wallet, WalletStoreError>;

    /// Subtract a positive amount and append a `-amount` ledger row.
    async fn debit(
        &self,
        user_id: Uuid,
        amount: Decimal,
        kind: TransactionKind,
        description: Option<String>,
    ) -> Result<Wallet, WalletStoreError>;

    /// Newest-first ledger rows, at most `limit`.
    async fn history(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<WalletTransaction>, WalletStoreError>;
}
