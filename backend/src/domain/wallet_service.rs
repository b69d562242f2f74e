//! Wallet engine service: balance reads, programmatic credit/debit, history.
//!
//! The purchase, mission-reward, and goal-bonus paths credit and debit
//! inside their own store transactions; this service is the front door for
//! direct wallet operations and reads.

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::Error;
use super::money;
use super::ports::{ProfileStore, ProfileStoreError, WalletStore, WalletStoreError};
use super::profile::DEFAULT_CURRENCY;
use super::wallet::{TransactionKind, Wallet, WalletSnapshot, WalletTransaction};

pub const DEFAULT_HISTORY_LIMIT: i64 = 50;
pub const MAX_HISTORY_LIMIT: i64 = 200;

/// Clamp a caller-supplied listing limit into `[1, MAX_HISTORY_LIMIT]`.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT)
}

#[derive(Clone)]
pub struct WalletService {
    wallets: Arc<dyn WalletStore>,
    profiles: Arc<dyn ProfileStore>,
}

impl WalletService {
    pub fn new(wallets: Arc<dyn WalletStore>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { wallets, profiles }
    }

    /// Current balance with the profile's display currency.
    ///
    /// The wallet is created lazily on first read; the currency falls back
    /// to the default before a profile exists.
    pub async fn balance(&self, user_id: Uuid) -> Result<WalletSnapshot, Error> {
        let wallet = self
            .wallets
            .balance(user_id)
            .await
            .map_err(map_wallet_store_error)?;
        let currency = self
            .profiles
            .find_by_user(user_id)
            .await
            .map_err(map_profile_store_error)?
            .map(|profile| profile.currency)
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_owned());

        Ok(WalletSnapshot {
            balance: wallet.balance,
            currency,
        })
    }

    /// Credit a positive amount with a ledger entry.
    pub async fn credit(
        &self,
        user_id: Uuid,
        amount: Decimal,
        kind: TransactionKind,
        description: Option<String>,
    ) -> Result<Wallet, Error> {
        let amount = money::require_positive("amount", amount)?;
        self.wallets
            .credit(user_id, amount, kind, description)
            .await
            .map_err(map_wallet_store_error)
    }

    /// Debit a positive amount with a ledger entry.
    pub async fn debit(
        &self,
        user_id: Uuid,
        amount: Decimal,
        kind: TransactionKind,
        description: Option<String>,
    ) -> Result<Wallet, Error> {
        let amount = money::require_positive("amount", amount)?;
        self.wallets
            .debit(user_id, amount, kind, description)
            .await
            .map_err(map_wallet_store_error)
    }

    /// Newest-first ledger rows.
    pub async fn history(
        &self,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<WalletTransaction>, Error> {
        self.wallets
            .history(user_id, clamp_limit(limit))
            .await
            .map_err(map_wallet_store_error)
    }
}

fn map_wallet_store_error(error: WalletStoreError) -> Error {
    match error {
        WalletStoreError::InsufficientFunds { message } => Error::insufficient_funds(message),
        WalletStoreError::Conflict { message } => Error::conflict(message),
        WalletStoreError::Connection { message } => {
            Error::service_unavailable(format!("wallet store unavailable: {message}"))
        }
        WalletStoreError::Query { message } => {
            Error::internal(format!("wallet store error: {message}"))
        }
    }
}

pub(super) fn map_profile_store_error(error: ProfileStoreError) -> Error {
    match error {
        ProfileStoreError::AlreadyExists => Error::conflict("profile already exists"),
        ProfileStoreError::Connection { message } => {
            Error::service_unavailable(format!("profile store unavailable: {message}"))
        }
        ProfileStoreError::Query { message } => {
            Error::internal(format!("profile store error: {message}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorCode;
    use crate::domain::ports::fixtures::{
        FixtureProfileStore, FixtureWalletStore, FIXTURE_USER_ID,
    };
    use crate::domain::ports::wallet_store::MockWalletStore;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn service() -> WalletService {
        WalletService::new(Arc::new(FixtureWalletStore), Arc::new(FixtureProfileStore))
    }

    #[rstest]
    #[tokio::test]
    async fn balance_reports_profile_currency() {
        let snapshot = service().balance(FIXTURE_USER_ID).await.expect("reads");
        assert_eq!(snapshot.currency, "IDR");
        assert_eq!(snapshot.balance, dec!(50.00));
    }

    #[rstest]
    #[tokio::test]
    async fn balance_falls_back_to_default_currency_without_profile() {
        let snapshot = service()
            .balance(Uuid::new_v4())
            .await
            .expect("wallet is lazily created");
        assert_eq!(snapshot.currency, DEFAULT_CURRENCY);
    }

    #[rstest]
    #[tokio::test]
    async fn credit_rejects_non_positive_amounts_before_the_store() {
        let err = service()
            .credit(FIXTURE_USER_ID, dec!(0), TransactionKind::MissionReward, None)
            .await
            .expect_err("invalid");
        assert_eq!(err.code(), ErrorCode::InvalidAmount);
    }

    #[rstest]
    #[tokio::test]
    async fn debit_maps_insufficient_funds() {
        let err = service()
            .debit(
                FIXTURE_USER_ID,
                dec!(50.01),
                TransactionKind::ShopPurchase,
                None,
            )
            .await
            .expect_err("insufficient");
        assert_eq!(err.code(), ErrorCode::InsufficientFunds);
    }

    #[rstest]
    #[tokio::test]
    async fn debit_of_the_full_balance_succeeds() {
        let wallet = service()
            .debit(
                FIXTURE_USER_ID,
                dec!(50),
                TransactionKind::ShopPurchase,
                None,
            )
            .await
            .expect("exact debit");
        assert_eq!(wallet.balance, dec!(0.00));
    }

    #[rstest]
    #[case(None, DEFAULT_HISTORY_LIMIT)]
    #[case(Some(10), 10)]
    #[case(Some(0), 1)]
    #[case(Some(9999), MAX_HISTORY_LIMIT)]
    fn history_limits_are_clamped(#[case] requested: Option<i64>, #[case] expected: i64) {
        assert_eq!(clamp_limit(requested), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn store_connection_failures_surface_as_service_unavailable() {
        let mut wallets = MockWalletStore::new();
        wallets
            .expect_balance()
            .returning(|_| Err(WalletStoreError::connection("pool exhausted")));
        let service = WalletService::new(Arc::new(wallets), Arc::new(FixtureProfileStore));

        let err = service
            .balance(FIXTURE_USER_ID)
            .await
            .expect_err("unavailable");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
