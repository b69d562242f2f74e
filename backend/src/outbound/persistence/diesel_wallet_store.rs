//! PostgreSQL-backed `WalletStore` implementation using Diesel.
//!
//! Credit and debit run in one transaction each: wallet lock/upsert,
//! balance write, and ledger append commit together. A serialization
//! failure reruns the transaction once before surfacing as a conflict.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::ports::{WalletStore, WalletStoreError};
use crate::domain::wallet::{TransactionKind, Wallet, WalletTransaction};

use super::error_mapping::{classify_tx, TxError, TxErrorClass};
use super::models::{WalletRow, WalletTransactionRow};
use super::pool::DbPool;
use super::schema::{wallet_transactions, wallets};
use super::wallet_ops;

#[derive(Clone)]
pub struct DieselWalletStore {
    pool: DbPool,
}

impl DieselWalletStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn run_balance_change(
        &self,
        user_id: Uuid,
        amount: Decimal,
        kind: TransactionKind,
        description: Option<String>,
        debit: bool,
    ) -> Result<WalletRow, TxError> {
        let mut conn = self.pool.get().await?;
        let now = Utc::now();
        conn.transaction(|conn| {
            async move {
                if debit {
                    wallet_ops::debit_in_tx(conn, user_id, amount, kind, description, now).await
                } else {
                    wallet_ops::credit_in_tx(conn, user_id, amount, kind, description, now).await
                }
            }
            .scope_boxed()
        })
        .await
    }
}

fn map_tx_error(error: TxError) -> WalletStoreError {
    match error {
        TxError::InsufficientFunds { .. } => WalletStoreError::insufficient_funds(error.to_string()),
        other => match classify_tx(other) {
            TxErrorClass::Connection(message) => WalletStoreError::connection(message),
            TxErrorClass::Conflict(message) => WalletStoreError::conflict(message),
            TxErrorClass::Query(message) => WalletStoreError::query(message),
        },
    }
}

#[async_trait]
impl WalletStore for DieselWalletStore {
    async fn balance(&self, user_id: Uuid) -> Result<Wallet, WalletStoreError> {
        let run = || async {
            let mut conn = self.pool.get().await?;
            conn.transaction(|conn| {
                async move { wallet_ops::lock_or_create_wallet(conn, user_id).await }.scope_boxed()
            })
            .await
        };

        let row = match run().await {
            Err(error) if error.is_serialization_failure() => run().await,
            other => other,
        }
        .map_err(map_tx_error)?;
        Ok(wallet_ops::wallet_from_row(row))
    }

    async fn credit(
        &self,
        user_id: Uuid,
        amount: Decimal,
        kind: TransactionKind,
        description: Option<String>,
    ) -> Result<Wallet, WalletStoreError> {
        let first = self
            .run_balance_change(user_id, amount, kind, description.clone(), false)
            .await;
        let row = match first {
            Err(error) if error.is_serialization_failure() => {
                self.run_balance_change(user_id, amount, kind, description, false)
                    .await
            }
            other => other,
        }
        .map_err(map_tx_error)?;
        Ok(wallet_ops::wallet_from_row(row))
    }

    async fn debit(
        &self,
        user_id: Uuid,
        amount: Decimal,
        kind: TransactionKind,
        description: Option<String>,
    ) -> Result<Wallet, WalletStoreError> {
        let first = self
            .run_balance_change(user_id, amount, kind, description.clone(), true)
            .await;
        let row = match first {
            Err(error) if error.is_serialization_failure() => {
                self.run_balance_change(user_id, amount, kind, description, true)
                    .await
            }
            other => other,
        }
        .map_err(map_tx_error)?;
        Ok(wallet_ops::wallet_from_row(row))
    }

    async fn history(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<WalletTransaction>, WalletStoreError> {
        let rows: Result<Vec<WalletTransactionRow>, TxError> = async {
            let mut conn = self.pool.get().await?;
            let wallet: Option<WalletRow> = wallets::table
                .filter(wallets::user_id.eq(user_id))
                .select(WalletRow::as_select())
                .first(&mut conn)
                .await
                .optional()?;
            let Some(wallet) = wallet else {
                return Ok(Vec::new());
            };
            let rows = wallet_transactions::table
                .filter(wallet_transactions::wallet_id.eq(wallet.id))
                .order((
                    wallet_transactions::created_at.desc(),
                    wallet_transactions::id.desc(),
                ))
                .limit(limit)
                .select(WalletTransactionRow::as_select())
                .load(&mut conn)
                .await?;
            Ok(rows)
        }
        .await;

        rows.map_err(map_tx_error)?
            .into_iter()
            .map(|row| wallet_ops::transaction_from_row(row).map_err(map_tx_error))
            .collect()
    }
}
