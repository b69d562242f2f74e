//! In-transaction wallet operations shared across store adapters.
//!
//! The purchase, mission-reward, and goal-bonus transactions all mutate the
//! wallet; these helpers run inside the caller's transaction scope so the
//! balance change and its ledger row commit or roll back with the rest of
//! the write. The wallet row is locked (or created) first, serialising
//! concurrent updates per user.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::wallet::{TransactionKind, Wallet, WalletTransaction};

use super::error_mapping::TxError;
use super::models::{NewWalletRow, NewWalletTransactionRow, WalletRow, WalletTransactionRow};
use super::schema::{wallet_transactions, wallets};

/// Lock the user's wallet row, creating it with a zero balance if absent.
///
/// The insert tolerates a concurrent creator via `ON CONFLICT DO NOTHING`;
/// the re-select then locks whichever row won.
pub(crate) async fn lock_or_create_wallet(
    conn: &mut AsyncPgConnection,
    user_id: Uuid,
) -> Result<WalletRow, TxError> {
    let existing: Option<WalletRow> = wallets::table
        .filter(wallets::user_id.eq(user_id))
        .select(WalletRow::as_select())
        .for_update()
        .first(conn)
        .await
        .optional()?;

    if let Some(row) = existing {
        return Ok(row);
    }

    diesel::insert_into(wallets::table)
        .values(NewWalletRow {
            id: Uuid::new_v4(),
            user_id,
            balance: Decimal::ZERO,
        })
        .on_conflict(wallets::user_id)
        .do_nothing()
        .execute(conn)
        .await?;

    let row = wallets::table
        .filter(wallets::user_id.eq(user_id))
        .select(WalletRow::as_select())
        .for_update()
        .first(conn)
        .await?;
    Ok(row)
}

/// Credit `amount` and append the `+amount` ledger row.
pub(crate) async fn credit_in_tx(
    conn: &mut AsyncPgConnection,
    user_id: Uuid,
    amount: Decimal,
    kind: TransactionKind,
    description: Option<String>,
    now: DateTime<Utc>,
) -> Result<WalletRow, TxError> {
    let wallet = lock_or_create_wallet(conn, user_id).await?;
    apply_balance_change(conn, wallet, amount, kind, description, now).await
}

/// Debit `amount` and append the `-amount` ledger row.
///
/// Fails with `InsufficientFunds` before writing anything when the locked
/// balance does not cover the amount.
pub(crate) async fn debit_in_tx(
    conn: &mut AsyncPgConnection,
    user_id: Uuid,
    amount: Decimal,
    kind: TransactionKind,
    description: Option<String>,
    now: DateTime<Utc>,
) -> Result<WalletRow, TxError> {
    let wallet = lock_or_create_wallet(conn, user_id).await?;
    if wallet.balance < amount {
        return Err(TxError::InsufficientFunds {
            balance: wallet.balance,
            amount,
        });
    }
    apply_balance_change(conn, wallet, -amount, kind, description, now).await
}

async fn apply_balance_change(
    conn: &mut AsyncPgConnection,
    wallet: WalletRow,
    signed_amount: Decimal,
    kind: TransactionKind,
    description: Option<String>,
    now: DateTime<Utc>,
) -> Result<WalletRow, TxError> {
    let updated: WalletRow = diesel::update(wallets::table.filter(wallets::id.eq(wallet.id)))
        .set((
            wallets::balance.eq(wallet.balance + signed_amount),
            wallets::updated_at.eq(now),
        ))
        .returning(WalletRow::as_returning())
        .get_result(conn)
        .await?;

    diesel::insert_into(wallet_transactions::table)
        .values(NewWalletTransactionRow {
            id: Uuid::new_v4(),
            wallet_id: wallet.id,
            amount: signed_amount,
            transaction_type: kind.as_str().to_owned(),
            description,
        })
        .execute(conn)
        .await?;

    Ok(updated)
}

pub(crate) fn wallet_from_row(row: WalletRow) -> Wallet {
    Wallet {
        id: row.id,
        user_id: row.user_id,
        balance: row.balance,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

pub(crate) fn transaction_from_row(row: WalletTransactionRow) -> Result<WalletTransaction, TxError> {
    let kind: TransactionKind = row
        .transaction_type
        .parse()
        .map_err(|err| TxError::corrupt(format!("wallet ledger: {err}")))?;
    Ok(WalletTransaction {
        id: row.id,
        wallet_id: row.wallet_id,
        amount: row.amount,
        kind,
        description: row.description,
        created_at: row.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn ledger_row(tag: &str) -> WalletTransactionRow {
        WalletTransactionRow {
            id: Uuid::new_v4(),
            wallet_id: Uuid::new_v4(),
            amount: dec!(-15),
            transaction_type: tag.to_owned(),
            description: None,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn ledger_rows_convert_with_known_tags() {
        let converted = transaction_from_row(ledger_row("shop_purchase")).expect("known tag");
        assert_eq!(converted.kind, TransactionKind::ShopPurchase);
        assert_eq!(converted.amount, dec!(-15));
    }

    #[rstest]
    fn ledger_rows_with_unknown_tags_are_corrupt() {
        let err = transaction_from_row(ledger_row("interest")).expect_err("unknown tag");
        assert!(matches!(err, TxError::Corrupt(_)));
    }
}
