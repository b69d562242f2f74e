//! Wallet endpoints.
//!
//! ```text
//! GET /api/wallet
//! GET /api/wallet/history
//! ```

use actix_web::{get, web};
use serde::Serialize;

use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::schemas::{money, WalletTransactionBody};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::LimitQuery;
use crate::inbound::http::ApiResult;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletBody {
    pub balance: f64,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletHistoryBody {
    pub transactions: Vec<WalletTransactionBody>,
}

/// Current balance; the wallet is created lazily on first read.
#[get("/wallet")]
pub async fn get_wallet(
    state: web::Data<HttpState>,
    auth: AuthContext,
) -> ApiResult<web::Json<WalletBody>> {
    let snapshot = state.wallet.balance(auth.user_id()).await?;
    Ok(web::Json(WalletBody {
        balance: money(snapshot.balance),
        currency: snapshot.currency,
    }))
}

/// Newest-first ledger rows.
#[get("/wallet/history")]
pub async fn wallet_history(
    state: web::Data<HttpState>,
    auth: AuthContext,
    query: web::Query<LimitQuery>,
) -> ApiResult<web::Json<WalletHistoryBody>> {
    let transactions = state.wallet.history(auth.user_id(), query.limit).await?;
    Ok(web::Json(WalletHistoryBody {
        transactions: transactions
            .into_iter()
            .map(WalletTransactionBody::from)
            .collect(),
    }))
}
