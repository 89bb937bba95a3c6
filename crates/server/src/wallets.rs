//! Wallets API endpoints.

use api_types::wallet::{
    OverdraftCheck, OverdraftView, WalletCreated, WalletNew, WalletView, WalletsResponse,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn view(wallet: engine::Wallet) -> WalletView {
    WalletView {
        id: wallet.id,
        name: wallet.name,
        balance_minor: wallet.balance,
        is_default: wallet.is_default,
    }
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<WalletsResponse>, ServerError> {
    let wallets = state.engine.wallets(&user.username).await?;

    Ok(Json(WalletsResponse {
        wallets: wallets.into_iter().map(view).collect(),
    }))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WalletView>, ServerError> {
    let wallet = state.engine.wallet(id, &user.username).await?;
    Ok(Json(view(wallet)))
}

pub async fn wallet_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<WalletNew>,
) -> Result<(StatusCode, Json<WalletCreated>), ServerError> {
    let id = state
        .engine
        .new_wallet(
            payload.name.trim(),
            payload.balance_minor.unwrap_or(0),
            payload.is_default.unwrap_or(false),
            &user.username,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(WalletCreated { id })))
}

pub async fn wallet_delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_wallet(id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Advisory pre-check: would an expense of this size push the wallet below
/// zero? The answer never blocks the mutation.
pub async fn overdraft_check(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<OverdraftCheck>,
) -> Result<Json<OverdraftView>, ServerError> {
    if payload.amount_minor <= 0 {
        return Err(ServerError::Generic(
            "amount_minor must be > 0".to_string(),
        ));
    }

    let would_go_negative = state
        .engine
        .would_go_negative(id, payload.amount_minor, &user.username)
        .await?;

    Ok(Json(OverdraftView { would_go_negative }))
}
