//! Transactions API endpoints

use api_types::transaction::{
    TransactionCreated, TransactionKind as ApiKind, TransactionList, TransactionListResponse,
    TransactionNew, TransactionUpdate, TransactionView, TransferCreated, TransferNew,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Income => ApiKind::Income,
        engine::TransactionKind::Expense => ApiKind::Expense,
    }
}

fn engine_kind(kind: ApiKind) -> engine::TransactionKind {
    match kind {
        ApiKind::Income => engine::TransactionKind::Income,
        ApiKind::Expense => engine::TransactionKind::Expense,
    }
}

fn view(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        wallet_id: tx.wallet_id,
        kind: map_kind(tx.kind),
        occurred_at: tx.occurred_at,
        amount_minor: tx.amount_minor,
        category: tx.category,
        sub_category: tx.sub_category,
        note: tx.note,
        linked_debt_id: tx.linked_debt_id,
    }
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionList>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let limit = payload.limit.unwrap_or(50);
    let txs = state
        .engine
        .transactions_for_wallet(payload.wallet_id, &user.username, limit)
        .await?;

    Ok(Json(TransactionListResponse {
        transactions: txs.into_iter().map(view).collect(),
    }))
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionCreated>), ServerError> {
    // Free-text amount: "20000+5000" and friends. A result of zero is
    // rejected by the engine as an invalid amount.
    let amount_minor = engine::evaluate_amount(&payload.amount);
    let occurred_at = payload.occurred_at.unwrap_or_else(Utc::now);

    let mut cmd = engine::CreateTransactionCmd::new(
        payload.wallet_id,
        user.username.clone(),
        engine_kind(payload.kind),
        amount_minor,
        payload.category,
        occurred_at,
    );
    if let Some(sub_category) = payload.sub_category {
        cmd = cmd.sub_category(sub_category);
    }
    if let Some(note) = payload.note {
        cmd = cmd.note(note);
    }
    if let Some(debt_id) = payload.linked_debt_id {
        cmd = cmd.linked_debt_id(debt_id);
    }

    let id = state.engine.create_transaction(cmd).await?;
    Ok((StatusCode::CREATED, Json(TransactionCreated { id })))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<StatusCode, ServerError> {
    let mut cmd = engine::UpdateTransactionCmd::new(id, user.username.clone());
    if let Some(amount) = payload.amount.as_deref() {
        cmd = cmd.amount_minor(engine::evaluate_amount(amount));
    }
    if let Some(kind) = payload.kind {
        cmd = cmd.kind(engine_kind(kind));
    }
    if let Some(wallet_id) = payload.wallet_id {
        cmd = cmd.wallet_id(wallet_id);
    }
    if let Some(category) = payload.category {
        cmd = cmd.category(category);
    }
    if let Some(sub_category) = payload.sub_category {
        cmd = cmd.sub_category(sub_category);
    }
    if let Some(note) = payload.note {
        cmd = cmd.note(note);
    }
    if let Some(occurred_at) = payload.occurred_at {
        cmd = cmd.occurred_at(occurred_at);
    }

    state.engine.update_transaction(cmd).await?;
    Ok(StatusCode::OK)
}

pub async fn delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_transaction(id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn transfer(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TransferNew>,
) -> Result<(StatusCode, Json<TransferCreated>), ServerError> {
    let amount_minor = engine::evaluate_amount(&payload.amount);
    let occurred_at = payload.occurred_at.unwrap_or_else(Utc::now);

    let mut cmd = engine::TransferCmd::new(
        payload.from_wallet_id,
        payload.to_wallet_id,
        user.username.clone(),
        amount_minor,
        occurred_at,
    );
    if let Some(note) = payload.note {
        cmd = cmd.note(note);
    }

    let (expense_id, income_id) = state.engine.transfer(cmd).await?;
    Ok((
        StatusCode::CREATED,
        Json(TransferCreated {
            expense_id,
            income_id,
        }),
    ))
}
