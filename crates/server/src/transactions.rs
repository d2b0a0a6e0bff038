//! Transaction API endpoints

use api_types::Created;
use api_types::transaction::{
    TransactionKind, TransactionListQuery, TransactionNew, TransactionView,
};
use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};
use engine::users;

fn kind_to_engine(kind: TransactionKind) -> engine::TransactionKind {
    match kind {
        TransactionKind::Income => engine::TransactionKind::Income,
        TransactionKind::Expense => engine::TransactionKind::Expense,
    }
}

fn kind_from_engine(kind: engine::TransactionKind) -> TransactionKind {
    match kind {
        engine::TransactionKind::Income => TransactionKind::Income,
        engine::TransactionKind::Expense => TransactionKind::Expense,
    }
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let filter = engine::TransactionListFilter {
        from: query.from,
        to: query.to,
        category: query.category,
    };

    let transactions = state
        .engine
        .list_transactions(&user.family_id, filter)
        .await?;
    Ok(Json(
        transactions
            .into_iter()
            .map(|tx| TransactionView {
                id: tx.id,
                amount_cents: tx.amount_cents,
                kind: kind_from_engine(tx.kind),
                category: tx.category,
                description: tx.description,
                date: tx.date,
                is_shared: tx.is_shared,
            })
            .collect(),
    ))
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let draft = engine::TransactionDraft {
        amount_cents: payload.amount_cents,
        kind: kind_to_engine(payload.kind),
        category: payload.category,
        description: payload.description.unwrap_or_default(),
        date: payload.date,
        is_shared: payload.is_shared,
    };

    let id = state
        .engine
        .create_transaction(&user.username, &user.family_id, draft)
        .await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}
