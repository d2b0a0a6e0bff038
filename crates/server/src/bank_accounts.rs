//! Bank account API endpoints

use api_types::Created;
use api_types::bank_account::{AccountKind, BankAccountNew, BankAccountPatch, BankAccountView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use engine::users;

fn kind_to_engine(kind: AccountKind) -> engine::AccountKind {
    match kind {
        AccountKind::Checking => engine::AccountKind::Checking,
        AccountKind::Savings => engine::AccountKind::Savings,
        AccountKind::Credit => engine::AccountKind::Credit,
        AccountKind::Investment => engine::AccountKind::Investment,
        AccountKind::Loan => engine::AccountKind::Loan,
    }
}

fn kind_from_engine(kind: engine::AccountKind) -> AccountKind {
    match kind {
        engine::AccountKind::Checking => AccountKind::Checking,
        engine::AccountKind::Savings => AccountKind::Savings,
        engine::AccountKind::Credit => AccountKind::Credit,
        engine::AccountKind::Investment => AccountKind::Investment,
        engine::AccountKind::Loan => AccountKind::Loan,
    }
}

fn view(account: &engine::BankAccount) -> BankAccountView {
    BankAccountView {
        id: account.id,
        bank_name: account.bank_name.clone(),
        kind: kind_from_engine(account.kind),
        account_number: account.account_number.clone(),
        balance_cents: account.balance_cents,
        currency: account.currency.clone(),
        is_active: account.is_active,
        last_sync: account.last_sync,
    }
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<BankAccountView>>, ServerError> {
    let accounts = state.engine.list_bank_accounts(&user.username).await?;
    Ok(Json(accounts.iter().map(view).collect()))
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<BankAccountNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let draft = engine::BankAccountDraft {
        bank_name: payload.bank_name,
        kind: kind_to_engine(payload.kind),
        account_number: payload.account_number,
        balance_cents: payload.balance_cents,
        currency: payload.currency,
    };

    let id = state
        .engine
        .create_bank_account(&user.username, &user.family_id, draft, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BankAccountPatch>,
) -> Result<Json<BankAccountView>, ServerError> {
    let update = engine::BankAccountUpdate {
        bank_name: payload.bank_name,
        balance_cents: payload.balance_cents,
        is_active: payload.is_active,
    };

    let account = state
        .engine
        .update_bank_account(id, &user.username, update, Utc::now())
        .await?;
    Ok(Json(view(&account)))
}

pub async fn delete(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_bank_account(id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}
