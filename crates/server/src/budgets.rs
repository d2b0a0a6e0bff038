//! Budget API endpoints

use api_types::Created;
use api_types::budget::{
    BudgetNew, BudgetPatch, BudgetSummaryView, BudgetView, CategorySpendView, CategoryView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use engine::users;

fn view(budget: &engine::Budget) -> BudgetView {
    BudgetView {
        id: budget.id,
        year: budget.year,
        month: budget.month,
        total_cents: budget.total_cents,
        categories: budget
            .categories
            .iter()
            .map(|c| CategoryView {
                id: c.id,
                name: c.name.clone(),
                limit_cents: c.limit_cents,
            })
            .collect(),
    }
}

fn category_drafts(categories: Vec<api_types::budget::CategoryNew>) -> Vec<engine::CategoryDraft> {
    categories
        .into_iter()
        .map(|c| engine::CategoryDraft {
            name: c.name,
            limit_cents: c.limit_cents,
        })
        .collect()
}

pub async fn for_month(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<Json<BudgetView>, ServerError> {
    let budget = state
        .engine
        .budget_for_month(&user.family_id, year, month)
        .await?;
    Ok(Json(view(&budget)))
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<BudgetNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let draft = engine::BudgetDraft {
        year: payload.year,
        month: payload.month,
        total_cents: payload.total_cents,
        categories: category_drafts(payload.categories),
    };

    let id = state.engine.create_budget(&user.family_id, draft).await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BudgetPatch>,
) -> Result<Json<BudgetView>, ServerError> {
    let update = engine::BudgetUpdate {
        total_cents: payload.total_cents,
        categories: payload.categories.map(category_drafts),
    };

    let budget = state
        .engine
        .update_budget(id, &user.family_id, update)
        .await?;
    Ok(Json(view(&budget)))
}

pub async fn summary(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<Json<BudgetSummaryView>, ServerError> {
    let summary = state
        .engine
        .budget_summary(&user.family_id, year, month)
        .await?;
    Ok(Json(BudgetSummaryView {
        budget_id: summary.budget_id,
        year: summary.year,
        month: summary.month,
        total_cents: summary.total_cents,
        categories: summary
            .categories
            .into_iter()
            .map(|c| CategorySpendView {
                name: c.name,
                limit_cents: c.limit_cents,
                spent_cents: c.spent_cents,
            })
            .collect(),
        total_spent_cents: summary.total_spent_cents,
    }))
}
