//! Investment API endpoints

use std::collections::HashMap;

use api_types::Created;
use api_types::investment::{
    InvestmentKind, InvestmentNew, InvestmentPatch, KindTotalsView, PortfolioView, PositionView,
    TradeAction, TradeView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use engine::users;

fn kind_to_engine(kind: InvestmentKind) -> engine::InvestmentKind {
    match kind {
        InvestmentKind::Stocks => engine::InvestmentKind::Stocks,
        InvestmentKind::Bonds => engine::InvestmentKind::Bonds,
        InvestmentKind::MutualFunds => engine::InvestmentKind::MutualFunds,
        InvestmentKind::Etfs => engine::InvestmentKind::Etfs,
        InvestmentKind::Crypto => engine::InvestmentKind::Crypto,
        InvestmentKind::RealEstate => engine::InvestmentKind::RealEstate,
        InvestmentKind::Other => engine::InvestmentKind::Other,
    }
}

fn kind_from_engine(kind: engine::InvestmentKind) -> InvestmentKind {
    match kind {
        engine::InvestmentKind::Stocks => InvestmentKind::Stocks,
        engine::InvestmentKind::Bonds => InvestmentKind::Bonds,
        engine::InvestmentKind::MutualFunds => InvestmentKind::MutualFunds,
        engine::InvestmentKind::Etfs => InvestmentKind::Etfs,
        engine::InvestmentKind::Crypto => InvestmentKind::Crypto,
        engine::InvestmentKind::RealEstate => InvestmentKind::RealEstate,
        engine::InvestmentKind::Other => InvestmentKind::Other,
    }
}

fn action_from_engine(action: engine::HistoryAction) -> TradeAction {
    match action {
        engine::HistoryAction::Buy => TradeAction::Buy,
        engine::HistoryAction::Sell => TradeAction::Sell,
        engine::HistoryAction::Dividend => TradeAction::Dividend,
        engine::HistoryAction::Split => TradeAction::Split,
    }
}

fn position_view(position: &engine::PositionView) -> PositionView {
    PositionView {
        id: position.id,
        kind: kind_from_engine(position.kind),
        symbol: position.symbol.clone(),
        name: position.name.clone(),
        quantity: position.quantity,
        purchase_price_cents: position.purchase_price_cents,
        current_price_cents: position.current_price_cents,
        current_value_cents: position.current_value_cents,
        total_return_cents: position.total_return_cents,
        return_percentage: position.return_percentage,
    }
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<PositionView>>, ServerError> {
    let positions = state
        .engine
        .list_investments(&user.username, Utc::now())
        .await?;
    Ok(Json(
        positions
            .iter()
            .map(|inv| position_view(&engine::PositionView::from(inv)))
            .collect(),
    ))
}

pub async fn history(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<TradeView>>, ServerError> {
    let trades = state.engine.investment_trades(id, &user.username).await?;
    Ok(Json(
        trades
            .into_iter()
            .map(|t| TradeView {
                id: t.id,
                date: t.date,
                price_cents: t.price_cents,
                action: action_from_engine(t.action),
                quantity: t.quantity,
                amount_cents: t.amount_cents,
            })
            .collect(),
    ))
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<InvestmentNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let draft = engine::InvestmentDraft {
        kind: kind_to_engine(payload.kind),
        symbol: payload.symbol,
        name: payload.name,
        quantity: payload.quantity,
        purchase_price_cents: payload.purchase_price_cents,
        purchase_date: payload.purchase_date,
        current_price_cents: payload.current_price_cents,
        notes: payload.notes,
    };

    let id = state
        .engine
        .create_investment(&user.username, &user.family_id, draft, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<InvestmentPatch>,
) -> Result<Json<PositionView>, ServerError> {
    let update = engine::InvestmentUpdate {
        name: payload.name,
        quantity: payload.quantity,
        current_price_cents: payload.current_price_cents,
        notes: payload.notes,
    };

    let investment = state
        .engine
        .update_investment(id, &user.username, update, Utc::now())
        .await?;
    Ok(Json(position_view(&engine::PositionView::from(
        &investment,
    ))))
}

pub async fn delete(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_investment(id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn portfolio(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<PortfolioView>, ServerError> {
    let summary = state.engine.portfolio_summary(&user.username).await?;

    let by_kind: HashMap<InvestmentKind, KindTotalsView> = summary
        .by_kind
        .into_iter()
        .map(|(kind, totals)| {
            (
                kind_from_engine(kind),
                KindTotalsView {
                    value_cents: totals.value_cents,
                    return_cents: totals.return_cents,
                    count: totals.count,
                },
            )
        })
        .collect();

    Ok(Json(PortfolioView {
        total_value_cents: summary.total_value_cents,
        total_cost_cents: summary.total_cost_cents,
        total_return_cents: summary.total_return_cents,
        total_return_percentage: summary.total_return_percentage,
        by_kind,
        top_performers: summary.top_performers.iter().map(position_view).collect(),
        worst_performers: summary.worst_performers.iter().map(position_view).collect(),
    }))
}
