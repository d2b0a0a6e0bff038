//! Investment primitives and portfolio aggregation.
//!
//! Valuation fields (`current value`, `total return`, `return percentage`)
//! are always derived from quantity and the two stored prices; they are never
//! persisted, so they cannot drift from the authoritative fields.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentKind {
    Stocks,
    Bonds,
    MutualFunds,
    Etfs,
    Crypto,
    RealEstate,
    Other,
}

impl InvestmentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stocks => "stocks",
            Self::Bonds => "bonds",
            Self::MutualFunds => "mutual_funds",
            Self::Etfs => "etfs",
            Self::Crypto => "crypto",
            Self::RealEstate => "real_estate",
            Self::Other => "other",
        }
    }

    /// Only exchange-listed kinds have a refreshable quote.
    pub fn has_quote(self) -> bool {
        matches!(self, Self::Stocks | Self::Etfs)
    }
}

impl TryFrom<&str> for InvestmentKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "stocks" => Ok(Self::Stocks),
            "bonds" => Ok(Self::Bonds),
            "mutual_funds" => Ok(Self::MutualFunds),
            "etfs" => Ok(Self::Etfs),
            "crypto" => Ok(Self::Crypto),
            "real_estate" => Ok(Self::RealEstate),
            "other" => Ok(Self::Other),
            other => Err(EngineError::Validation(format!(
                "invalid investment kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    Buy,
    Sell,
    Dividend,
    Split,
}

impl HistoryAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
            Self::Dividend => "dividend",
            Self::Split => "split",
        }
    }
}

impl TryFrom<&str> for HistoryAction {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            "dividend" => Ok(Self::Dividend),
            "split" => Ok(Self::Split),
            other => Err(EngineError::Validation(format!(
                "invalid history action: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    pub id: Uuid,
    pub user_id: String,
    pub family_id: String,
    pub kind: InvestmentKind,
    pub symbol: String,
    pub name: String,
    pub quantity: f64,
    pub purchase_price_cents: i64,
    pub purchase_date: NaiveDate,
    pub current_price_cents: i64,
    pub last_updated: DateTime<Utc>,
    pub notes: Option<String>,
}

impl Investment {
    pub fn cost_cents(&self) -> i64 {
        (self.quantity * self.purchase_price_cents as f64).round() as i64
    }

    pub fn current_value_cents(&self) -> i64 {
        (self.quantity * self.current_price_cents as f64).round() as i64
    }

    pub fn total_return_cents(&self) -> i64 {
        self.current_value_cents() - self.cost_cents()
    }

    /// `None` for zero-cost positions rather than a NaN/infinity sentinel.
    pub fn return_percentage(&self) -> Option<f64> {
        let cost = self.cost_cents();
        if cost == 0 {
            return None;
        }
        Some(self.total_return_cents() as f64 / cost as f64 * 100.0)
    }
}

/// One row of an investment's append-only trade history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TradeEntry {
    pub id: Uuid,
    pub investment_id: Uuid,
    pub date: NaiveDate,
    pub price_cents: i64,
    pub action: HistoryAction,
    pub quantity: f64,
    pub amount_cents: i64,
}

#[derive(Clone, Debug)]
pub struct InvestmentDraft {
    pub kind: InvestmentKind,
    pub symbol: String,
    pub name: String,
    pub quantity: f64,
    pub purchase_price_cents: i64,
    pub purchase_date: NaiveDate,
    pub current_price_cents: Option<i64>,
    pub notes: Option<String>,
}

/// Partial update; absent fields keep their current value.
#[derive(Clone, Debug, Default)]
pub struct InvestmentUpdate {
    pub name: Option<String>,
    pub quantity: Option<f64>,
    pub current_price_cents: Option<i64>,
    pub notes: Option<String>,
}

impl Investment {
    pub fn new(
        user_id: &str,
        family_id: &str,
        draft: InvestmentDraft,
        now: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        let symbol = draft.symbol.trim().to_string();
        if symbol.is_empty() {
            return Err(EngineError::Validation(
                "symbol must not be empty".to_string(),
            ));
        }
        if draft.quantity < 0.0 || !draft.quantity.is_finite() {
            return Err(EngineError::Validation(
                "quantity must be a non-negative number".to_string(),
            ));
        }
        if draft.purchase_price_cents < 0 {
            return Err(EngineError::Validation(
                "purchase_price_cents must be >= 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            family_id: family_id.to_string(),
            kind: draft.kind,
            symbol,
            name: draft.name,
            quantity: draft.quantity,
            purchase_price_cents: draft.purchase_price_cents,
            purchase_date: draft.purchase_date,
            current_price_cents: draft.current_price_cents.unwrap_or(0),
            last_updated: now,
            notes: draft.notes,
        })
    }

    /// The opening `buy` row every new investment starts its history with.
    pub fn opening_trade(&self) -> TradeEntry {
        TradeEntry {
            id: Uuid::new_v4(),
            investment_id: self.id,
            date: self.purchase_date,
            price_cents: self.purchase_price_cents,
            action: HistoryAction::Buy,
            quantity: self.quantity,
            amount_cents: (self.quantity * self.purchase_price_cents as f64).round() as i64,
        }
    }
}

/// A position with its derived valuation, as exposed in portfolio views.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionView {
    pub id: Uuid,
    pub kind: InvestmentKind,
    pub symbol: String,
    pub name: String,
    pub quantity: f64,
    pub purchase_price_cents: i64,
    pub current_price_cents: i64,
    pub current_value_cents: i64,
    pub total_return_cents: i64,
    pub return_percentage: Option<f64>,
}

impl From<&Investment> for PositionView {
    fn from(inv: &Investment) -> Self {
        Self {
            id: inv.id,
            kind: inv.kind,
            symbol: inv.symbol.clone(),
            name: inv.name.clone(),
            quantity: inv.quantity,
            purchase_price_cents: inv.purchase_price_cents,
            current_price_cents: inv.current_price_cents,
            current_value_cents: inv.current_value_cents(),
            total_return_cents: inv.total_return_cents(),
            return_percentage: inv.return_percentage(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindTotals {
    pub value_cents: i64,
    pub return_cents: i64,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_value_cents: i64,
    pub total_cost_cents: i64,
    pub total_return_cents: i64,
    /// `None` when the portfolio has zero total cost.
    pub total_return_percentage: Option<f64>,
    pub by_kind: HashMap<InvestmentKind, KindTotals>,
    /// Top 5 positions by individual return percentage, best first.
    pub top_performers: Vec<PositionView>,
    /// Bottom 5 positions, worst first. With fewer than 10 positions the two
    /// lists may overlap.
    pub worst_performers: Vec<PositionView>,
}

/// Aggregates a list of investments into portfolio totals and rankings.
pub fn summarize_portfolio(investments: &[Investment]) -> PortfolioSummary {
    let mut total_value_cents = 0;
    let mut total_cost_cents = 0;
    let mut by_kind: HashMap<InvestmentKind, KindTotals> = HashMap::new();

    for inv in investments {
        let value = inv.current_value_cents();
        let cost = inv.cost_cents();
        total_value_cents += value;
        total_cost_cents += cost;

        let totals = by_kind.entry(inv.kind).or_default();
        totals.value_cents += value;
        totals.return_cents += value - cost;
        totals.count += 1;
    }

    let total_return_cents = total_value_cents - total_cost_cents;
    let total_return_percentage = (total_cost_cents != 0)
        .then(|| total_return_cents as f64 / total_cost_cents as f64 * 100.0);

    // Stable sort, so ties keep their list order. Zero-cost positions rank
    // below everything.
    let mut ranked: Vec<PositionView> = investments.iter().map(PositionView::from).collect();
    ranked.sort_by(|a, b| {
        let a = a.return_percentage.unwrap_or(f64::NEG_INFINITY);
        let b = b.return_percentage.unwrap_or(f64::NEG_INFINITY);
        b.total_cmp(&a)
    });

    let top_performers = ranked.iter().take(5).cloned().collect();
    let worst_count = ranked.len().min(5);
    let worst_performers = ranked[ranked.len() - worst_count..]
        .iter()
        .rev()
        .cloned()
        .collect();

    PortfolioSummary {
        total_value_cents,
        total_cost_cents,
        total_return_cents,
        total_return_percentage,
        by_kind,
        top_performers,
        worst_performers,
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "investments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub family_id: String,
    pub kind: String,
    pub symbol: String,
    pub name: String,
    pub quantity: f64,
    pub purchase_price_cents: i64,
    pub purchase_date: Date,
    pub current_price_cents: i64,
    pub last_updated: DateTimeUtc,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::investment_history::Entity")]
    History,
}

impl Related<super::investment_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::History.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Investment> for ActiveModel {
    fn from(inv: &Investment) -> Self {
        Self {
            id: ActiveValue::Set(inv.id.to_string()),
            user_id: ActiveValue::Set(inv.user_id.clone()),
            family_id: ActiveValue::Set(inv.family_id.clone()),
            kind: ActiveValue::Set(inv.kind.as_str().to_string()),
            symbol: ActiveValue::Set(inv.symbol.clone()),
            name: ActiveValue::Set(inv.name.clone()),
            quantity: ActiveValue::Set(inv.quantity),
            purchase_price_cents: ActiveValue::Set(inv.purchase_price_cents),
            purchase_date: ActiveValue::Set(inv.purchase_date),
            current_price_cents: ActiveValue::Set(inv.current_price_cents),
            last_updated: ActiveValue::Set(inv.last_updated),
            notes: ActiveValue::Set(inv.notes.clone()),
        }
    }
}

impl TryFrom<Model> for Investment {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("investment".to_string()))?,
            user_id: model.user_id,
            family_id: model.family_id,
            kind: InvestmentKind::try_from(model.kind.as_str())?,
            symbol: model.symbol,
            name: model.name,
            quantity: model.quantity,
            purchase_price_cents: model.purchase_price_cents,
            purchase_date: model.purchase_date,
            current_price_cents: model.current_price_cents,
            last_updated: model.last_updated,
            notes: model.notes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn investment(
        kind: InvestmentKind,
        quantity: f64,
        purchase_price_cents: i64,
        current_price_cents: i64,
    ) -> Investment {
        Investment {
            id: Uuid::new_v4(),
            user_id: "alice".to_string(),
            family_id: "fam".to_string(),
            kind,
            symbol: "SYM".to_string(),
            name: "Sym Corp".to_string(),
            quantity,
            purchase_price_cents,
            purchase_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            current_price_cents,
            last_updated: Utc::now(),
            notes: None,
        }
    }

    #[test]
    fn single_position_totals() {
        let summary = summarize_portfolio(&[investment(InvestmentKind::Stocks, 10.0, 10_000, 12_000)]);

        assert_eq!(summary.total_value_cents, 120_000);
        assert_eq!(summary.total_cost_cents, 100_000);
        assert_eq!(summary.total_return_cents, 20_000);
        assert_eq!(summary.total_return_percentage, Some(20.0));
    }

    #[test]
    fn zero_cost_portfolio_has_no_percentage() {
        let summary = summarize_portfolio(&[investment(InvestmentKind::Other, 0.0, 10_000, 12_000)]);
        assert_eq!(summary.total_return_percentage, None);
        assert_eq!(summary.top_performers[0].return_percentage, None);
    }

    #[test]
    fn groups_by_kind() {
        let summary = summarize_portfolio(&[
            investment(InvestmentKind::Stocks, 1.0, 10_000, 11_000),
            investment(InvestmentKind::Stocks, 2.0, 10_000, 9_000),
            investment(InvestmentKind::Crypto, 1.0, 5_000, 20_000),
        ]);

        let stocks = summary.by_kind[&InvestmentKind::Stocks];
        assert_eq!(stocks.count, 2);
        assert_eq!(stocks.value_cents, 29_000);
        assert_eq!(stocks.return_cents, -1_000);
        assert_eq!(summary.by_kind[&InvestmentKind::Crypto].count, 1);
    }

    #[test]
    fn performers_are_ranked_by_return_percentage() {
        let best = investment(InvestmentKind::Crypto, 1.0, 5_000, 20_000); // +300%
        let middle = investment(InvestmentKind::Stocks, 1.0, 10_000, 11_000); // +10%
        let worst = investment(InvestmentKind::Stocks, 1.0, 10_000, 9_000); // -10%
        let summary =
            summarize_portfolio(&[middle.clone(), worst.clone(), best.clone()]);

        assert_eq!(summary.top_performers[0].id, best.id);
        assert_eq!(summary.top_performers[2].id, worst.id);
        // Worst first, then ascending back towards the best.
        assert_eq!(summary.worst_performers[0].id, worst.id);
        assert_eq!(summary.worst_performers[2].id, best.id);
        // Fewer than 10 positions: the lists overlap.
        assert_eq!(summary.top_performers.len(), 3);
        assert_eq!(summary.worst_performers.len(), 3);
    }

    #[test]
    fn fractional_quantities_round_to_cents() {
        let inv = investment(InvestmentKind::Crypto, 0.5, 10_001, 10_001);
        assert_eq!(inv.cost_cents(), 5_001);
        assert_eq!(inv.total_return_cents(), 0);
    }
}
