//! Investment operations.
//!
//! Every position carries an append-only trade history. Creation seeds it
//! with the opening buy; quantity or price changes append the delta as a new
//! row, so the history reconstructs the position at any point.

use chrono::{DateTime, Utc};
use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    HistoryAction, Investment, InvestmentDraft, InvestmentUpdate, PortfolioSummary, ResultEngine,
    TradeEntry, investment_history, investments, summarize_portfolio,
};

use super::{Engine, with_tx};

impl Engine {
    /// Lists a user's positions. When a quote source is configured, listed
    /// kinds get their current price refreshed first; a failed quote keeps
    /// the stored price and is only logged.
    pub async fn list_investments(&self, user_id: &str, now: DateTime<Utc>) -> ResultEngine<Vec<Investment>> {
        let models = investments::Entity::find()
            .filter(investments::Column::UserId.eq(user_id))
            .order_by_asc(investments::Column::Symbol)
            .all(&self.database)
            .await?;
        let mut positions = models
            .into_iter()
            .map(Investment::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        if let Some(quotes) = &self.quotes {
            for position in &mut positions {
                if !position.kind.has_quote() {
                    continue;
                }
                match quotes.quote(&position.symbol).await {
                    Ok(price_cents) => {
                        position.current_price_cents = price_cents;
                        position.last_updated = now;
                        investments::ActiveModel::from(&*position)
                            .update(&self.database)
                            .await?;
                    }
                    Err(err) => {
                        tracing::warn!(symbol = %position.symbol, %err, "quote refresh failed");
                    }
                }
            }
        }

        Ok(positions)
    }

    /// An investment's trade history, oldest first.
    pub async fn investment_trades(
        &self,
        investment_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Vec<TradeEntry>> {
        with_tx!(self, |db_tx| {
            self.require_investment_owned(&db_tx, investment_id, user_id)
                .await?;
            let models = investment_history::Entity::find()
                .filter(investment_history::Column::InvestmentId.eq(investment_id.to_string()))
                .order_by_asc(investment_history::Column::Date)
                .all(&db_tx)
                .await?;
            models.into_iter().map(TradeEntry::try_from).collect()
        })
    }

    pub async fn create_investment(
        &self,
        user_id: &str,
        family_id: &str,
        draft: InvestmentDraft,
        now: DateTime<Utc>,
    ) -> ResultEngine<Uuid> {
        let investment = Investment::new(user_id, family_id, draft, now)?;
        let opening = investment.opening_trade();

        with_tx!(self, |db_tx| {
            investments::ActiveModel::from(&investment)
                .insert(&db_tx)
                .await?;
            investment_history::ActiveModel::from(&opening)
                .insert(&db_tx)
                .await?;
            Ok(investment.id)
        })
    }

    /// Applies a change set. A quantity increase appends a `buy` row at the
    /// effective price, a decrease a `sell` row; a price-only change appends
    /// nothing.
    pub async fn update_investment(
        &self,
        investment_id: Uuid,
        user_id: &str,
        update: InvestmentUpdate,
        now: DateTime<Utc>,
    ) -> ResultEngine<Investment> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_investment_owned(&db_tx, investment_id, user_id)
                .await?;
            let mut investment = Investment::try_from(model)?;
            let previous_quantity = investment.quantity;

            if let Some(name) = update.name {
                investment.name = name;
            }
            if let Some(price_cents) = update.current_price_cents {
                investment.current_price_cents = price_cents;
            }
            if let Some(quantity) = update.quantity {
                if quantity < 0.0 || !quantity.is_finite() {
                    return Err(crate::EngineError::Validation(
                        "quantity must be a non-negative number".to_string(),
                    ));
                }
                investment.quantity = quantity;
            }
            if let Some(notes) = update.notes {
                investment.notes = Some(notes);
            }
            investment.last_updated = now;

            let delta = investment.quantity - previous_quantity;
            if delta.abs() > f64::EPSILON {
                let trade = TradeEntry {
                    id: Uuid::new_v4(),
                    investment_id,
                    date: now.date_naive(),
                    price_cents: investment.current_price_cents,
                    action: if delta > 0.0 {
                        HistoryAction::Buy
                    } else {
                        HistoryAction::Sell
                    },
                    quantity: delta.abs(),
                    amount_cents: (delta.abs() * investment.current_price_cents as f64).round()
                        as i64,
                };
                investment_history::ActiveModel::from(&trade)
                    .insert(&db_tx)
                    .await?;
            }

            investments::ActiveModel::from(&investment)
                .update(&db_tx)
                .await?;
            Ok(investment)
        })
    }

    pub async fn delete_investment(&self, investment_id: Uuid, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_investment_owned(&db_tx, investment_id, user_id)
                .await?;
            investment_history::Entity::delete_many()
                .filter(investment_history::Column::InvestmentId.eq(investment_id.to_string()))
                .exec(&db_tx)
                .await?;
            investments::Entity::delete_by_id(investment_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Portfolio totals, per-kind breakdown and performance rankings over
    /// the user's positions as stored (no quote refresh).
    pub async fn portfolio_summary(&self, user_id: &str) -> ResultEngine<PortfolioSummary> {
        let models = investments::Entity::find()
            .filter(investments::Column::UserId.eq(user_id))
            .all(&self.database)
            .await?;
        let positions = models
            .into_iter()
            .map(Investment::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        Ok(summarize_portfolio(&positions))
    }
}
