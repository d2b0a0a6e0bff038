//! Budget operations.

use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Budget, BudgetDraft, BudgetSummary, BudgetUpdate, EngineError, ResultEngine, Transaction,
    budget_categories, budgets, month_bounds, summarize, transactions,
};

use super::{Engine, with_tx};

impl Engine {
    /// The family's budget for one month, or `NotFound`.
    pub async fn budget_for_month(
        &self,
        family_id: &str,
        year: i32,
        month: u32,
    ) -> ResultEngine<Budget> {
        crate::budgets::check_month(month)?;
        with_tx!(self, |db_tx| {
            let model = budgets::Entity::find()
                .filter(budgets::Column::FamilyId.eq(family_id))
                .filter(budgets::Column::Year.eq(year))
                .filter(budgets::Column::Month.eq(month as i32))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::NotFound("budget".to_string()))?;
            self.load_budget(&db_tx, model).await
        })
    }

    /// Creates a budget; at most one may exist per `(family, year, month)`.
    pub async fn create_budget(&self, family_id: &str, draft: BudgetDraft) -> ResultEngine<Uuid> {
        let budget = Budget::new(family_id, draft)?;

        with_tx!(self, |db_tx| {
            let existing = budgets::Entity::find()
                .filter(budgets::Column::FamilyId.eq(family_id))
                .filter(budgets::Column::Year.eq(budget.year))
                .filter(budgets::Column::Month.eq(budget.month as i32))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(EngineError::Conflict(format!(
                    "a budget for {}-{:02} already exists",
                    budget.year, budget.month
                )));
            }

            budgets::ActiveModel::from(&budget).insert(&db_tx).await?;
            for category in &budget.categories {
                category.active_model(budget.id).insert(&db_tx).await?;
            }
            Ok(budget.id)
        })
    }

    /// Updates limits and/or replaces the category list.
    pub async fn update_budget(
        &self,
        budget_id: Uuid,
        family_id: &str,
        update: BudgetUpdate,
    ) -> ResultEngine<Budget> {
        with_tx!(self, |db_tx| {
            let model = self.require_budget_in_family(&db_tx, budget_id, family_id).await?;
            let mut budget = self.load_budget(&db_tx, model).await?;

            if let Some(total_cents) = update.total_cents {
                budget.total_cents = total_cents;
            }
            if let Some(drafts) = update.categories {
                budget.categories = crate::budgets::build_categories(drafts)?;
                budget_categories::Entity::delete_many()
                    .filter(budget_categories::Column::BudgetId.eq(budget_id.to_string()))
                    .exec(&db_tx)
                    .await?;
                for category in &budget.categories {
                    category.active_model(budget.id).insert(&db_tx).await?;
                }
            }

            budgets::ActiveModel::from(&budget).update(&db_tx).await?;
            Ok(budget)
        })
    }

    /// Budget limits joined with the month's actual spending.
    pub async fn budget_summary(
        &self,
        family_id: &str,
        year: i32,
        month: u32,
    ) -> ResultEngine<BudgetSummary> {
        let (first, last) = month_bounds(year, month)?;

        with_tx!(self, |db_tx| {
            let model = budgets::Entity::find()
                .filter(budgets::Column::FamilyId.eq(family_id))
                .filter(budgets::Column::Year.eq(year))
                .filter(budgets::Column::Month.eq(month as i32))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::NotFound("budget".to_string()))?;
            let budget = self.load_budget(&db_tx, model).await?;

            let tx_models = transactions::Entity::find()
                .filter(transactions::Column::FamilyId.eq(family_id))
                .filter(transactions::Column::Date.gte(first))
                .filter(transactions::Column::Date.lte(last))
                .all(&db_tx)
                .await?;
            let month_transactions = tx_models
                .into_iter()
                .map(Transaction::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;

            Ok(summarize(&budget, &month_transactions))
        })
    }

    async fn load_budget(
        &self,
        db_tx: &sea_orm::DatabaseTransaction,
        model: budgets::Model,
    ) -> ResultEngine<Budget> {
        let categories = budget_categories::Entity::find()
            .filter(budget_categories::Column::BudgetId.eq(model.id.clone()))
            .order_by_asc(budget_categories::Column::Position)
            .all(db_tx)
            .await?;
        Budget::try_from((model, categories))
    }
}
